// pmfuzz - Fuzzing harness for the Prism Ruby parser
//
// Copyright (c) 2025 pmfuzz contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


#![no_main]

//! Fuzz target for the Prism streaming-parse pipeline.
//!
//! Feeds the fuzz-engine-supplied buffer straight through the full call
//! sequence: stream open, streaming parse, pretty-print, serialize, and
//! teardown. Any byte sequence is fair game — malformed Ruby must come back
//! as an error-recovery tree, never as a crash.
//!
//! # Running the Fuzzer
//!
//! ```bash
//! # Install cargo-fuzz
//! cargo install cargo-fuzz
//!
//! # Run the fuzzer
//! cd crates/pmfuzz-core
//! cargo fuzz run fuzz_parse_stream
//!
//! # Bound the input like the stdin shell does
//! cargo fuzz run fuzz_parse_stream -- -max_len=512
//!
//! # Run with AddressSanitizer
//! cargo fuzz run fuzz_parse_stream --sanitizer=address
//! ```
//!
//! # Expected Behavior
//!
//! - The pipeline's assertions never fire: streams open, parses yield trees
//! - Pretty-print and serialize handle every recoverable tree shape
//! - Every library handle is released exactly once, so leak detection stays
//!   quiet across iterations

use libfuzzer_sys::fuzz_target;
use pmfuzz_core::sys::PrismApi;

fuzz_target!(|data: &[u8]| {
    let mut api = PrismApi::new();
    pmfuzz_core::process(&mut api, data);
});
