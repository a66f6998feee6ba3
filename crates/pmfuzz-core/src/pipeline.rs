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

//! The parse → pretty-print → serialize → teardown sequence.
//!
//! One fuzz input, one fixed call sequence, no branching on content. The
//! render outputs are never inspected: the point is to exercise the
//! library's code paths, not to validate what they produce.
//!
//! # Failure model
//!
//! The two contract checks in [`process`] cover library-contract
//! violations (stream open failing, parse returning nothing). Tripping one
//! raises SIGABRT via [`std::process::abort`] — an unwinding panic would
//! exit without a signal and slip past the shell's fault handler, so the
//! abort is explicit and independent of the build's panic strategy. That
//! abort *is* the fuzzing signal, and the fault handler takes over
//! coverage preservation. There is deliberately no recovery and no cleanup
//! on that path; teardown only runs on the normal completion path.

use crate::api::ParserApi;
use tracing::trace;

/// Terminate on a library-contract violation.
///
/// Always a genuine `abort(3)`: the fault handler keys off SIGABRT, and
/// this path must reach it in every build configuration.
fn contract_violation(what: &str) -> ! {
    eprintln!("pmfuzz: library contract violation: {what}");
    std::process::abort()
}

/// Drive one fuzz input through the full external-library call sequence.
///
/// Every external call happens exactly once, in a fixed order; every
/// acquired handle is released exactly once, teardown in reverse-roughly-of-
/// acquisition order: tree, state, intermediate buffer, stream. The two
/// render buffers are scoped to their own steps and never outlive them.
///
/// # Aborts
///
/// Aborts the process (SIGABRT) if the library violates its contract:
/// `open_stream` returning `None` or `parse_stream` returning `None`.
/// Malformed input is not a violation — the library is expected to produce
/// an error-recovery tree for arbitrary bytes, including the empty input.
pub fn process<P: ParserApi>(api: &mut P, input: &[u8]) {
    trace!(bytes = input.len(), "pipeline start");

    let Some(mut stream) = api.open_stream(input) else {
        contract_violation("opening a stream over the fuzz input failed");
    };

    let Some((state, scratch, tree)) = api.parse_stream(&mut stream) else {
        contract_violation("streaming parse returned no tree");
    };

    {
        let mut buffer = api.buffer_init();
        api.prettyprint(&mut buffer, &state, &tree);
        api.free_buffer(buffer);
    }

    {
        let mut buffer = api.buffer_init();
        api.serialize(&state, &tree, &mut buffer);
        api.free_buffer(buffer);
    }

    api.destroy_tree(&state, tree);
    api.free_state(state);
    api.free_scratch(scratch);
    api.close_stream(stream);

    trace!("pipeline complete");
}
