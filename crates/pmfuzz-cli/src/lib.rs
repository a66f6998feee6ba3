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

//! Crash-safe fuzzing shell around the pmfuzz pipeline.
//!
//! The shell owns everything outside the parser call sequence: it reads the
//! fuzz input from stdin into a bounded buffer, invokes the pipeline exactly
//! once, and — the part this crate exists for — makes sure accumulated
//! code-coverage counters reach disk even when the input crashes the
//! process. A crashing input is the fuzz finding; losing the coverage
//! history gathered before the crash is the failure mode this shell
//! prevents.
//!
//! # How coverage survives a crash
//!
//! [`signal::install_fault_handlers`] registers one handler for the five
//! fault-class signals (SIGSEGV, SIGABRT, SIGBUS, SIGILL, SIGFPE). The
//! handler writes a one-line diagnostic, triggers [`coverage::flush`], and
//! exits 0. It may interrupt the pipeline at any instruction boundary, so
//! it performs only async-signal-safe work; in particular it never touches
//! the pipeline's live handles, which are deliberately abandoned on that
//! path.
//!
//! Whether handlers are installed is a runtime decision ([`config::Config`],
//! `PMFUZZ_PROFILE`), so the same binary can run and be tested both ways.
//!
//! # Logging
//!
//! Library code logs through `tracing`; the binary installs a
//! `tracing-subscriber` writing to stderr, filtered by `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=debug pmfuzz < input.rb
//! ```
//!
//! The crash handler bypasses tracing entirely — formatting and
//! subscriber internals are not async-signal-safe.

pub mod config;
pub mod coverage;
pub mod error;
pub mod input;
pub mod shell;
pub mod signal;

pub use config::Config;
pub use error::ShellError;
pub use shell::run_with;
