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

//! Structured error types for the shell.
//!
//! The error surface is deliberately tiny. A stream-level read error on
//! stdin is the only recoverable failure in the whole program: it maps to a
//! non-zero exit before the pipeline runs. Everything that goes wrong past
//! that point is a fault, which the shell does not model as an error at all
//! — it propagates as a signal and is the fuzzing signal itself.

use std::io;
use thiserror::Error;

/// Errors the shell can report instead of crashing on.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Reading the fuzz input from stdin failed at the stream level.
    ///
    /// Distinct from end-of-file, which is the normal way input ends.
    /// On this error the pipeline is never invoked.
    #[error("error reading fuzz input from stdin: {source}")]
    Read {
        /// The underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Registering a fault-signal handler failed.
    ///
    /// Raised at startup in profile mode, before any input is read.
    #[error("failed to install fault signal handler: {0}")]
    Signal(#[from] nix::Error),
}
