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

//! Orchestration: one input, one pipeline invocation, one exit status.

use crate::config::Config;
use crate::error::ShellError;
use crate::input;
use pmfuzz_core::ParserApi;
use std::io::Read;
use tracing::debug;

/// Acquire the fuzz input from `reader` and drive it through the pipeline
/// exactly once.
///
/// The sole error path is a stream-level read failure, on which the
/// pipeline is never invoked. Everything else either completes normally or
/// faults, and faults are the fault handler's territory, not this
/// function's.
pub fn run_with<R, P>(config: &Config, reader: &mut R, api: &mut P) -> Result<(), ShellError>
where
    R: Read,
    P: ParserApi,
{
    let input = input::read_input(reader, config.input_cap)?;
    debug!(bytes = input.len(), "invoking pipeline");
    pmfuzz_core::process(api, &input);
    Ok(())
}
