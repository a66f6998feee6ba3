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

//! pmfuzz: stdin-driven fuzzing shell for the Prism parser.
//!
//! Reads up to 512 bytes of fuzz input from stdin and drives it through
//! Prism's streaming parse, pretty-print, and serialize entry points. No
//! flags; coverage-profiling mode comes from `PMFUZZ_PROFILE`.

use pmfuzz_cli::{config::Config, shell, signal};
use pmfuzz_core::sys::PrismApi;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();

    if config.profile_coverage {
        if let Err(e) = signal::install_fault_handlers() {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let mut api = PrismApi::new();
    match shell::run_with(&config, &mut std::io::stdin().lock(), &mut api) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
