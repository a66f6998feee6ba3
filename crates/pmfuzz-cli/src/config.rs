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

//! Shell configuration, resolved once at process startup.
//!
//! The harness consumes no CLI flags — the only knob is whether it runs in
//! coverage-profiling mode, and that is a runtime flag so a single binary
//! can be exercised both ways. `PMFUZZ_PROFILE` overrides the compiled-in
//! default (`true` when the `profile` feature is on).

use crate::input::INPUT_CAP;
use tracing::warn;

/// Environment variable overriding coverage-profiling mode.
pub const PROFILE_ENV: &str = "PMFUZZ_PROFILE";

/// Shell configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Install fault-signal handlers that flush coverage on crash.
    pub profile_coverage: bool,
    /// Maximum fuzz input size accepted from stdin.
    pub input_cap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile_coverage: cfg!(feature = "profile"),
            input_cap: INPUT_CAP,
        }
    }
}

impl Config {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Self {
        let profile_coverage = resolve_profile(std::env::var(PROFILE_ENV).ok().as_deref());
        Self { profile_coverage, ..Self::default() }
    }
}

/// Interpret a `PMFUZZ_PROFILE` value; `None` or an unrecognized value
/// falls back to the compiled-in default.
fn resolve_profile(value: Option<&str>) -> bool {
    let default = cfg!(feature = "profile");
    match value {
        None => default,
        Some(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => true,
            "0" | "false" | "off" | "no" => false,
            other => {
                warn!(value = other, "unrecognized {} value, using default", PROFILE_ENV);
                default
            }
        },
    }
}
