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

//! End-to-end fault-handler tests.
//!
//! A fault signal kills whichever process it fires in, so these tests
//! re-spawn this test executable as a child: the child installs the fault
//! handlers plus a flush hook that leaves a marker file, then trips a
//! fault. The parent asserts the three observable guarantees — the
//! diagnostic line on stderr, the flush side effect on disk, and exit
//! status 0.
//!
//! Two fault routes are covered: a directly raised SIGSEGV (a crash inside
//! the external library), and the pipeline's own contract-violation abort,
//! which must reach the handler as SIGABRT.

use pmfuzz_cli::{coverage, signal};
use pmfuzz_core::spy::SpyParser;
use std::env;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const CHILD_MODE_ENV: &str = "PMFUZZ_FAULT_CHILD";
const FLUSH_MARK_ENV: &str = "PMFUZZ_FLUSH_MARK";

// ==================== Child side ====================

/// Flush hook for the child: drop a marker file where the parent can see
/// it. Runs inside a signal handler, but only in a child that raised the
/// signal itself, so the relaxed safety is acceptable for a test.
fn write_flush_mark() {
    if let Ok(path) = env::var(FLUSH_MARK_ENV) {
        let _ = fs::write(path, b"flushed\n");
    }
}

/// Entry point for the re-spawned child. In a normal test run the mode
/// variable is unset and this is a no-op.
#[test]
fn fault_child_entry() {
    let Ok(mode) = env::var(CHILD_MODE_ENV) else {
        return;
    };

    coverage::set_flush_hook(write_flush_mark);
    signal::install_fault_handlers().unwrap();

    match mode.as_str() {
        "raise-segv" => unsafe {
            libc::raise(libc::SIGSEGV);
        },
        "parse-contract-violation" => {
            let mut api = SpyParser::new();
            api.fail_parse();
            pmfuzz_core::process(&mut api, b"x");
        }
        other => panic!("unknown child mode {other:?}"),
    }

    // The handler exits the process; reaching this line means it never ran.
    std::process::exit(3);
}

// ==================== Parent side ====================

fn spawn_child(mode: &str, flush_mark: &Path) -> Output {
    Command::new(env::current_exe().unwrap())
        .args(["fault_child_entry", "--exact", "--test-threads=1"])
        .env(CHILD_MODE_ENV, mode)
        .env(FLUSH_MARK_ENV, flush_mark)
        .output()
        .unwrap()
}

#[test]
fn raised_fault_signal_flushes_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let mark = dir.path().join("flush-mark");

    let out = spawn_child("raise-segv", &mark);

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Caught SIGSEGV, flushing coverage..."),
        "missing diagnostic, stderr was: {stderr}"
    );
    assert!(mark.exists(), "flush hook never ran");
    assert!(out.status.success(), "child status: {:?}", out.status);
}

#[test]
fn contract_violation_aborts_into_the_fault_handler() {
    let dir = tempfile::tempdir().unwrap();
    let mark = dir.path().join("flush-mark");

    let out = spawn_child("parse-contract-violation", &mark);

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Caught SIGABRT, flushing coverage..."),
        "missing diagnostic, stderr was: {stderr}"
    );
    assert!(mark.exists(), "flush hook never ran");
    assert!(out.status.success(), "child status: {:?}", out.status);
}
