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

//! Fault-signal handling for coverage durability.
//!
//! A crashing fuzz input terminates the process before the instrumentation
//! runtime's normal exit-time write-out can run, erasing the coverage
//! gained on the way to the crash. This module registers a handler for the
//! five fault-class signals that writes a diagnostic line, flushes the
//! counters, and exits 0 — the crash itself has already been observed by
//! the fuzz runner; the handler's only job is preserving the evidence.
//!
//! The handler can interrupt the pipeline at any instruction boundary,
//! possibly mid-allocation or mid-library-call, so it is limited to
//! async-signal-safe operations: `write(2)`, the coverage hook's atomic
//! load and call, and `_exit(2)`. Pipeline handles live at the moment of
//! the fault are abandoned; the process is about to disappear.
//!
//! Generic termination requests (SIGTERM, SIGINT) are not intercepted and
//! take the default disposition, which does not flush coverage. Known gap,
//! kept as-is.

use crate::coverage;
use crate::error::ShellError;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::os::raw::c_int;

/// The fault-class signals the shell intercepts.
pub const FAULT_SIGNALS: [Signal; 5] = [
    Signal::SIGSEGV,
    Signal::SIGABRT,
    Signal::SIGBUS,
    Signal::SIGILL,
    Signal::SIGFPE,
];

/// Register [`FAULT_SIGNALS`] to flush coverage and exit.
///
/// Called once at startup when the shell runs in coverage-profiling mode.
pub fn install_fault_handlers() -> Result<(), ShellError> {
    let action = SigAction::new(
        SigHandler::Handler(handle_fault),
        SaFlags::empty(),
        SigSet::empty(),
    );

    for sig in FAULT_SIGNALS {
        // SAFETY: handle_fault performs only async-signal-safe operations.
        unsafe { sigaction(sig, &action) }?;
    }
    Ok(())
}

/// The asynchronous fault handler: diagnostic line, flush, exit 0.
extern "C" fn handle_fault(signum: c_int) {
    let msg: &[u8] = match signum {
        libc::SIGSEGV => b"Caught SIGSEGV, flushing coverage...\n",
        libc::SIGABRT => b"Caught SIGABRT, flushing coverage...\n",
        libc::SIGBUS => b"Caught SIGBUS, flushing coverage...\n",
        libc::SIGILL => b"Caught SIGILL, flushing coverage...\n",
        libc::SIGFPE => b"Caught SIGFPE, flushing coverage...\n",
        _ => b"Caught fault signal, flushing coverage...\n",
    };

    // SAFETY: write(2) with a static buffer is async-signal-safe. A short
    // or failed write loses the diagnostic, never the flush.
    unsafe {
        let _ = libc::write(libc::STDERR_FILENO, msg.as_ptr().cast(), msg.len());
    }

    coverage::flush();

    // SAFETY: _exit(2) is async-signal-safe. Exit 0: the signal is the
    // fuzz finding and has already been observed; the handler exists only
    // to keep the coverage history.
    unsafe {
        libc::_exit(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Raising a fault signal in-process would take the test harness down
    // with it, so this only verifies registration by reading back the
    // installed dispositions; the live handler path runs in a child
    // process in tests/fault_handler_tests.rs.
    #[test]
    fn handlers_registered_for_all_fault_signals() {
        install_fault_handlers().unwrap();

        let restore = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
        for sig in FAULT_SIGNALS {
            let old = unsafe { sigaction(sig, &restore) }.unwrap();
            assert_eq!(
                old.handler(),
                SigHandler::Handler(handle_fault),
                "{sig:?} disposition was not the fault handler"
            );
        }
    }

    #[test]
    fn fault_signal_set_is_exactly_the_five_fault_signals() {
        assert_eq!(
            FAULT_SIGNALS,
            [
                Signal::SIGSEGV,
                Signal::SIGABRT,
                Signal::SIGBUS,
                Signal::SIGILL,
                Signal::SIGFPE,
            ]
        );
    }
}
