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

//! Coverage-counter flushing.
//!
//! The coverage counters live entirely inside the instrumentation runtime;
//! the shell's only interaction is asking the runtime to write them to
//! disk. That request goes through a process-wide hook so the flush can be
//! wired differently per build: the LLVM profile runtime in instrumented
//! builds (feature `profile`), nothing in plain builds, and a recording
//! function in tests.
//!
//! [`flush`] is called from the fault-signal handler, so it is restricted
//! to one atomic load and one call into the hook. The LLVM runtime's write
//! is idempotent and reentrant-safe in this restricted use — an externally
//! provided guarantee this module relies on but cannot enforce.

use std::sync::atomic::{AtomicUsize, Ordering};

/// A registered flush hook. Must itself be async-signal-safe.
pub type FlushFn = fn();

static FLUSH_HOOK: AtomicUsize = AtomicUsize::new(0);

/// Replace the process-wide flush hook.
pub fn set_flush_hook(hook: FlushFn) {
    FLUSH_HOOK.store(hook as usize, Ordering::SeqCst);
}

/// Write accumulated coverage counters to persistent storage.
///
/// Dispatches to the registered hook, or the build's default when none is
/// registered. Async-signal-safe as long as the hook is.
pub fn flush() {
    let raw = FLUSH_HOOK.load(Ordering::SeqCst);
    if raw == 0 {
        default_flush();
    } else {
        // SAFETY: the only non-zero values ever stored are `FlushFn`s.
        let hook: FlushFn = unsafe { std::mem::transmute(raw) };
        hook();
    }
}

/// Instrumented builds: hand the counters to the LLVM profile runtime.
/// The symbol only exists when the profile runtime is linked in.
#[cfg(feature = "profile")]
fn default_flush() {
    extern "C" {
        fn __llvm_profile_write_file() -> libc::c_int;
    }
    // Return status deliberately not inspected; there is no one left to
    // report it to on the crash path.
    unsafe {
        __llvm_profile_write_file();
    }
}

#[cfg(not(feature = "profile"))]
fn default_flush() {}
