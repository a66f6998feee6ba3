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

//! Real Prism binding, implementing [`ParserApi`] over `ruby-prism-sys`.
//!
//! The C streaming entry point pulls input through `fgets`/`feof`-shaped
//! callbacks. [`MemStream`] plus the two `extern "C"` adapters below are the
//! in-memory replacement for the reference harness's `fmemopen` stream.
//!
//! `pm_parse_stream` initializes a caller-provided parser struct and
//! intermediate buffer in place, and the initialized parser holds internal
//! pointers, so neither may move afterwards. Each lives in a heap cell
//! ([`RawBox`]) that is only ever touched through raw pointers; the
//! uninitialized-slot pattern stays confined to this module and the rest of
//! the crate sees owned handles.

use crate::api::ParserApi;
use ruby_prism_sys::{
    pm_buffer_free, pm_buffer_init, pm_buffer_t, pm_node_destroy, pm_node_t, pm_parse_stream,
    pm_parser_free, pm_parser_t, pm_prettyprint, pm_serialize,
};
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::os::raw::{c_char, c_int, c_void};
use std::ptr::{self, NonNull};

/// Heap cell for a library struct that is initialized by the library and
/// never moved afterwards. Only accessed through [`RawBox::ptr`].
struct RawBox<T>(Box<UnsafeCell<MaybeUninit<T>>>);

impl<T> RawBox<T> {
    fn new_uninit() -> Self {
        Self(Box::new(UnsafeCell::new(MaybeUninit::uninit())))
    }

    fn ptr(&self) -> *mut T {
        self.0.get().cast()
    }
}

/// Readable in-memory stream over one fuzz input.
pub struct MemStream {
    data: Vec<u8>,
    pos: usize,
}

/// `fgets(3)` over a [`MemStream`]: read at most `size - 1` bytes, stop
/// after a newline, NUL-terminate, and return null at end of stream.
///
/// # Safety
///
/// `out` must point to at least `size` writable bytes and `stream` must be
/// a valid `*mut MemStream`. Only called by `pm_parse_stream` with the
/// pointers this module hands it.
unsafe extern "C" fn mem_fgets(out: *mut c_char, size: c_int, stream: *mut c_void) -> *mut c_char {
    let stream = &mut *(stream as *mut MemStream);
    if size <= 0 || stream.pos >= stream.data.len() {
        return ptr::null_mut();
    }

    let max = (size as usize) - 1;
    let mut written = 0;
    while written < max && stream.pos < stream.data.len() {
        let byte = stream.data[stream.pos];
        *out.add(written) = byte as c_char;
        stream.pos += 1;
        written += 1;
        if byte == b'\n' {
            break;
        }
    }
    *out.add(written) = 0;
    out
}

/// `feof(3)` over a [`MemStream`].
///
/// # Safety
///
/// `stream` must be a valid `*mut MemStream`.
unsafe extern "C" fn mem_feof(stream: *mut c_void) -> c_int {
    let stream = &*(stream as *const MemStream);
    (stream.pos >= stream.data.len()) as c_int
}

/// Parser state handle. The underlying `pm_parser_t` points into both
/// itself and the intermediate buffer's contents, so it stays pinned in
/// its heap cell until [`ParserApi::free_state`].
pub struct PrismState(RawBox<pm_parser_t>);

/// The intermediate buffer `pm_parse_stream` fills with the source text.
/// The parser state and tree point into its contents; it is released last
/// of the three.
pub struct PrismScratch(RawBox<pm_buffer_t>);

/// Owned syntax tree handle.
pub struct PrismTree(NonNull<pm_node_t>);

/// Render buffer for pretty-print and serialize output.
pub struct PrismBuffer(RawBox<pm_buffer_t>);

/// [`ParserApi`] over the real Prism library.
///
/// Stateless; one value can drive any number of pipeline invocations.
#[derive(Debug, Default)]
pub struct PrismApi;

impl PrismApi {
    pub fn new() -> Self {
        Self
    }
}

impl ParserApi for PrismApi {
    type Stream = MemStream;
    type State = PrismState;
    type Scratch = PrismScratch;
    type Tree = PrismTree;
    type Buffer = PrismBuffer;

    fn open_stream(&mut self, input: &[u8]) -> Option<MemStream> {
        // An in-memory stream cannot fail to open; None stays reserved for
        // environment failures per the trait contract.
        Some(MemStream { data: input.to_vec(), pos: 0 })
    }

    fn parse_stream(
        &mut self,
        stream: &mut MemStream,
    ) -> Option<(PrismState, PrismScratch, PrismTree)> {
        let state = RawBox::new_uninit();
        let scratch = RawBox::new_uninit();

        // SAFETY: state and scratch point to writable uninitialized slots
        // that pm_parse_stream initializes; the stream pointer and both
        // callbacks stay valid for the duration of the call.
        let node = unsafe {
            pm_parse_stream(
                state.ptr(),
                scratch.ptr(),
                stream as *mut MemStream as *mut c_void,
                Some(mem_fgets),
                Some(mem_feof),
                ptr::null(),
            )
        };

        let tree = NonNull::new(node)?;
        Some((PrismState(state), PrismScratch(scratch), PrismTree(tree)))
    }

    fn buffer_init(&mut self) -> PrismBuffer {
        let buffer = RawBox::new_uninit();
        // SAFETY: the slot is writable and uninitialized, exactly what
        // pm_buffer_init expects.
        unsafe {
            pm_buffer_init(buffer.ptr());
        }
        PrismBuffer(buffer)
    }

    fn prettyprint(&mut self, buffer: &mut PrismBuffer, state: &PrismState, tree: &PrismTree) {
        // SAFETY: all three handles are initialized and alive.
        unsafe {
            pm_prettyprint(buffer.0.ptr(), state.0.ptr(), tree.0.as_ptr());
        }
    }

    fn serialize(&mut self, state: &PrismState, tree: &PrismTree, buffer: &mut PrismBuffer) {
        // SAFETY: all three handles are initialized and alive.
        unsafe {
            pm_serialize(state.0.ptr(), tree.0.as_ptr(), buffer.0.ptr());
        }
    }

    fn destroy_tree(&mut self, state: &PrismState, tree: PrismTree) {
        // SAFETY: tree was produced by this state and neither has been
        // released yet; the tree handle is consumed here.
        unsafe {
            pm_node_destroy(state.0.ptr(), tree.0.as_ptr());
        }
    }

    fn free_state(&mut self, state: PrismState) {
        // SAFETY: the state is initialized and all tree uses are done.
        unsafe {
            pm_parser_free(state.0.ptr());
        }
    }

    fn free_scratch(&mut self, scratch: PrismScratch) {
        // SAFETY: initialized by pm_parse_stream, released exactly once.
        unsafe {
            pm_buffer_free(scratch.0.ptr());
        }
    }

    fn free_buffer(&mut self, buffer: PrismBuffer) {
        // SAFETY: initialized by buffer_init, released exactly once.
        unsafe {
            pm_buffer_free(buffer.0.ptr());
        }
    }

    fn close_stream(&mut self, stream: MemStream) {
        drop(stream);
    }
}
