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

//! Recording test double for [`ParserApi`].
//!
//! [`SpyParser`] hands out integer-tagged handles in acquisition order and
//! records every call, so tests can assert the exact external-call sequence
//! the pipeline produced — which calls ran, how often, in what order, and
//! that each handle was released exactly once. It performs no parsing.
//!
//! Shipped in `src/` rather than a test directory because both this crate's
//! unit tests and the shell crate's integration tests drive it.

use crate::api::ParserApi;

/// One recorded external call. Handle fields carry the integer tag the spy
/// assigned at acquisition time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    OpenStream { len: usize, stream: u32 },
    ParseStream { stream: u32, state: u32, scratch: u32, tree: u32 },
    BufferInit { buffer: u32 },
    Prettyprint { buffer: u32, state: u32, tree: u32 },
    Serialize { state: u32, tree: u32, buffer: u32 },
    DestroyTree { state: u32, tree: u32 },
    FreeState { state: u32 },
    FreeScratch { scratch: u32 },
    FreeBuffer { buffer: u32 },
    CloseStream { stream: u32 },
}

/// Opaque stream handle handed out by [`SpyParser`].
#[derive(Debug)]
pub struct SpyStream(u32);

/// Opaque parser-state handle handed out by [`SpyParser`].
#[derive(Debug)]
pub struct SpyState(u32);

/// Opaque intermediate-buffer handle handed out by [`SpyParser`].
#[derive(Debug)]
pub struct SpyScratch(u32);

/// Opaque tree handle handed out by [`SpyParser`].
#[derive(Debug)]
pub struct SpyTree(u32);

/// Opaque render-buffer handle handed out by [`SpyParser`].
#[derive(Debug)]
pub struct SpyBuffer(u32);

/// A [`ParserApi`] implementation that records instead of parsing.
///
/// Handles are numbered from zero in acquisition order, so two runs over
/// the same input produce identical call logs — which is exactly the
/// determinism property the tests lean on.
#[derive(Debug, Default)]
pub struct SpyParser {
    next_handle: u32,
    calls: Vec<Call>,
    acquired: Vec<u32>,
    released: Vec<u32>,
    fail_open: bool,
    fail_parse: bool,
}

impl SpyParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `open_stream` report an environment failure.
    pub fn fail_open(&mut self) {
        self.fail_open = true;
    }

    /// Make the next `parse_stream` violate the library contract.
    pub fn fail_parse(&mut self) {
        self.fail_parse = true;
    }

    /// Everything recorded so far, in call order.
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// True when every acquired handle has been released exactly once.
    pub fn all_released(&self) -> bool {
        let mut released = self.released.clone();
        released.sort_unstable();
        let mut acquired = self.acquired.clone();
        acquired.sort_unstable();
        released == acquired
    }

    fn alloc(&mut self) -> u32 {
        let id = self.next_handle;
        self.next_handle += 1;
        self.acquired.push(id);
        id
    }
}

impl ParserApi for SpyParser {
    type Stream = SpyStream;
    type State = SpyState;
    type Scratch = SpyScratch;
    type Tree = SpyTree;
    type Buffer = SpyBuffer;

    fn open_stream(&mut self, input: &[u8]) -> Option<SpyStream> {
        if self.fail_open {
            return None;
        }
        let stream = self.alloc();
        self.calls.push(Call::OpenStream { len: input.len(), stream });
        Some(SpyStream(stream))
    }

    fn parse_stream(
        &mut self,
        stream: &mut SpyStream,
    ) -> Option<(SpyState, SpyScratch, SpyTree)> {
        if self.fail_parse {
            return None;
        }
        let state = self.alloc();
        let scratch = self.alloc();
        let tree = self.alloc();
        self.calls.push(Call::ParseStream { stream: stream.0, state, scratch, tree });
        Some((SpyState(state), SpyScratch(scratch), SpyTree(tree)))
    }

    fn buffer_init(&mut self) -> SpyBuffer {
        let buffer = self.alloc();
        self.calls.push(Call::BufferInit { buffer });
        SpyBuffer(buffer)
    }

    fn prettyprint(&mut self, buffer: &mut SpyBuffer, state: &SpyState, tree: &SpyTree) {
        self.calls.push(Call::Prettyprint { buffer: buffer.0, state: state.0, tree: tree.0 });
    }

    fn serialize(&mut self, state: &SpyState, tree: &SpyTree, buffer: &mut SpyBuffer) {
        self.calls.push(Call::Serialize { state: state.0, tree: tree.0, buffer: buffer.0 });
    }

    fn destroy_tree(&mut self, state: &SpyState, tree: SpyTree) {
        self.released.push(tree.0);
        self.calls.push(Call::DestroyTree { state: state.0, tree: tree.0 });
    }

    fn free_state(&mut self, state: SpyState) {
        self.released.push(state.0);
        self.calls.push(Call::FreeState { state: state.0 });
    }

    fn free_scratch(&mut self, scratch: SpyScratch) {
        self.released.push(scratch.0);
        self.calls.push(Call::FreeScratch { scratch: scratch.0 });
    }

    fn free_buffer(&mut self, buffer: SpyBuffer) {
        self.released.push(buffer.0);
        self.calls.push(Call::FreeBuffer { buffer: buffer.0 });
    }

    fn close_stream(&mut self, stream: SpyStream) {
        self.released.push(stream.0);
        self.calls.push(Call::CloseStream { stream: stream.0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_numbered_in_acquisition_order() {
        let mut spy = SpyParser::new();
        let mut s = spy.open_stream(b"ab").unwrap();
        let (state, scratch, tree) = spy.parse_stream(&mut s).unwrap();

        assert_eq!(
            spy.calls(),
            &[
                Call::OpenStream { len: 2, stream: 0 },
                Call::ParseStream { stream: 0, state: 1, scratch: 2, tree: 3 },
            ]
        );

        spy.destroy_tree(&state, tree);
        spy.free_state(state);
        spy.free_scratch(scratch);
        spy.close_stream(s);
        assert!(spy.all_released());
    }

    #[test]
    fn unreleased_handle_detected() {
        let mut spy = SpyParser::new();
        let s = spy.open_stream(b"x").unwrap();
        assert!(!spy.all_released());
        spy.close_stream(s);
        assert!(spy.all_released());
    }

    #[test]
    fn injected_failures() {
        let mut spy = SpyParser::new();
        spy.fail_open();
        assert!(spy.open_stream(b"x").is_none());

        let mut spy = SpyParser::new();
        let mut s = spy.open_stream(b"x").unwrap();
        spy.fail_parse();
        assert!(spy.parse_stream(&mut s).is_none());
    }
}
