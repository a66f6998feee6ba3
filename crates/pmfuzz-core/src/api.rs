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

//! The surface the harness needs from the external parser library.
//!
//! Everything the pipeline does goes through this trait, which keeps the
//! parser itself out of scope: implementations only need to forward each
//! method to the corresponding library entry point. The handle types are
//! opaque to the pipeline — it never inspects them, only passes them back
//! into later calls and releases each one exactly once.
//!
//! The C library initializes the parser state and the intermediate buffer
//! through out-parameters the caller leaves uninitialized. That hazard is
//! not part of this surface: [`ParserApi::parse_stream`] is a factory that
//! returns owned, initialized handles, and any `MaybeUninit` juggling is
//! confined to the FFI implementation.

/// Contract between the pipeline and the external parser library.
///
/// Methods take `&mut self` so that test doubles can record calls without
/// interior mutability; the real FFI binding is stateless and ignores the
/// receiver.
///
/// # Handle lifecycle
///
/// Every handle returned by a method of this trait must be released exactly
/// once through the matching release method, and the tree must be destroyed
/// while the state that produced it is still alive. The pipeline enforces
/// the ordering; implementations only need each individual call to be sound.
pub trait ParserApi {
    /// Readable stream view over one fuzz input.
    type Stream;
    /// Parser state, created and owned by the streaming-parse call.
    type State;
    /// Intermediate buffer the parse call fills as a side effect. Holds the
    /// source text the state and tree point into, so it outlives both.
    type Scratch;
    /// Syntax tree handle.
    type Tree;
    /// Render buffer for pretty-print and serialize output.
    type Buffer;

    /// Open a readable stream over `input`.
    ///
    /// Returns `None` only on an environment failure (e.g. the underlying
    /// stream primitive is unavailable). A `None` here is never a property
    /// of the input bytes.
    fn open_stream(&mut self, input: &[u8]) -> Option<Self::Stream>;

    /// Drive the library's streaming parse over `stream`.
    ///
    /// On success returns the parser state, the intermediate buffer, and
    /// the syntax tree, all owned by the caller. Malformed input still
    /// produces `Some` — the library yields an error-recovery tree rather
    /// than failing. `None` signals a library-contract violation and is
    /// treated as fatal by the pipeline.
    fn parse_stream(
        &mut self,
        stream: &mut Self::Stream,
    ) -> Option<(Self::State, Self::Scratch, Self::Tree)>;

    /// Create an initialized, empty render buffer.
    fn buffer_init(&mut self) -> Self::Buffer;

    /// Render a human-readable dump of `tree` into `buffer`.
    fn prettyprint(&mut self, buffer: &mut Self::Buffer, state: &Self::State, tree: &Self::Tree);

    /// Encode `tree` into the library's binary serialization format.
    fn serialize(&mut self, state: &Self::State, tree: &Self::Tree, buffer: &mut Self::Buffer);

    /// Destroy the tree. `state` must be the state that produced it.
    fn destroy_tree(&mut self, state: &Self::State, tree: Self::Tree);

    /// Release the parser state. All uses of the tree must precede this.
    fn free_state(&mut self, state: Self::State);

    /// Release the intermediate buffer.
    fn free_scratch(&mut self, scratch: Self::Scratch);

    /// Release a render buffer.
    fn free_buffer(&mut self, buffer: Self::Buffer);

    /// Close the input stream.
    fn close_stream(&mut self, stream: Self::Stream);
}
