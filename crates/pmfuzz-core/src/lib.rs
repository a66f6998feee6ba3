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

//! Parse-render-serialize pipeline for the pmfuzz harness.
//!
//! This crate is the body of the fuzzing harness: given one fuzz input, it
//! drives the external parser library through a fixed sequence of calls —
//! open a stream over the bytes, streaming-parse, pretty-print the tree,
//! serialize the tree, and tear every handle down exactly once. It contains
//! no parsing logic of its own; the parser is an external collaborator
//! reached through the [`ParserApi`] trait.
//!
//! # Architecture
//!
//! - [`api`] — the eight-operation surface the harness needs from the
//!   parser library, expressed as a trait over opaque handle types.
//! - [`pipeline`] — the fixed call sequence, with hard contract checks at
//!   the two points where the library contract can be violated. A failed
//!   check aborts (SIGABRT) so the shell's fault handler still runs; it is
//!   a fuzz finding, not a recoverable error.
//! - [`spy`] — a recording implementation of [`ParserApi`] used by the
//!   test suites to verify call counts and ordering.
//! - [`sys`] (feature `libprism`) — the real binding to Prism via
//!   `ruby-prism-sys`.
//!
//! # Example
//!
//! ```rust
//! use pmfuzz_core::{process, spy::SpyParser};
//!
//! let mut api = SpyParser::new();
//! process(&mut api, b"1 + 2");
//! // Every acquired handle was released exactly once.
//! ```

pub mod api;
pub mod pipeline;
pub mod spy;

#[cfg(feature = "libprism")]
pub mod sys;

pub use api::ParserApi;
pub use pipeline::process;
