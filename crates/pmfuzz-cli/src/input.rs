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

//! Fuzz input acquisition.
//!
//! Accumulates stdin into a buffer with an enforced maximum. Fuzz inputs
//! are tiny by construction, so the cap is small and fixed; input past the
//! cap is silently left unread rather than rejected, matching how the
//! harness has always behaved (the excess simply never reaches the
//! pipeline).

use crate::error::ShellError;
use std::io::{ErrorKind, Read};
use tracing::debug;

/// Maximum number of fuzz input bytes accepted per invocation.
pub const INPUT_CAP: usize = 512;

/// Read from `reader` until end-of-file or until `cap` bytes have
/// accumulated, whichever comes first.
///
/// Interrupted reads are retried. Any other read error aborts acquisition:
/// the caller must not run the pipeline and must exit non-zero. End-of-file
/// with zero bytes is not an error — the empty input is a valid fuzz case.
pub fn read_input<R: Read>(reader: &mut R, cap: usize) -> Result<Vec<u8>, ShellError> {
    let mut buf = vec![0u8; cap];
    let mut filled = 0;

    while filled < cap {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ShellError::from(e)),
        }
    }

    buf.truncate(filled);
    debug!(bytes = filled, cap, "fuzz input acquired");
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};

    // ==================== Accumulation ====================

    #[test]
    fn reads_to_eof() {
        let mut reader = Cursor::new(b"puts 1".to_vec());
        let input = read_input(&mut reader, INPUT_CAP).unwrap();
        assert_eq!(input, b"puts 1");
    }

    #[test]
    fn empty_stream_yields_empty_input() {
        let mut reader = Cursor::new(Vec::new());
        let input = read_input(&mut reader, INPUT_CAP).unwrap();
        assert!(input.is_empty());
    }

    /// Reader that hands out one byte per call, forcing accumulation
    /// across many short reads.
    struct OneByteReader(Cursor<Vec<u8>>);

    impl Read for OneByteReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let end = buf.len().min(1);
            self.0.read(&mut buf[..end])
        }
    }

    #[test]
    fn accumulates_across_short_reads() {
        let mut reader = OneByteReader(Cursor::new(b"a + b".to_vec()));
        let input = read_input(&mut reader, INPUT_CAP).unwrap();
        assert_eq!(input, b"a + b");
    }

    // ==================== Cap boundary ====================

    #[test]
    fn input_of_exactly_cap_accepted_in_full() {
        let data = vec![b'x'; INPUT_CAP];
        let mut reader = Cursor::new(data.clone());
        let input = read_input(&mut reader, INPUT_CAP).unwrap();
        assert_eq!(input, data);
    }

    #[test]
    fn excess_is_truncated_not_rejected() {
        let mut data = vec![b'y'; INPUT_CAP];
        data.push(b'!');
        let mut reader = Cursor::new(data);

        let input = read_input(&mut reader, INPUT_CAP).unwrap();
        assert_eq!(input.len(), INPUT_CAP);
        assert!(input.iter().all(|&b| b == b'y'));

        // The excess byte is still sitting unread in the stream.
        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"!");
    }

    #[test]
    fn one_under_cap_accepted_in_full() {
        let data = vec![b'z'; INPUT_CAP - 1];
        let mut reader = Cursor::new(data.clone());
        let input = read_input(&mut reader, INPUT_CAP).unwrap();
        assert_eq!(input, data);
    }

    // ==================== Error handling ====================

    /// Reader that fails with the given kind after an optional prefix.
    struct FailingReader {
        prefix: Vec<u8>,
        kind: ErrorKind,
        failed: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.prefix.is_empty() {
                let n = self.prefix.len().min(buf.len());
                buf[..n].copy_from_slice(&self.prefix[..n]);
                self.prefix.drain(..n);
                return Ok(n);
            }
            if self.failed {
                return Ok(0);
            }
            self.failed = true;
            Err(io::Error::new(self.kind, "boom"))
        }
    }

    #[test]
    fn stream_error_is_reported() {
        let mut reader =
            FailingReader { prefix: Vec::new(), kind: ErrorKind::Other, failed: false };
        let err = read_input(&mut reader, INPUT_CAP).unwrap_err();
        assert!(matches!(err, ShellError::Read { .. }));
    }

    #[test]
    fn stream_error_after_partial_read_is_still_reported() {
        let mut reader = FailingReader {
            prefix: b"partial".to_vec(),
            kind: ErrorKind::Other,
            failed: false,
        };
        assert!(read_input(&mut reader, INPUT_CAP).is_err());
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let mut reader = FailingReader {
            prefix: b"ok".to_vec(),
            kind: ErrorKind::Interrupted,
            failed: false,
        };
        // Interrupted after the prefix, then EOF: input is just the prefix.
        let input = read_input(&mut reader, INPUT_CAP).unwrap();
        assert_eq!(input, b"ok");
    }
}
