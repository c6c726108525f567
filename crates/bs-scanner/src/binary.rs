//! Binary-versus-text classification of a byte stream.
//!
//! The heuristic mirrors what large-file trackers care about: a stream is
//! binary when it contains a NUL byte, unless it opens with a known
//! byte-order mark, in which case it is some flavor of encoded text (UTF-16
//! and friends are full of NUL bytes but are not binaries).
//!
//! Streams are read in 1024-byte blocks. The BOM check runs on the first
//! block only; the NUL scan runs on every block, restricted to the bytes the
//! read actually returned. An empty stream is text.

use std::fs::File;
use std::io::{self, Read};

use camino::Utf8Path;

use crate::bom;

/// Block size used when probing a stream.
const BLOCK_SIZE: usize = 1024;

/// Outcome of classifying one file's byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// The stream contains a NUL byte and no leading BOM.
    Binary,
    /// Everything else, including empty and BOM-prefixed streams.
    Text,
}

impl FileKind {
    /// Whether this is [`FileKind::Binary`].
    #[must_use]
    pub const fn is_binary(self) -> bool {
        matches!(self, Self::Binary)
    }
}

/// Classifies a byte stream as binary or text.
///
/// Read failures are not classification outcomes; they propagate for the
/// caller to count as inaccessible.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use bs_scanner::{FileKind, classify_reader};
///
/// let kind = classify_reader(Cursor::new(b"ascii only".to_vec()))?;
/// assert_eq!(kind, FileKind::Text);
///
/// let kind = classify_reader(Cursor::new(vec![0x7F, b'E', b'L', b'F', 0x00]))?;
/// assert_eq!(kind, FileKind::Binary);
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn classify_reader<R: Read>(mut reader: R) -> io::Result<FileKind> {
    let mut block = [0_u8; BLOCK_SIZE];
    let mut is_first_block = true;

    loop {
        let bytes_read = match reader.read(&mut block) {
            Ok(0) => return Ok(FileKind::Text),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        if is_first_block {
            if let Some(encoding) = bom::detect(&block[..bytes_read]) {
                tracing::trace!(encoding, "byte-order mark found, stream is text");
                return Ok(FileKind::Text);
            }
            is_first_block = false;
        }

        if block[..bytes_read].contains(&0) {
            return Ok(FileKind::Binary);
        }
    }
}

/// Opens `path` and classifies its content.
///
/// # Errors
///
/// Propagates the open/read error; permission failures are counted by the
/// caller, not here.
pub fn classify_file(path: &Utf8Path) -> io::Result<FileKind> {
    let file = File::open(path)?;
    classify_reader(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn classify(bytes: Vec<u8>) -> FileKind {
        classify_reader(Cursor::new(bytes)).unwrap_or(FileKind::Text)
    }

    #[test]
    fn test_empty_stream_is_text() {
        assert_eq!(classify(Vec::new()), FileKind::Text);
    }

    #[test]
    fn test_pure_ascii_is_text() {
        assert_eq!(classify(b"fn main() {}\n".to_vec()), FileKind::Text);
    }

    #[test]
    fn test_nul_in_first_block_is_binary() {
        let mut bytes = vec![b'x'; 100];
        bytes[50] = 0;
        assert_eq!(classify(bytes), FileKind::Binary);
    }

    #[test]
    fn test_nul_as_final_byte_of_stream_is_binary() {
        let mut bytes = vec![b'x'; 64];
        bytes.push(0);
        assert_eq!(classify(bytes), FileKind::Binary);
    }

    #[test]
    fn test_nul_in_later_block_is_binary() {
        let mut bytes = vec![b'x'; 3000];
        bytes[2500] = 0;
        assert_eq!(classify(bytes), FileKind::Binary);
    }

    #[test]
    fn test_bom_wins_over_nul_bytes() {
        // UTF-16 LE text: BOM then NUL-interleaved ASCII.
        let mut bytes = vec![0xFF, 0xFE];
        for byte in b"hello" {
            bytes.push(*byte);
            bytes.push(0);
        }
        assert_eq!(classify(bytes), FileKind::Text);
    }

    #[test]
    fn test_bom_only_honored_on_first_block() {
        // A BOM sequence starting beyond the first block does not rescue a
        // stream that carries NUL bytes there.
        let mut bytes = vec![b'x'; BLOCK_SIZE];
        bytes.extend_from_slice(&[0xFF, 0xFE]);
        bytes.push(0);
        assert_eq!(classify(bytes), FileKind::Binary);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let bytes: Vec<u8> = (0..200).map(|i| u8::try_from(i % 96).unwrap_or(1) + 32).collect();
        let first = classify(bytes.clone());
        let second = classify(bytes);
        assert_eq!(first, second);
    }
}
