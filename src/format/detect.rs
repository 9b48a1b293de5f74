//! Format detection - pick the body encoding before committing to a reader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::util::{Error, Result};
use super::Encoding;

/// Number of leading bytes inspected for a format declaration.
pub const DETECT_WINDOW: usize = 1024;

const ASCII_MARKER: &[u8] = b"format ascii";
const BINARY_LE_MARKER: &[u8] = b"format binary_little_endian";

/// Detect the encoding from the leading bytes of a file.
///
/// Exactly one of the two supported declarations must be present; `None`
/// means neither or both were found.
pub fn detect_encoding(head: &[u8]) -> Option<Encoding> {
    let head = &head[..head.len().min(DETECT_WINDOW)];
    match (contains(head, ASCII_MARKER), contains(head, BINARY_LE_MARKER)) {
        (true, false) => Some(Encoding::Ascii),
        (false, true) => Some(Encoding::BinaryLittleEndian),
        _ => None,
    }
}

/// Detect the encoding of the file at `path`.
pub fn detect_format(path: impl AsRef<Path>) -> Result<Encoding> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut head = Vec::with_capacity(DETECT_WINDOW);
    file.take(DETECT_WINDOW as u64).read_to_end(&mut head)?;

    let encoding = detect_encoding(&head).ok_or_else(|| Error::FormatDetection(path.to_path_buf()))?;
    tracing::debug!(path = %path.display(), %encoding, "detected PLY format");
    Ok(encoding)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
