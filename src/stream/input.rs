//! Input backing store - buffered file or memory-mapped region.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use memmap2::Mmap;

use crate::util::{Error, Result};

/// Sequential byte source for reading PLY data.
/// Supports both memory-mapped and buffered I/O modes.
pub enum InputStream {
    /// Buffered file access
    Buffered(BufReader<File>),
    /// Memory-mapped file (zero-copy)
    Mapped(MappedInput),
}

impl InputStream {
    /// Open a file for reading.
    ///
    /// Requesting mapping in a build without the `mmap` feature fails here,
    /// not at first read.
    pub fn open(path: impl AsRef<Path>, use_mmap: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;

        if use_mmap {
            ensure_mmap_enabled()?;
            // Safety: mapped read-only; concurrent truncation by another
            // process is outside the single-owner model of this handle.
            let map = unsafe { Mmap::map(&file) }.map_err(|e| Error::MmapFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            tracing::debug!(path = %path.display(), size = map.len(), "mapped PLY input");
            Ok(Self::Mapped(MappedInput::new(map)))
        } else {
            tracing::debug!(path = %path.display(), "opened buffered PLY input");
            Ok(Self::Buffered(BufReader::with_capacity(1024 * 1024, file)))
        }
    }

    /// Check if this stream is memory-mapped.
    #[inline]
    pub fn is_mapped(&self) -> bool {
        matches!(self, Self::Mapped(_))
    }
}

impl Read for InputStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Buffered(r) => r.read(buf),
            Self::Mapped(m) => m.read(buf),
        }
    }
}

impl BufRead for InputStream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            Self::Buffered(r) => r.fill_buf(),
            Self::Mapped(m) => m.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            Self::Buffered(r) => r.consume(amt),
            Self::Mapped(m) => m.consume(amt),
        }
    }
}

/// Read-only mapped file exposed as a cursor-advancing byte source.
pub struct MappedInput {
    map: Mmap,
    pos: usize,
}

impl MappedInput {
    fn new(map: Mmap) -> Self {
        Self { map, pos: 0 }
    }

    /// Get the current read position.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get the total mapped size.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the mapping is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Bytes not yet consumed.
    #[inline]
    pub fn remaining(&self) -> &[u8] {
        &self.map[self.pos..]
    }
}

impl Read for MappedInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.remaining().read(buf)?;
        self.pos += n;
        Ok(n)
    }
}

impl BufRead for MappedInput {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(self.remaining())
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.map.len());
    }
}

#[inline]
pub(crate) fn ensure_mmap_enabled() -> Result<()> {
    if cfg!(feature = "mmap") {
        Ok(())
    } else {
        Err(Error::MmapUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_with(data: &[u8]) -> Result<NamedTempFile> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(data)?;
        temp.flush()?;
        Ok(temp)
    }

    #[test]
    fn test_buffered_read() -> Result<()> {
        let temp = temp_with(b"hello world")?;
        let mut input = InputStream::open(temp.path(), false)?;
        assert!(!input.is_mapped());
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        assert_eq!(text, "hello world");
        Ok(())
    }

    #[cfg(feature = "mmap")]
    #[test]
    fn test_mapped_cursor() -> Result<()> {
        let temp = temp_with(b"line one\nline two\n")?;
        let mut input = InputStream::open(temp.path(), true)?;
        assert!(input.is_mapped());

        let mut line = String::new();
        input.read_line(&mut line)?;
        assert_eq!(line, "line one\n");

        let Some(mapped) = (match &input {
            InputStream::Mapped(m) => Some(m),
            InputStream::Buffered(_) => None,
        }) else {
            panic!("expected mapped input");
        };
        assert_eq!(mapped.position(), 9);
        assert_eq!(mapped.remaining(), b"line two\n");

        let mut rest = Vec::new();
        input.read_to_end(&mut rest)?;
        assert_eq!(rest, b"line two\n");
        Ok(())
    }

    #[cfg(not(feature = "mmap"))]
    #[test]
    fn test_mapping_disabled() -> Result<()> {
        let temp = temp_with(b"x")?;
        assert!(matches!(
            InputStream::open(temp.path(), true),
            Err(Error::MmapUnavailable)
        ));
        Ok(())
    }

    #[test]
    fn test_open_missing() {
        let err = InputStream::open("/nonexistent/dir/file.ply", false);
        assert!(matches!(err, Err(Error::Open { .. })));
    }
}
