//! Output backing store - buffered file or reserved memory-mapped region.
//!
//! The mapped backend pre-sizes the file to a caller-supplied reservation,
//! writes through the mapping, and on close truncates the file to the
//! high-water mark of bytes actually written.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use memmap2::MmapMut;

use crate::util::{Error, Result};
use super::input::ensure_mmap_enabled;

/// Sequential byte sink for writing PLY data.
pub enum OutputStream {
    /// Buffered file access (create/truncate, then append)
    Buffered(BufWriter<File>),
    /// Memory-mapped reservation
    Mapped(MappedOutput),
}

impl OutputStream {
    /// Create a buffered output stream for the given file path.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|source| Error::Open {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "created buffered PLY output");
        Ok(Self::Buffered(BufWriter::with_capacity(2 * 1024 * 1024, file))) // 2MB buffer
    }

    /// Create a memory-mapped output stream reserving `reserve_bytes`.
    pub fn create_mapped(path: impl AsRef<Path>, reserve_bytes: usize) -> Result<Self> {
        Ok(Self::Mapped(MappedOutput::create(path, reserve_bytes)?))
    }

    /// Check if this stream is memory-mapped.
    #[inline]
    pub fn is_mapped(&self) -> bool {
        matches!(self, Self::Mapped(_))
    }

    /// Flush and release the backing store.
    ///
    /// For the mapped backend this unmaps and truncates the file to the
    /// high-water mark. Dropping the stream does the same, but cannot
    /// report errors.
    pub fn close(self) -> Result<()> {
        match self {
            Self::Buffered(mut w) => {
                w.flush()?;
                Ok(())
            }
            Self::Mapped(mut m) => m.close(),
        }
    }
}

impl Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Buffered(w) => w.write(buf),
            Self::Mapped(m) => m.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Self::Buffered(w) => w.write_all(buf),
            Self::Mapped(m) => m.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Buffered(w) => w.flush(),
            Self::Mapped(m) => m.flush(),
        }
    }
}

impl Seek for OutputStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Self::Buffered(w) => w.seek(pos),
            Self::Mapped(m) => m.seek(pos),
        }
    }
}

/// Read-write mapping over a pre-sized file.
///
/// Writes past the reserved extent fail with [`io::ErrorKind::WriteZero`].
/// The release step (flush, unmap, truncate to high-water mark) runs exactly
/// once: on [`close`](Self::close) or, failing that, on drop.
pub struct MappedOutput {
    file: File,
    path: PathBuf,
    map: Option<MmapMut>,
    capacity: usize,
    pos: usize,
    high_water: usize,
}

impl MappedOutput {
    /// Create (or truncate) `path`, reserve `reserve_bytes` and map it.
    pub fn create(path: impl AsRef<Path>, reserve_bytes: usize) -> Result<Self> {
        ensure_mmap_enabled()?;
        let path = path.as_ref();
        let open_error = |source| Error::Open {
            path: path.to_path_buf(),
            source,
        };

        if reserve_bytes == 0 {
            return Err(open_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "mapped output needs a nonzero size reservation",
            )));
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(open_error)?;
        file.set_len(reserve_bytes as u64).map_err(open_error)?;

        // Safety: the handle owns the file exclusively for its lifetime.
        let map = unsafe { MmapMut::map_mut(&file) }.map_err(|e| Error::MmapFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        tracing::debug!(path = %path.display(), reserve_bytes, "mapped PLY output");
        Ok(Self {
            file,
            path: path.to_path_buf(),
            map: Some(map),
            capacity: reserve_bytes,
            pos: 0,
            high_water: 0,
        })
    }

    /// Get the current write position.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Furthest byte offset written so far.
    #[inline]
    pub fn high_water_mark(&self) -> usize {
        self.high_water
    }

    /// Size of the reservation.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if the release step has already run.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.map.is_none()
    }

    /// Flush, unmap and truncate the file to the high-water mark.
    ///
    /// Subsequent calls are no-ops.
    pub fn close(&mut self) -> Result<()> {
        let Some(map) = self.map.take() else {
            return Ok(());
        };
        let flushed = map.flush();
        drop(map);
        self.file.set_len(self.high_water as u64)?;
        flushed?;
        tracing::debug!(
            path = %self.path.display(),
            bytes = self.high_water,
            "released mapped PLY output"
        );
        Ok(())
    }

    fn closed_error() -> io::Error {
        io::Error::new(io::ErrorKind::BrokenPipe, "mapped output already closed")
    }
}

impl Write for MappedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let pos = self.pos;
        let map = self.map.as_mut().ok_or_else(Self::closed_error)?;
        let n = buf.len().min(self.capacity - pos);
        if n == 0 && !buf.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("mapped output reservation of {} bytes exhausted", self.capacity),
            ));
        }
        map[pos..pos + n].copy_from_slice(&buf[..n]);
        self.pos += n;
        self.high_water = self.high_water.max(self.pos);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match &self.map {
            Some(map) => map.flush_range(0, self.high_water.max(1).min(self.capacity)),
            None => Ok(()),
        }
    }
}

impl Seek for MappedOutput {
    /// Seeks are confined to the reserved extent; an out-of-range target
    /// fails and leaves the position unchanged.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let base = match pos {
            SeekFrom::Start(_) => 0i128,
            SeekFrom::Current(_) => self.pos as i128,
            SeekFrom::End(_) => self.capacity as i128,
        };
        let offset = match pos {
            SeekFrom::Start(o) => o as i128,
            SeekFrom::Current(o) | SeekFrom::End(o) => o as i128,
        };
        let target = base + offset;
        if target < 0 || target > self.capacity as i128 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("seek to {target} outside reserved extent 0..={}", self.capacity),
            ));
        }
        self.pos = target as usize;
        Ok(self.pos as u64)
    }
}

impl Drop for MappedOutput {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release mapped PLY output");
        }
    }
}
