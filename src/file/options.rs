//! Open options for file handles.

use crate::format::Encoding;

/// Default size reservation for mapped writers (100 MiB).
pub const DEFAULT_RESERVE_BYTES: usize = 100 * 1024 * 1024;

/// Options for [`PlyFileWriter::create`](super::PlyFileWriter::create).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// Body encoding.
    pub encoding: Encoding,
    /// Write through a memory-mapped reservation instead of a buffered stream.
    pub use_mmap: bool,
    /// Bytes reserved up front when `use_mmap` is set. The file is truncated
    /// to the bytes actually written on close.
    pub reserve_bytes: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            encoding: Encoding::BinaryLittleEndian,
            use_mmap: false,
            reserve_bytes: DEFAULT_RESERVE_BYTES,
        }
    }
}

impl WriteOptions {
    /// Default options with the given encoding.
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            ..Self::default()
        }
    }

    /// Set the encoding.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Write through a mapped reservation of `reserve_bytes`.
    pub fn with_mmap(mut self, reserve_bytes: usize) -> Self {
        self.use_mmap = true;
        self.reserve_bytes = reserve_bytes;
        self
    }

    /// Write through a buffered stream.
    pub fn buffered(mut self) -> Self {
        self.use_mmap = false;
        self
    }
}
