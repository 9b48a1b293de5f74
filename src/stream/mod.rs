//! Backing store - sequential byte streams over files.
//!
//! Two interchangeable backends, chosen at open time:
//! - buffered file streams ([`InputStream::Buffered`], [`OutputStream::Buffered`])
//! - memory-mapped regions ([`MappedInput`], [`MappedOutput`]), enabled by
//!   the `mmap` feature

mod input;
mod output;

pub use input::{InputStream, MappedInput};
pub use output::{MappedOutput, OutputStream};
