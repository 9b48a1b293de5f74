//! Reader and writer handles.
//!
//! [`PlyReader`] and [`PlyWriter`] work over any buffered stream; the
//! [`PlyFileReader`] / [`PlyFileWriter`] aliases bind them to the file
//! backing stores in [`crate::stream`].
//!
//! ## Example
//!
//! ```ignore
//! use plyio::file::{PlyFileReader, PlyFileWriter, WriteOptions};
//!
//! let mut reader = PlyFileReader::open("cloud.ply")?;
//! for element in reader.elements()? {
//!     println!("{} x {}", element.name, element.count);
//! }
//! ```

mod options;
mod reader;
mod writer;
mod transcode;

pub use options::*;
pub use reader::*;
pub use writer::*;
pub use transcode::*;

use crate::core::Property;
use crate::util::{Error, Result, Scalar, ScalarKind};

/// Something values can be pulled from, one scalar at a time.
pub trait ScalarSource {
    /// Read one value of the given kind.
    fn read_scalar(&mut self, kind: ScalarKind) -> Result<Scalar>;

    /// Read the length prefix of a list property.
    fn read_list_len(&mut self, property: &Property) -> Result<usize> {
        let raw = self.read_scalar(property.list_kind)?;
        raw.to_len().ok_or_else(|| Error::InvalidListLength {
            property: property.name.clone(),
            length: raw.to_string(),
        })
    }

    /// Consume one row's worth of `property` without keeping it.
    fn skip_property(&mut self, property: &Property) -> Result<()> {
        if property.is_list() {
            let len = self.read_list_len(property)?;
            for _ in 0..len {
                self.read_scalar(property.value_kind)?;
            }
        } else {
            self.read_scalar(property.value_kind)?;
        }
        Ok(())
    }
}

/// Something values can be pushed into, one scalar at a time.
pub trait ScalarSink {
    /// Write one value in its own kind.
    fn write_scalar(&mut self, value: Scalar) -> Result<()>;

    /// Cast `value` to `kind`, then write it.
    fn write_scalar_as(&mut self, value: Scalar, kind: ScalarKind) -> Result<()> {
        self.write_scalar(value.cast_to(kind))
    }

    /// Write a list length prefix in `kind`, rejecting lengths it cannot hold.
    fn write_list_len(&mut self, property: &str, len: usize, kind: ScalarKind) -> Result<()> {
        let too_long = || Error::InvalidListLength {
            property: property.to_string(),
            length: len.to_string(),
        };
        let prefix = Scalar::Uint32(u32::try_from(len).map_err(|_| too_long())?).cast_to(kind);
        if prefix.to_len() != Some(len) {
            return Err(too_long());
        }
        self.write_scalar(prefix)
    }
}
