//! # plyio
//!
//! Reader and writer for PLY point-cloud and mesh files, in ASCII or
//! binary little-endian encoding.
//!
//! Two layers are provided: a raw streaming API over scalars
//! ([`file::PlyReader`], [`file::PlyWriter`]) and a binding engine that
//! projects named file columns straight onto caller-owned arrays
//! ([`bind::bind_read`], [`bind::bind_write`]).
//!
//! ## Modules
//!
//! - [`util`] - Scalar kinds, values and errors
//! - [`core`] - Document model (elements, properties, comments)
//! - [`format`] - Header text, encoding detection and the scalar codec
//! - [`stream`] - Buffered and memory-mapped backing stores
//! - [`file`] - Reader/writer handles and transcoding
//! - [`bind`] - Column descriptors and read/write orchestration
//!
//! ## Example
//!
//! ```ignore
//! use plyio::prelude::*;
//!
//! let points = vec![glam::Vec3::new(0.0, 1.0, 2.0)];
//! let mut writer = PlyFileWriter::create("cloud.ply", WriteOptions::default())?;
//! plyio::bind_write!(&mut writer, vertex_positions(&points)?)?;
//! writer.close()?;
//!
//! let mut loaded: Vec<glam::Vec3> = Vec::new();
//! let mut reader = PlyFileReader::open("cloud.ply")?;
//! plyio::bind_read!(&mut reader, vertex_positions(&mut loaded)?)?;
//! assert_eq!(loaded, points);
//! ```

pub mod util;
pub mod core;
pub mod format;
pub mod stream;
pub mod file;
pub mod bind;

// Re-export commonly used types
pub use util::{Error, Result, Scalar, ScalarKind};
pub use format::Encoding;

/// Library version with the build timestamp embedded by `build.rs`.
pub fn version_string() -> String {
    let date = option_env!("PLYIO_BUILD_DATE").unwrap_or("unknown");
    let time = option_env!("PLYIO_BUILD_TIME").unwrap_or("unknown");
    format!("plyio {} (built {} {})", env!("CARGO_PKG_VERSION"), date, time)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, PlyPod, Result, Scalar, ScalarKind};
    pub use crate::core::{Document, Element, Property};
    pub use crate::format::{detect_format, Encoding};
    pub use crate::file::{transcode, PlyFileReader, PlyFileWriter, PlyReader, PlyWriter, WriteOptions};
    pub use crate::bind::{
        bind_read, bind_write, face_indices, vertex_colors, vertex_normals, vertex_positions,
        ListColumn, ListRow, ReadColumn, Rows, ScalarColumn, ScalarRow, WriteColumn,
    };
}
