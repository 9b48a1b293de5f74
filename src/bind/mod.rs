//! Property binding engine.
//!
//! Column descriptors project named properties of one element onto
//! caller-owned row containers. [`bind_read`] fills them from a reader,
//! [`bind_write`] emits a header and body from them.
//!
//! ## Example
//!
//! ```ignore
//! use plyio::bind::{face_indices, vertex_positions};
//! use plyio::file::PlyFileReader;
//!
//! let mut points: Vec<glam::Vec3> = Vec::new();
//! let mut faces: Vec<Vec<u32>> = Vec::new();
//!
//! let mut reader = PlyFileReader::open("mesh.ply")?;
//! let mut positions = vertex_positions(&mut points)?;
//! let mut indices = face_indices(&mut faces)?;
//! plyio::bind_read!(&mut reader, positions, indices)?;
//! ```

mod column;
mod conflict;
mod presets;
mod read;
mod rows;
mod write;

pub use column::{ColumnSpec, ListColumn, ReadColumn, ScalarColumn, WriteColumn};
pub use conflict::check_conflicts;
pub use presets::*;
pub use read::bind_read;
pub use rows::{ListRow, Rows, ScalarRow};
pub use write::bind_write;

/// Read a file into any number of columns.
///
/// `bind_read!(reader, a, b, ...)` is `bind_read(reader, &mut [&mut a, &mut b, ...])`.
#[macro_export]
macro_rules! bind_read {
    ($reader:expr $(, $column:expr)* $(,)?) => {
        $crate::bind::bind_read(
            $reader,
            &mut [$(&mut $column as &mut dyn $crate::bind::ReadColumn),*],
        )
    };
}

/// Write any number of columns to a file.
///
/// `bind_write!(writer, a, b, ...)` is `bind_write(writer, &[&a, &b, ...])`.
#[macro_export]
macro_rules! bind_write {
    ($writer:expr $(, $column:expr)* $(,)?) => {
        $crate::bind::bind_write(
            $writer,
            &[$(&$column as &dyn $crate::bind::WriteColumn),*],
        )
    };
}
