//! Ready-made columns for the common mesh layout.
//!
//! | Preset             | Element  | Properties                 | Type            |
//! |--------------------|----------|----------------------------|-----------------|
//! | `vertex_positions` | `vertex` | `x y z`                    | float           |
//! | `vertex_normals`   | `vertex` | `nx ny nz`                 | float           |
//! | `vertex_colors`    | `vertex` | `red green blue`           | uchar           |
//! | `face_indices`     | `face`   | `vertex_indices`           | list uchar uint |

use super::column::{ListColumn, ScalarColumn};
use super::rows::{ListRow, Rows, ScalarRow};
use crate::util::{Result, ScalarKind};

/// Vertex element name.
pub const VERTEX: &str = "vertex";
/// Face element name.
pub const FACE: &str = "face";
/// Face index list property name.
pub const VERTEX_INDICES: &str = "vertex_indices";

/// `vertex` positions `x y z` as three floats per row.
pub fn vertex_positions<'a, R>(rows: impl Into<Rows<'a, R>>) -> Result<ScalarColumn<'a, R>>
where
    R: ScalarRow<Value = f32>,
{
    ScalarColumn::new(VERTEX, &["x", "y", "z"], rows)
}

/// `vertex` normals `nx ny nz` as three floats per row.
pub fn vertex_normals<'a, R>(rows: impl Into<Rows<'a, R>>) -> Result<ScalarColumn<'a, R>>
where
    R: ScalarRow<Value = f32>,
{
    ScalarColumn::new(VERTEX, &["nx", "ny", "nz"], rows)
}

/// `vertex` colors `red green blue` as three bytes per row.
pub fn vertex_colors<'a, R>(rows: impl Into<Rows<'a, R>>) -> Result<ScalarColumn<'a, R>>
where
    R: ScalarRow<Value = u8>,
{
    ScalarColumn::new(VERTEX, &["red", "green", "blue"], rows)
}

/// `face` `vertex_indices` as a `uchar`-prefixed list of `uint`.
pub fn face_indices<'a, R>(rows: impl Into<Rows<'a, R>>) -> Result<ListColumn<'a, R>>
where
    R: ListRow<Value = u32>,
{
    ListColumn::new(FACE, VERTEX_INDICES, ScalarKind::Uint8, rows)
}
