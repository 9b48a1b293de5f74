//! PLY format codec.
//!
//! ## File Structure
//!
//! ```text
//! +---------------------------+
//! | ply                       |  magic line
//! | format <encoding> 1.0     |  ascii | binary_little_endian
//! | comment / element /       |
//! | property lines            |  schema
//! | end_header                |
//! +---------------------------+
//! | body                      |  element-major, row-major,
//! |                           |  properties in declared order
//! +---------------------------+
//! ```
//!
//! Big-endian bodies are not supported.

mod codec;
mod detect;
mod header;

pub use codec::*;
pub use detect::*;
pub use header::*;
