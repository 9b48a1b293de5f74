//! Utility types and functions for PLY.
//!
//! This module contains fundamental types used throughout the library:
//! - [`ScalarKind`] - Enum of the eight numeric storage kinds
//! - [`Scalar`] - A value of any one kind, with numeric casts
//! - [`PlyPod`] - Rust types that map onto a kind
//! - [`Error`] / [`Result`] - Error handling

mod scalar;
mod error;

pub use scalar::*;
pub use error::*;
