//! Core layer - the in-memory document model.
//!
//! This module provides:
//! - [`Property`] - A scalar or list column
//! - [`Element`] - A named row group with ordered properties
//! - [`Document`] - Comments plus ordered elements

mod document;

pub use document::{Document, Element, Property};
