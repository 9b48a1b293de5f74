//! Error types for the PLY library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for PLY operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File cannot be opened, created or resized
    #[error("Cannot open file '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Memory mapping failed
    #[error("Memory mapping failed for '{}': {reason}", path.display())]
    MmapFailed { path: PathBuf, reason: String },

    /// Memory-mapped backend requested but compiled out
    #[error("File mapping is disabled in this build (enable the `mmap` feature)")]
    MmapUnavailable,

    /// Header declares zero or both of the supported encodings
    #[error("Unsupported or ambiguous PLY format in header of '{}'", .0.display())]
    FormatDetection(PathBuf),

    /// Malformed header text
    #[error("Header parse error: {0}")]
    HeaderParse(String),

    /// Two write-side elements share a name
    #[error("Duplicate element name '{0}' is not allowed")]
    DuplicateElement(String),

    /// Two bound columns claim the same (element, property) pair
    #[error("Multiple columns bind property '{property}' of element '{element}'")]
    PropertyConflict { element: String, property: String },

    /// Bound column names a property the file does not declare
    #[error("Missing property '{property}' in element '{element}'")]
    MissingProperty { element: String, property: String },

    /// List-vs-scalar disagreement between file schema and column
    #[error("Type mismatch for '{element}.{property}': expected {expected}, got {actual}")]
    TypeMismatch {
        element: String,
        property: String,
        expected: String,
        actual: String,
    },

    /// Row counts disagree for one element
    #[error("Element count mismatch for '{element}': expected {expected}, got {actual}")]
    ElementCountMismatch {
        element: String,
        expected: usize,
        actual: usize,
    },

    /// ASCII token not parseable as the requested kind
    #[error("Failed to parse ASCII value '{token}' as {kind}")]
    ParseValue { token: String, kind: String },

    /// Header emitted twice
    #[error("Header has already been written")]
    HeaderAlreadyWritten,

    /// Row data written before the header
    #[error("Header must be written before row data")]
    HeaderNotWritten,

    /// Column descriptor rejected at construction
    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    /// Read-only view passed where rows must be filled
    #[error("Column for element '{0}' is a read-only view and cannot be read into")]
    ReadOnlyColumn(String),

    /// List count that cannot frame a list
    #[error("Invalid list length {length} for property '{property}'")]
    InvalidListLength { property: String, length: String },

    /// Stream exhausted while a value was expected
    #[error("Unexpected end of stream")]
    UnexpectedEof,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a header parse error.
    pub fn header(msg: impl Into<String>) -> Self {
        Self::HeaderParse(msg.into())
    }

    /// Create an invalid column error.
    pub fn column(msg: impl Into<String>) -> Self {
        Self::InvalidColumn(msg.into())
    }

    /// Map an I/O error, turning a short read into [`Error::UnexpectedEof`].
    pub(crate) fn from_read(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::UnexpectedEof
        } else {
            Self::Io(e)
        }
    }
}

/// Result type alias for PLY operations.
pub type Result<T> = std::result::Result<T, Error>;
