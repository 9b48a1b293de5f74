//! PLY reader handle.

use std::io::BufRead;
use std::path::Path;

use crate::core::{Document, Element};
use crate::format::{detect_format, parse_header, Codec, Encoding};
use crate::stream::InputStream;
use crate::util::{Error, Result, Scalar, ScalarKind};
use super::ScalarSource;

/// Body side of a reader: the input stream and its codec.
pub struct BodyReader<R> {
    input: R,
    codec: Codec,
}

impl<R: BufRead> ScalarSource for BodyReader<R> {
    #[inline]
    fn read_scalar(&mut self, kind: ScalarKind) -> Result<Scalar> {
        self.codec.read_scalar(&mut self.input, kind)
    }
}

/// Streaming PLY reader.
///
/// The schema is parsed on first access and cached; later calls return the
/// cached [`Document`] without touching the stream.
pub struct PlyReader<R> {
    body: BodyReader<R>,
    document: Option<Document>,
}

/// Reader over a file backing store.
pub type PlyFileReader = PlyReader<InputStream>;

impl<R: BufRead> PlyReader<R> {
    /// Wrap a stream positioned at the start of a PLY file.
    pub fn new(input: R, encoding: Encoding) -> Self {
        Self {
            body: BodyReader {
                input,
                codec: Codec::new(encoding),
            },
            document: None,
        }
    }

    /// Get the body encoding.
    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.body.codec.encoding()
    }

    /// Parse the header (once) and return the schema.
    pub fn parse_header(&mut self) -> Result<&Document> {
        let encoding = self.encoding();
        let document = match self.document.take() {
            Some(document) => document,
            None => parse_header(&mut self.body.input, encoding)?,
        };
        Ok(self.document.insert(document))
    }

    /// Get the schema if the header has been parsed.
    #[inline]
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Header comments (parses the header if needed).
    pub fn comments(&mut self) -> Result<&[String]> {
        Ok(&self.parse_header()?.comments)
    }

    /// Declared elements (parses the header if needed).
    pub fn elements(&mut self) -> Result<&[Element]> {
        Ok(&self.parse_header()?.elements)
    }

    /// Read one body value of the given kind.
    pub fn read_scalar(&mut self, kind: ScalarKind) -> Result<Scalar> {
        self.parse_header()?;
        self.body.read_scalar(kind)
    }

    /// Split into the parsed schema and the body stream.
    pub fn split(&mut self) -> Result<(&Document, &mut BodyReader<R>)> {
        self.parse_header()?;
        let Self { body, document } = self;
        let document = document
            .as_ref()
            .ok_or_else(|| Error::other("header not available"))?;
        Ok((document, body))
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> R {
        self.body.input
    }
}

impl<R: BufRead> ScalarSource for PlyReader<R> {
    fn read_scalar(&mut self, kind: ScalarKind) -> Result<Scalar> {
        PlyReader::read_scalar(self, kind)
    }
}

impl PlyReader<InputStream> {
    /// Open a file for reading, memory-mapped when the `mmap` feature is on.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_opts(path, cfg!(feature = "mmap"))
    }

    /// Open a file with optional memory mapping.
    ///
    /// The encoding is detected from the first kilobyte before the header
    /// is parsed.
    pub fn open_opts(path: impl AsRef<Path>, use_mmap: bool) -> Result<Self> {
        let path = path.as_ref();
        let encoding = detect_format(path)?;
        let input = InputStream::open(path, use_mmap)?;
        Ok(Self::new(input, encoding))
    }
}
