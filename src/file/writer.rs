//! PLY writer handle.

use std::io::Write;
use std::path::Path;

use crate::core::{Document, Element};
use crate::format::{write_header, Codec, Encoding};
use crate::stream::OutputStream;
use crate::util::{Error, Result, Scalar, ScalarKind};
use super::{ScalarSink, WriteOptions};

/// Streaming PLY writer.
///
/// Elements and comments are registered first, then the header is emitted
/// exactly once, then row data follows.
pub struct PlyWriter<W: Write> {
    output: W,
    codec: Codec,
    document: Document,
    header_written: bool,
}

/// Writer over a file backing store.
pub type PlyFileWriter = PlyWriter<OutputStream>;

impl<W: Write> PlyWriter<W> {
    /// Wrap an output stream.
    pub fn new(output: W, encoding: Encoding) -> Self {
        Self {
            output,
            codec: Codec::new(encoding),
            document: Document::new(),
            header_written: false,
        }
    }

    /// Get the body encoding.
    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.codec.encoding()
    }

    /// Schema registered so far.
    #[inline]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Check if the header has been emitted.
    #[inline]
    pub fn header_written(&self) -> bool {
        self.header_written
    }

    /// Add a header comment.
    pub fn add_comment(&mut self, comment: impl Into<String>) -> Result<()> {
        self.ensure_header_open()?;
        self.document.comments.push(comment.into());
        Ok(())
    }

    /// Register an element. Names must be unique.
    pub fn add_element(&mut self, element: Element) -> Result<()> {
        self.ensure_header_open()?;
        if self.document.element(&element.name).is_some() {
            return Err(Error::DuplicateElement(element.name));
        }
        self.document.elements.push(element);
        Ok(())
    }

    /// Emit the header. A second call fails.
    pub fn write_header(&mut self) -> Result<()> {
        self.ensure_header_open()?;
        write_header(&mut self.output, self.codec.encoding(), &self.document)?;
        self.header_written = true;
        tracing::debug!(
            encoding = %self.codec.encoding(),
            elements = self.document.elements.len(),
            "wrote PLY header"
        );
        Ok(())
    }

    /// Write one value in its own kind.
    pub fn write_scalar(&mut self, value: Scalar) -> Result<()> {
        self.ensure_header_written()?;
        self.codec.write_scalar(&mut self.output, value)
    }

    /// Cast `value` to `kind`, then write it.
    pub fn write_scalar_as(&mut self, value: Scalar, kind: ScalarKind) -> Result<()> {
        self.ensure_header_written()?;
        self.codec.write_scalar_as(&mut self.output, value, kind)
    }

    /// Terminate the current row.
    pub fn write_line_end(&mut self) -> Result<()> {
        self.ensure_header_written()?;
        self.codec.write_line_end(&mut self.output)
    }

    /// Flush buffered output.
    pub fn flush(&mut self) -> Result<()> {
        self.output.flush()?;
        Ok(())
    }

    /// Get a reference to the underlying stream.
    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.output
    }

    /// Flush and unwrap the underlying stream.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.output)
    }

    fn ensure_header_open(&self) -> Result<()> {
        if self.header_written {
            Err(Error::HeaderAlreadyWritten)
        } else {
            Ok(())
        }
    }

    fn ensure_header_written(&self) -> Result<()> {
        if self.header_written {
            Ok(())
        } else {
            Err(Error::HeaderNotWritten)
        }
    }
}

impl<W: Write> ScalarSink for PlyWriter<W> {
    fn write_scalar(&mut self, value: Scalar) -> Result<()> {
        PlyWriter::write_scalar(self, value)
    }

    fn write_scalar_as(&mut self, value: Scalar, kind: ScalarKind) -> Result<()> {
        PlyWriter::write_scalar_as(self, value, kind)
    }
}

impl PlyWriter<OutputStream> {
    /// Create a file for writing.
    pub fn create(path: impl AsRef<Path>, options: WriteOptions) -> Result<Self> {
        let output = if options.use_mmap {
            OutputStream::create_mapped(path, options.reserve_bytes)?
        } else {
            OutputStream::create(path)?
        };
        Ok(Self::new(output, options.encoding))
    }

    /// Flush and release the file; the mapped backend is truncated to the
    /// bytes written.
    pub fn close(self) -> Result<()> {
        self.output.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Property;

    fn vertex(count: usize) -> Element {
        Element::new("vertex", count).with_property(Property::scalar("x", ScalarKind::Float32))
    }

    #[test]
    fn test_write_ascii() -> Result<()> {
        let mut writer = PlyWriter::new(Vec::new(), Encoding::Ascii);
        writer.add_comment("unit test")?;
        writer.add_element(vertex(2))?;
        writer.write_header()?;
        writer.write_scalar(Scalar::Float32(1.5))?;
        writer.write_line_end()?;
        writer.write_scalar_as(Scalar::Int32(-2), ScalarKind::Float32)?;
        writer.write_line_end()?;

        let text = String::from_utf8_lossy(&writer.into_inner()?).into_owned();
        assert_eq!(
            text,
            "ply\nformat ascii 1.0\ncomment unit test\nelement vertex 2\nproperty float x\nend_header\n1.5\n-2\n"
        );
        Ok(())
    }

    #[test]
    fn test_duplicate_element() -> Result<()> {
        let mut writer = PlyWriter::new(Vec::new(), Encoding::BinaryLittleEndian);
        writer.add_element(vertex(1))?;
        let err = writer.add_element(vertex(3));
        assert!(matches!(err, Err(Error::DuplicateElement(name)) if name == "vertex"));
        assert!(!writer.header_written());
        assert!(writer.get_ref().is_empty());
        Ok(())
    }

    #[test]
    fn test_header_once() -> Result<()> {
        let mut writer = PlyWriter::new(Vec::new(), Encoding::BinaryLittleEndian);
        assert!(matches!(
            writer.write_scalar(Scalar::Uint8(1)),
            Err(Error::HeaderNotWritten)
        ));
        writer.write_header()?;
        assert!(matches!(writer.write_header(), Err(Error::HeaderAlreadyWritten)));
        assert!(matches!(writer.add_element(vertex(1)), Err(Error::HeaderAlreadyWritten)));
        Ok(())
    }
}
