//! Scalar codec - per-value encode/decode for the two body encodings.
//!
//! Binary values are fixed-width little-endian with no separators. ASCII
//! values are whitespace separated, one row per line, written with the
//! shortest decimal text that parses back to the identical value.

use std::io::{BufRead, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::util::{Error, Result, Scalar, ScalarKind};

/// Body encoding of a PLY file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// `format ascii 1.0`
    Ascii,
    /// `format binary_little_endian 1.0`
    #[default]
    BinaryLittleEndian,
}

impl Encoding {
    /// Check if values are stored as raw bytes.
    #[inline]
    pub const fn is_binary(self) -> bool {
        matches!(self, Self::BinaryLittleEndian)
    }

    /// Format keyword as it appears in the header.
    #[inline]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::BinaryLittleEndian => "binary_little_endian",
        }
    }

    /// Exact format line this encoding reads and writes.
    #[inline]
    pub const fn format_header(self) -> &'static str {
        match self {
            Self::Ascii => "format ascii 1.0",
            Self::BinaryLittleEndian => "format binary_little_endian 1.0",
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Stateful scalar encoder/decoder for one stream.
///
/// The ASCII side tracks whether the current line already holds a value so
/// it can place separators between fields and end rows with a newline.
#[derive(Debug)]
pub struct Codec {
    encoding: Encoding,
    line_open: bool,
    token: Vec<u8>,
}

impl Codec {
    /// Create a codec for the given encoding.
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            line_open: false,
            token: Vec::with_capacity(32),
        }
    }

    /// Get the encoding.
    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Check if values are stored as raw bytes.
    #[inline]
    pub fn is_binary(&self) -> bool {
        self.encoding.is_binary()
    }

    /// Exact format line this codec reads and writes.
    #[inline]
    pub fn format_header(&self) -> &'static str {
        self.encoding.format_header()
    }

    /// Read one value of the given kind.
    pub fn read_scalar<R: BufRead + ?Sized>(&mut self, input: &mut R, kind: ScalarKind) -> Result<Scalar> {
        match self.encoding {
            Encoding::BinaryLittleEndian => read_binary(input, kind),
            Encoding::Ascii => {
                read_token(input, &mut self.token)?;
                parse_token(&self.token, kind)
            }
        }
    }

    /// Write one value in its own kind.
    pub fn write_scalar<W: Write + ?Sized>(&mut self, output: &mut W, value: Scalar) -> Result<()> {
        match self.encoding {
            Encoding::BinaryLittleEndian => write_binary(output, value),
            Encoding::Ascii => {
                if self.line_open {
                    output.write_all(b" ")?;
                }
                write!(output, "{value}")?;
                self.line_open = true;
                Ok(())
            }
        }
    }

    /// Cast `value` to `kind`, then write it.
    pub fn write_scalar_as<W: Write + ?Sized>(
        &mut self,
        output: &mut W,
        value: Scalar,
        kind: ScalarKind,
    ) -> Result<()> {
        self.write_scalar(output, value.cast_to(kind))
    }

    /// Terminate a row (newline for ASCII, nothing for binary).
    pub fn write_line_end<W: Write + ?Sized>(&mut self, output: &mut W) -> Result<()> {
        if self.encoding == Encoding::Ascii {
            output.write_all(b"\n")?;
            self.line_open = false;
        }
        Ok(())
    }
}

fn read_binary<R: BufRead + ?Sized>(input: &mut R, kind: ScalarKind) -> Result<Scalar> {
    let value = match kind {
        ScalarKind::Int8 => input.read_i8().map(Scalar::Int8),
        ScalarKind::Uint8 => input.read_u8().map(Scalar::Uint8),
        ScalarKind::Int16 => input.read_i16::<LittleEndian>().map(Scalar::Int16),
        ScalarKind::Uint16 => input.read_u16::<LittleEndian>().map(Scalar::Uint16),
        ScalarKind::Int32 => input.read_i32::<LittleEndian>().map(Scalar::Int32),
        ScalarKind::Uint32 => input.read_u32::<LittleEndian>().map(Scalar::Uint32),
        ScalarKind::Float32 => input.read_f32::<LittleEndian>().map(Scalar::Float32),
        ScalarKind::Float64 => input.read_f64::<LittleEndian>().map(Scalar::Float64),
        ScalarKind::Unused => return Err(unsupported_kind()),
    };
    value.map_err(Error::from_read)
}

fn write_binary<W: Write + ?Sized>(output: &mut W, value: Scalar) -> Result<()> {
    match value {
        Scalar::Int8(v) => output.write_i8(v)?,
        Scalar::Uint8(v) => output.write_u8(v)?,
        Scalar::Int16(v) => output.write_i16::<LittleEndian>(v)?,
        Scalar::Uint16(v) => output.write_u16::<LittleEndian>(v)?,
        Scalar::Int32(v) => output.write_i32::<LittleEndian>(v)?,
        Scalar::Uint32(v) => output.write_u32::<LittleEndian>(v)?,
        Scalar::Float32(v) => output.write_f32::<LittleEndian>(v)?,
        Scalar::Float64(v) => output.write_f64::<LittleEndian>(v)?,
    }
    Ok(())
}

/// Read the next whitespace-delimited token into `token`.
///
/// Leading whitespace (including newlines) is skipped; the delimiter after
/// the token is left in the stream.
fn read_token<R: BufRead + ?Sized>(input: &mut R, token: &mut Vec<u8>) -> Result<()> {
    token.clear();
    loop {
        let (used, done) = {
            let available = input.fill_buf()?;
            if available.is_empty() {
                return if token.is_empty() {
                    Err(Error::UnexpectedEof)
                } else {
                    Ok(())
                };
            }

            let mut used = 0;
            let mut done = false;
            for &b in available {
                if b.is_ascii_whitespace() {
                    if !token.is_empty() {
                        done = true;
                        break;
                    }
                } else {
                    token.push(b);
                }
                used += 1;
            }
            (used, done)
        };
        input.consume(used);
        if done {
            return Ok(());
        }
    }
}

fn parse_token(token: &[u8], kind: ScalarKind) -> Result<Scalar> {
    let text = std::str::from_utf8(token).map_err(|_| parse_error(token, kind))?;
    let value = match kind {
        ScalarKind::Int8 => text.parse().ok().map(Scalar::Int8),
        ScalarKind::Uint8 => text.parse().ok().map(Scalar::Uint8),
        ScalarKind::Int16 => text.parse().ok().map(Scalar::Int16),
        ScalarKind::Uint16 => text.parse().ok().map(Scalar::Uint16),
        ScalarKind::Int32 => text.parse().ok().map(Scalar::Int32),
        ScalarKind::Uint32 => text.parse().ok().map(Scalar::Uint32),
        ScalarKind::Float32 => text.parse().ok().map(Scalar::Float32),
        ScalarKind::Float64 => text.parse().ok().map(Scalar::Float64),
        ScalarKind::Unused => return Err(unsupported_kind()),
    };
    value.ok_or_else(|| parse_error(token, kind))
}

fn parse_error(token: &[u8], kind: ScalarKind) -> Error {
    Error::ParseValue {
        token: String::from_utf8_lossy(token).into_owned(),
        kind: kind.name().to_string(),
    }
}

fn unsupported_kind() -> Error {
    Error::other("cannot encode or decode a value of kind 'unused'")
}
