//! Header codec - the textual preamble of a PLY file.
//!
//! ```text
//! ply
//! format {ascii | binary_little_endian} 1.0
//! comment <text>
//! element <name> <count>
//! property <kind> <name>
//! property list <length kind> <value kind> <name>
//! end_header
//! ```

use std::io::{BufRead, Write};

use crate::core::{Document, Element, Property};
use crate::util::{Error, Result, ScalarKind};
use super::Encoding;

/// Magic line that opens every PLY file.
pub const PLY_MAGIC: &str = "ply";

/// Line that closes the header.
pub const END_HEADER: &str = "end_header";

/// Parse a header from `input`, leaving the stream positioned at the body.
///
/// The format line must match `encoding` exactly. Lines with unknown
/// keywords are skipped.
pub fn parse_header<R: BufRead + ?Sized>(input: &mut R, encoding: Encoding) -> Result<Document> {
    let mut line = Vec::with_capacity(128);

    let magic = next_line(input, &mut line)?;
    if magic.as_deref().map(str::trim_end) != Some(PLY_MAGIC) {
        return Err(Error::header("invalid file format (missing 'ply' magic line)"));
    }

    let format = next_line(input, &mut line)?;
    if format.as_deref().map(str::trim_end) != Some(encoding.format_header()) {
        return Err(Error::header(format!(
            "unsupported PLY format line {:?}, expected '{}'",
            format.unwrap_or_default(),
            encoding.format_header()
        )));
    }

    let mut document = Document::new();
    loop {
        let Some(text) = next_line(input, &mut line)? else {
            return Err(Error::header("stream ended before 'end_header'"));
        };

        let mut tokens = text.split_whitespace();
        match tokens.next() {
            Some(END_HEADER) => break,
            Some("comment") => document.comments.push(comment_text(&text).to_string()),
            Some("element") => document.elements.push(parse_element(tokens)?),
            Some("property") => {
                let current = document
                    .elements
                    .last_mut()
                    .ok_or_else(|| Error::header("property defined without a parent element"))?;
                current.properties.push(parse_property(tokens)?);
            }
            _ => {}
        }
    }

    tracing::debug!(
        encoding = %encoding,
        elements = document.elements.len(),
        comments = document.comments.len(),
        "parsed PLY header"
    );
    Ok(document)
}

/// Serialize a header for `document`. Kind tokens use the short spelling.
pub fn write_header<W: Write + ?Sized>(output: &mut W, encoding: Encoding, document: &Document) -> Result<()> {
    writeln!(output, "{PLY_MAGIC}")?;
    writeln!(output, "{}", encoding.format_header())?;

    for comment in &document.comments {
        writeln!(output, "comment {comment}")?;
    }

    for element in &document.elements {
        writeln!(output, "element {} {}", element.name, element.count)?;
        for p in &element.properties {
            if p.is_list() {
                writeln!(output, "property list {} {} {}", p.list_kind, p.value_kind, p.name)?;
            } else {
                writeln!(output, "property {} {}", p.value_kind, p.name)?;
            }
        }
    }

    writeln!(output, "{END_HEADER}")?;
    Ok(())
}

/// Read one line without its terminator; `None` at end of stream.
fn next_line<R: BufRead + ?Sized>(input: &mut R, buf: &mut Vec<u8>) -> Result<Option<String>> {
    buf.clear();
    if input.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    let text = String::from_utf8_lossy(buf);
    Ok(Some(text.trim_end_matches(['\n', '\r']).to_string()))
}

fn comment_text(line: &str) -> &str {
    let rest = line.trim_start().strip_prefix("comment").unwrap_or_default();
    rest.strip_prefix(' ').unwrap_or(rest)
}

fn parse_element<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Result<Element> {
    let name = tokens
        .next()
        .ok_or_else(|| Error::header("element line without a name"))?;
    let count = tokens
        .next()
        .ok_or_else(|| Error::header(format!("element '{name}' without a count")))?;
    let count = count
        .parse::<usize>()
        .map_err(|_| Error::header(format!("invalid count '{count}' for element '{name}'")))?;
    Ok(Element::new(name, count))
}

fn parse_property<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Result<Property> {
    let first = tokens
        .next()
        .ok_or_else(|| Error::header("property line without a type"))?;

    let property = if first == "list" {
        let list_kind = parse_kind(tokens.next())?;
        let value_kind = parse_kind(tokens.next())?;
        Property::list(property_name(tokens.next())?, list_kind, value_kind)
    } else {
        let value_kind = parse_kind(Some(first))?;
        Property::scalar(property_name(tokens.next())?, value_kind)
    };
    Ok(property)
}

fn parse_kind(token: Option<&str>) -> Result<ScalarKind> {
    let token = token.ok_or_else(|| Error::header("property line missing a scalar type"))?;
    match ScalarKind::from_name(token) {
        Some(kind) if kind.is_numeric() => Ok(kind),
        _ => Err(Error::header(format!("unsupported scalar type '{token}'"))),
    }
}

fn property_name(token: Option<&str>) -> Result<&str> {
    token.ok_or_else(|| Error::header("property line without a name"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    const HEADER: &str = "ply\n\
        format ascii 1.0\n\
        comment made by hand\n\
        obj_info ignored line\n\
        element vertex 2\n\
        property float32 x\n\
        property float y\n\
        property uchar red\n\
        element face 1\n\
        property list uint8 int32 vertex_indices\n\
        end_header\n\
        body";

    #[test]
    fn test_parse_header() -> Result<()> {
        let mut input = Cursor::new(HEADER.as_bytes());
        let doc = parse_header(&mut input, Encoding::Ascii)?;

        assert_eq!(doc.comments, vec!["made by hand".to_string()]);
        assert_eq!(doc.elements.len(), 2);

        let vertex = &doc.elements[0];
        assert_eq!(vertex.name, "vertex");
        assert_eq!(vertex.count, 2);
        assert_eq!(vertex.properties[0], Property::scalar("x", ScalarKind::Float32));
        assert_eq!(vertex.properties[2].value_kind, ScalarKind::Uint8);

        let face = &doc.elements[1];
        assert_eq!(
            face.properties[0],
            Property::list("vertex_indices", ScalarKind::Uint8, ScalarKind::Int32)
        );

        // Stream is left at the body
        let mut rest = String::new();
        input.read_to_string(&mut rest)?;
        assert_eq!(rest, "body");
        Ok(())
    }

    #[test]
    fn test_missing_magic() {
        let mut input = Cursor::new(b"plx\nformat ascii 1.0\nend_header\n".to_vec());
        assert!(matches!(
            parse_header(&mut input, Encoding::Ascii),
            Err(Error::HeaderParse(_))
        ));
    }

    #[test]
    fn test_format_mismatch() {
        let mut input = Cursor::new(HEADER.as_bytes());
        assert!(matches!(
            parse_header(&mut input, Encoding::BinaryLittleEndian),
            Err(Error::HeaderParse(_))
        ));
    }

    #[test]
    fn test_property_without_element() {
        let text = "ply\nformat ascii 1.0\nproperty float x\nend_header\n";
        let err = parse_header(&mut Cursor::new(text.as_bytes()), Encoding::Ascii);
        assert!(matches!(err, Err(Error::HeaderParse(msg)) if msg.contains("parent element")));
    }

    #[test]
    fn test_unknown_kind() {
        let text = "ply\nformat ascii 1.0\nelement v 1\nproperty int64 x\nend_header\n";
        let err = parse_header(&mut Cursor::new(text.as_bytes()), Encoding::Ascii);
        assert!(matches!(err, Err(Error::HeaderParse(msg)) if msg.contains("int64")));
    }

    #[test]
    fn test_truncated_header() {
        let text = "ply\nformat ascii 1.0\nelement v 1\n";
        let err = parse_header(&mut Cursor::new(text.as_bytes()), Encoding::Ascii);
        assert!(matches!(err, Err(Error::HeaderParse(_))));
    }

    #[test]
    fn test_crlf_header() -> Result<()> {
        let text = "ply\r\nformat binary_little_endian 1.0\r\nelement v 0\r\nproperty short s\r\nend_header\r\n";
        let doc = parse_header(&mut Cursor::new(text.as_bytes()), Encoding::BinaryLittleEndian)?;
        assert_eq!(doc.elements[0].properties[0].name, "s");
        Ok(())
    }

    #[test]
    fn test_trailing_blanks_on_magic_and_format() -> Result<()> {
        let text = "ply \nformat ascii 1.0 \t\r\nelement v 1\nproperty uchar c\nend_header\n";
        let doc = parse_header(&mut Cursor::new(text.as_bytes()), Encoding::Ascii)?;
        assert_eq!(doc.elements[0].name, "v");

        // Leading blanks are still a mismatch.
        let text = " ply\nformat ascii 1.0\nend_header\n";
        let err = parse_header(&mut Cursor::new(text.as_bytes()), Encoding::Ascii);
        assert!(matches!(err, Err(Error::HeaderParse(_))));
        Ok(())
    }

    #[test]
    fn test_write_header_short_spelling() -> Result<()> {
        let mut input = Cursor::new(HEADER.as_bytes());
        let doc = parse_header(&mut input, Encoding::Ascii)?;

        let mut out = Vec::new();
        write_header(&mut out, Encoding::BinaryLittleEndian, &doc)?;
        let text = String::from_utf8_lossy(&out);
        assert_eq!(
            text,
            "ply\n\
             format binary_little_endian 1.0\n\
             comment made by hand\n\
             element vertex 2\n\
             property float x\n\
             property float y\n\
             property uchar red\n\
             element face 1\n\
             property list uchar int vertex_indices\n\
             end_header\n"
        );
        Ok(())
    }
}
