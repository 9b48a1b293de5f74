//! Whole-document copy between handles, re-encoding the body.

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use super::{PlyFileReader, PlyFileWriter, PlyReader, PlyWriter, ScalarSink, ScalarSource, WriteOptions};
use crate::format::Encoding;
use crate::util::{Error, Result};

/// Headroom added to mapped reservations on top of the size estimate.
const RESERVE_SLACK: u64 = 64 * 1024;

/// Worst-case growth of a body when re-encoded (`-128 ` for one `char`).
const RESERVE_FACTOR: u64 = 6;

/// Copy comments, schema and every row from `reader` into `writer`.
///
/// Values keep their declared kinds; only the encoding may differ. The
/// writer must not have emitted its header yet.
pub fn transcode<R: BufRead, W: Write>(reader: &mut PlyReader<R>, writer: &mut PlyWriter<W>) -> Result<()> {
    let (document, body) = reader.split()?;

    for comment in &document.comments {
        writer.add_comment(comment.clone())?;
    }
    for element in &document.elements {
        writer.add_element(element.clone())?;
    }
    writer.write_header()?;

    for element in &document.elements {
        tracing::trace!(element = %element.name, rows = element.count, "transcoding element");
        for _ in 0..element.count {
            for property in &element.properties {
                if property.is_list() {
                    let len = body.read_list_len(property)?;
                    writer.write_list_len(&property.name, len, property.list_kind)?;
                    for _ in 0..len {
                        let value = body.read_scalar(property.value_kind)?;
                        writer.write_scalar(value)?;
                    }
                } else {
                    let value = body.read_scalar(property.value_kind)?;
                    writer.write_scalar(value)?;
                }
            }
            writer.write_line_end()?;
        }
    }

    writer.flush()
}

/// Re-encode the file at `input` into `output`, returning the bytes written.
///
/// `encoding` defaults to the input's. The result is staged in a temporary
/// file next to `output` and renamed over it only after a successful close,
/// so `output` may be the input file itself and a failed run leaves it
/// untouched. With `use_mmap` the staging file is written through a mapped
/// reservation sized from the input.
pub fn transcode_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    encoding: Option<Encoding>,
    use_mmap: bool,
) -> Result<u64> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let mut reader = PlyFileReader::open(input)?;
    let target = encoding.unwrap_or_else(|| reader.encoding());

    let mut options = WriteOptions::new(target);
    if use_mmap {
        let input_len = fs::metadata(input)?.len();
        let reserve = input_len.saturating_mul(RESERVE_FACTOR).saturating_add(RESERVE_SLACK);
        options = options.with_mmap(usize::try_from(reserve).unwrap_or(usize::MAX));
    }

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staged = tempfile::Builder::new()
        .prefix(".plyio-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|source| Error::Open {
            path: dir.to_path_buf(),
            source,
        })?;
    tracing::debug!(
        input = %input.display(),
        staged = %staged.path().display(),
        from = %reader.encoding(),
        to = %target,
        "transcoding file"
    );

    let mut writer = PlyFileWriter::create(staged.path(), options)?;
    transcode(&mut reader, &mut writer)?;
    writer.close()?;
    // Release the input before it may be replaced.
    drop(reader);

    staged.persist(output).map_err(|e| Error::Open {
        path: output.to_path_buf(),
        source: e.error,
    })?;
    Ok(fs::metadata(output)?.len())
}
