//! Integration tests for file handles, format detection and backing stores.

use std::fs;
use std::io::Write;

use plyio::core::{Element, Property};
use plyio::file::{transcode, transcode_file, PlyFileReader, PlyFileWriter, WriteOptions};
use plyio::format::detect_format;
use plyio::{Encoding, Error, Scalar, ScalarKind};

use tempfile::{tempdir, NamedTempFile};

fn write_text(contents: &[u8]) -> NamedTempFile {
    let mut temp = NamedTempFile::new().expect("Failed to create temp file");
    temp.write_all(contents).expect("Failed to write temp file");
    temp.flush().expect("Failed to flush temp file");
    temp
}

const ASCII_CUBE: &str = "ply\n\
format ascii 1.0\n\
comment corner of a cube\n\
element vertex 3\n\
property float x\n\
property float y\n\
property float z\n\
element face 1\n\
property list uchar int vertex_indices\n\
end_header\n\
0 0 0\n\
1 0 0\n\
1 1 0\n\
3 0 1 2\n";

#[test]
fn test_detect_format() {
    let ascii = write_text(ASCII_CUBE.as_bytes());
    assert_eq!(detect_format(ascii.path()).expect("detect"), Encoding::Ascii);

    let binary = write_text(b"ply\nformat binary_little_endian 1.0\nend_header\n");
    assert_eq!(detect_format(binary.path()).expect("detect"), Encoding::BinaryLittleEndian);
}

#[test]
fn test_ambiguous_header_rejected() {
    let both = write_text(
        b"ply\nformat ascii 1.0\ncomment format binary_little_endian 1.0\nend_header\n",
    );
    assert!(matches!(detect_format(both.path()), Err(Error::FormatDetection(_))));
    assert!(matches!(PlyFileReader::open(both.path()), Err(Error::FormatDetection(_))));

    let neither = write_text(b"ply\nformat binary_big_endian 1.0\nend_header\n");
    assert!(matches!(detect_format(neither.path()), Err(Error::FormatDetection(_))));
}

#[test]
fn test_open_missing_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let err = PlyFileReader::open(dir.path().join("absent.ply"));
    assert!(matches!(err, Err(Error::Open { .. })));
}

#[test]
fn test_idempotent_schema_fetch() {
    let file = write_text(ASCII_CUBE.as_bytes());
    let mut reader = PlyFileReader::open_opts(file.path(), false).expect("Failed to open");
    assert!(reader.document().is_none());

    let first = reader.parse_header().expect("Failed to parse").clone();
    let second = reader.parse_header().expect("Failed to parse").clone();
    assert_eq!(first, second);
    assert_eq!(first.comments, ["corner of a cube".to_string()]);
    assert_eq!(first.elements.len(), 2);

    // The body still starts at the first row.
    assert_eq!(reader.read_scalar(ScalarKind::Float32).expect("read"), Scalar::Float32(0.0));
}

#[test]
fn test_duplicate_element_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("dup.ply");
    let mut writer = PlyFileWriter::create(&path, WriteOptions::default()).expect("Failed to create");

    writer
        .add_element(Element::new("vertex", 1).with_property(Property::scalar("x", ScalarKind::Float32)))
        .expect("first vertex");
    let err = writer.add_element(Element::new("vertex", 2));
    assert!(matches!(err, Err(Error::DuplicateElement(ref name)) if name == "vertex"));
    assert!(!writer.header_written());
    writer.close().expect("Failed to close");

    assert_eq!(fs::metadata(&path).expect("metadata").len(), 0);
}

#[test]
fn test_raw_write_read() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("raw.ply");

    let mut writer = PlyFileWriter::create(&path, WriteOptions::new(Encoding::BinaryLittleEndian))
        .expect("Failed to create");
    writer
        .add_element(
            Element::new("point", 2)
                .with_property(Property::scalar("h", ScalarKind::Int16))
                .with_property(Property::scalar("w", ScalarKind::Float64)),
        )
        .expect("add element");
    writer.write_header().expect("write header");
    for (h, w) in [(-2i16, 0.5f64), (300, -1.25)] {
        writer.write_scalar(Scalar::Int16(h)).expect("write");
        writer.write_scalar_as(Scalar::Float32(w as f32), ScalarKind::Float64).expect("write");
        writer.write_line_end().expect("line end");
    }
    writer.close().expect("Failed to close");

    let header_len = "ply\nformat binary_little_endian 1.0\nelement point 2\nproperty short h\nproperty double w\nend_header\n".len();
    assert_eq!(fs::metadata(&path).expect("metadata").len() as usize, header_len + 2 * 10);

    let mut reader = PlyFileReader::open(&path).expect("Failed to open");
    let elements = reader.elements().expect("parse").to_vec();
    assert_eq!(elements[0].binary_row_size(), Some(10));
    assert_eq!(reader.read_scalar(ScalarKind::Int16).expect("read"), Scalar::Int16(-2));
    assert_eq!(reader.read_scalar(ScalarKind::Float64).expect("read"), Scalar::Float64(0.5));
    assert_eq!(reader.read_scalar(ScalarKind::Int16).expect("read"), Scalar::Int16(300));
    assert_eq!(reader.read_scalar(ScalarKind::Float64).expect("read"), Scalar::Float64(-1.25));
    assert!(matches!(reader.read_scalar(ScalarKind::Uint8), Err(Error::UnexpectedEof)));
}

#[test]
fn test_transcode_files() {
    let source = write_text(ASCII_CUBE.as_bytes());
    let dir = tempdir().expect("Failed to create temp dir");
    let binary_path = dir.path().join("cube.bin.ply");
    let ascii_path = dir.path().join("cube.ascii.ply");

    let mut reader = PlyFileReader::open(source.path()).expect("Failed to open");
    let mut writer = PlyFileWriter::create(&binary_path, WriteOptions::new(Encoding::BinaryLittleEndian))
        .expect("Failed to create");
    transcode(&mut reader, &mut writer).expect("Failed to transcode");
    writer.close().expect("Failed to close");
    assert_eq!(detect_format(&binary_path).expect("detect"), Encoding::BinaryLittleEndian);

    let mut reader = PlyFileReader::open(&binary_path).expect("Failed to open");
    let mut writer = PlyFileWriter::create(&ascii_path, WriteOptions::new(Encoding::Ascii))
        .expect("Failed to create");
    transcode(&mut reader, &mut writer).expect("Failed to transcode");
    writer.close().expect("Failed to close");

    let text = fs::read_to_string(&ascii_path).expect("read back");
    assert_eq!(text, ASCII_CUBE);
}

#[test]
fn test_convert_file_onto_itself() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("cube.ply");
    fs::write(&path, ASCII_CUBE).expect("Failed to write input");

    let written = transcode_file(&path, &path, Some(Encoding::BinaryLittleEndian), false)
        .expect("Failed to convert in place");
    assert_eq!(fs::metadata(&path).expect("metadata").len(), written);
    assert_eq!(detect_format(&path).expect("detect"), Encoding::BinaryLittleEndian);

    transcode_file(&path, &path, Some(Encoding::Ascii), false).expect("Failed to convert back");
    assert_eq!(fs::read_to_string(&path).expect("read back"), ASCII_CUBE);

    // Only the converted file remains; staging files are renamed away.
    let entries = fs::read_dir(dir.path()).expect("read dir").count();
    assert_eq!(entries, 1);
}

#[test]
fn test_failed_convert_keeps_output() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("short.ply");
    let truncated = "ply\nformat ascii 1.0\nelement vertex 2\nproperty float x\nend_header\n1\n";
    fs::write(&path, truncated).expect("Failed to write input");

    let err = transcode_file(&path, &path, Some(Encoding::BinaryLittleEndian), false);
    assert!(err.is_err());
    assert_eq!(fs::read_to_string(&path).expect("read back"), truncated);
    assert_eq!(fs::read_dir(dir.path()).expect("read dir").count(), 1);
}

#[test]
fn test_convert_keeps_source_encoding_by_default() {
    let source = write_text(ASCII_CUBE.as_bytes());
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("copy.ply");

    transcode_file(source.path(), &path, None, false).expect("Failed to convert");
    assert_eq!(fs::read_to_string(&path).expect("read back"), ASCII_CUBE);
}

#[cfg(feature = "mmap")]
mod mapped {
    use super::*;
    use plyio::bind::vertex_positions;
    use plyio::stream::OutputStream;
    use std::io::{Seek, SeekFrom};

    #[test]
    fn test_mapped_write_truncates_to_written_bytes() {
        let dir = tempdir().expect("Failed to create temp dir");
        let buffered = dir.path().join("buffered.ply");
        let mapped = dir.path().join("mapped.ply");
        let points: Vec<[f32; 3]> = (0..100).map(|i| [i as f32, -(i as f32), 0.5]).collect();

        for (path, options) in [
            (&buffered, WriteOptions::default()),
            (&mapped, WriteOptions::default().with_mmap(1 << 20)),
        ] {
            let mut writer = PlyFileWriter::create(path, options).expect("Failed to create");
            let positions = vertex_positions(&points).expect("valid column");
            plyio::bind_write!(&mut writer, positions).expect("Failed to write");
            writer.close().expect("Failed to close");
        }

        let expected = fs::read(&buffered).expect("read buffered");
        let actual = fs::read(&mapped).expect("read mapped");
        assert_eq!(actual.len(), expected.len());
        assert!(actual == expected);
    }

    #[test]
    fn test_mapped_write_drop_releases() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("dropped.ply");
        {
            let mut stream = OutputStream::create_mapped(&path, 4096).expect("Failed to map");
            stream.write_all(b"ply\n").expect("write");
            assert!(stream.is_mapped());
        }
        assert_eq!(fs::read(&path).expect("read"), b"ply\n");
    }

    #[test]
    fn test_mapped_reservation_exhausted() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("small.ply");
        let points: Vec<[f32; 3]> = vec![[1.0, 2.0, 3.0]; 64];

        let mut writer = PlyFileWriter::create(&path, WriteOptions::default().with_mmap(128))
            .expect("Failed to create");
        let positions = vertex_positions(&points).expect("valid column");
        let err = plyio::bind_write!(&mut writer, positions).expect_err("reservation too small");
        assert!(matches!(err, Error::Io(ref e) if e.kind() == std::io::ErrorKind::WriteZero));
        writer.close().expect("Failed to close");

        assert_eq!(fs::metadata(&path).expect("metadata").len(), 128);
    }

    #[test]
    fn test_mapped_seek_bounds() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("seek.ply");
        let mut stream = OutputStream::create_mapped(&path, 16).expect("Failed to map");
        stream.write_all(b"abcd").expect("write");

        assert!(stream.seek(SeekFrom::Start(17)).is_err());
        assert!(stream.seek(SeekFrom::Current(-5)).is_err());
        assert_eq!(stream.seek(SeekFrom::Current(0)).expect("seek"), 4);
        assert_eq!(stream.seek(SeekFrom::Start(1)).expect("seek"), 1);
        stream.write_all(b"X").expect("write");
        stream.close().expect("Failed to close");

        assert_eq!(fs::read(&path).expect("read"), b"aXcd");
    }

    #[test]
    fn test_mapped_convert_file_onto_itself() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("cube.ply");
        fs::write(&path, ASCII_CUBE).expect("Failed to write input");

        transcode_file(&path, &path, Some(Encoding::BinaryLittleEndian), true)
            .expect("Failed to convert in place");
        let mut reader = PlyFileReader::open(&path).expect("Failed to open");
        assert_eq!(reader.encoding(), Encoding::BinaryLittleEndian);
        assert_eq!(reader.elements().expect("parse").len(), 2);
        assert_eq!(reader.read_scalar(ScalarKind::Float32).expect("read"), Scalar::Float32(0.0));
        drop(reader);

        transcode_file(&path, &path, Some(Encoding::Ascii), true).expect("Failed to convert back");
        assert_eq!(fs::read_to_string(&path).expect("read back"), ASCII_CUBE);
    }

    #[test]
    fn test_zero_reservation_rejected() {
        let dir = tempdir().expect("Failed to create temp dir");
        let err = OutputStream::create_mapped(dir.path().join("zero.ply"), 0);
        assert!(matches!(err, Err(Error::Open { .. })));
    }
}

#[cfg(not(feature = "mmap"))]
#[test]
fn test_mapping_disabled_fails_at_open() {
    let file = write_text(ASCII_CUBE.as_bytes());
    assert!(matches!(PlyFileReader::open_opts(file.path(), true), Err(Error::MmapUnavailable)));
    let err = PlyFileWriter::create(file.path(), WriteOptions::default().with_mmap(1024));
    assert!(matches!(err, Err(Error::MmapUnavailable)));
}
