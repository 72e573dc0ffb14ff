//! Binary matrix file codec.
//!
//! One matrix per file, little-endian, no magic number and no version:
//!
//! ```text
//! ┌──────────┬──────────────────┬──────┬──────┬─────────────────┬──────┐
//! │ nameLen  │ name + NUL       │ rows │ cols │ data            │ 0xFF │
//! │ u32      │ nameLen bytes    │ u32  │ u32  │ rows*cols * u32 │ u8   │
//! └──────────┴──────────────────┴──────┴──────┴─────────────────┴──────┘
//! ```
//!
//! The name length precedes the name so the reader never guesses a name
//! size. The trailing sentinel is written but never verified on read.

use crate::error::{Field, IoOp, StoreError};
use crate::matrix::{element_count, Matrix};
use crate::name::{MatrixName, MATRIX_NAME_LEN};
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Trailing byte appended after the data block.
pub const SENTINEL: u8 = 0xFF;

const WORD: usize = std::mem::size_of::<u32>();

/// Exact encoded size of a matrix.
pub fn encoded_len(matrix: &Matrix) -> usize {
    WORD + matrix.name().encoded_len() + 2 * WORD + matrix.len() * WORD + 1
}

/// Serializes a matrix into one contiguous buffer.
pub fn encode(matrix: &Matrix) -> Vec<u8> {
    let mut buf = Vec::with_capacity(encoded_len(matrix));
    let name = matrix.name();

    put_u32(&mut buf, name.encoded_len() as u32);
    buf.extend_from_slice(name.as_str().as_bytes());
    buf.push(0);
    put_u32(&mut buf, matrix.rows());
    put_u32(&mut buf, matrix.cols());
    for &value in matrix.as_slice() {
        put_u32(&mut buf, value);
    }
    buf.push(SENTINEL);

    buf
}

fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Reconstructs a matrix from a stream.
///
/// Any short read is a failure; nothing is recovered from a truncated
/// stream. The sentinel is not consumed.
pub fn decode<R: Read>(reader: &mut R) -> Result<Matrix, StoreError> {
    let name_len = read_u32(reader, Field::NameLen)? as usize;
    if name_len == 0 || name_len > MATRIX_NAME_LEN {
        return Err(StoreError::CorruptName(format!(
            "name length {} outside 1..={}",
            name_len, MATRIX_NAME_LEN
        )));
    }

    let mut name_buf = [0u8; MATRIX_NAME_LEN];
    read_field(reader, &mut name_buf[..name_len], Field::Name)?;
    let name = MatrixName::from_encoded(&name_buf[..name_len])?;

    let rows = read_u32(reader, Field::Rows)?;
    let cols = read_u32(reader, Field::Cols)?;
    let elements = element_count(rows, cols)?;
    let byte_len = elements
        .checked_mul(WORD)
        .ok_or(StoreError::DimensionOverflow { rows, cols })?;

    // Buffer grows with the bytes actually present, not with the header.
    let mut bytes = Vec::new();
    let read = reader
        .take(byte_len as u64)
        .read_to_end(&mut bytes)
        .map_err(|e| StoreError::io(IoOp::Read, "<stream>", e))?;
    if read != byte_len {
        return Err(StoreError::ShortRead {
            field: Field::Data,
            expected: byte_len,
        });
    }

    let data: Vec<u32> = bytes
        .chunks_exact(WORD)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .collect();

    let mut matrix = Matrix::create(name.as_str(), rows, cols)?;
    matrix.load(&data)?;

    debug!(name = %matrix.name(), rows, cols, "decoded matrix");
    Ok(matrix)
}

fn read_u32<R: Read>(reader: &mut R, field: Field) -> Result<u32, StoreError> {
    let mut word = [0u8; WORD];
    read_field(reader, &mut word, field)?;
    Ok(u32::from_le_bytes(word))
}

fn read_field<R: Read>(reader: &mut R, buf: &mut [u8], field: Field) -> Result<(), StoreError> {
    let expected = buf.len();
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => StoreError::ShortRead { field, expected },
        _ => StoreError::io(IoOp::Read, "<stream>", e),
    })
}

/// Encodes a matrix and hands it to `out` in a single `write` call.
///
/// Returns the byte count. Fewer bytes accepted than offered is a
/// `ShortWrite`; the remainder is never retried.
pub fn write_to<W: Write>(out: &mut W, matrix: &Matrix) -> Result<usize, StoreError> {
    let buf = encode(matrix);
    let written = out
        .write(&buf)
        .map_err(|e| StoreError::io(IoOp::Write, "<stream>", e))?;
    if written != buf.len() {
        return Err(StoreError::ShortWrite {
            expected: buf.len(),
            written,
        });
    }
    Ok(written)
}

/// Writes a matrix to `path`, creating or truncating the file.
///
/// A partially written file is left in place. `sync_all` flushes the data
/// to disk; errors from the final close on drop are not observed.
pub fn write(path: impl AsRef<Path>, matrix: &Matrix) -> Result<(), StoreError> {
    let path = path.as_ref();

    let mut file = create_file(path).map_err(|e| logged(StoreError::io(IoOp::Create, path, e)))?;

    let written = write_to(&mut file, matrix).map_err(|e| logged(with_path(e, path)))?;

    file.sync_all()
        .map_err(|e| logged(StoreError::io(IoOp::Sync, path, e)))?;

    debug!(path = %path.display(), bytes = written, "wrote matrix {}", matrix.name());
    Ok(())
}

#[cfg(unix)]
fn create_file(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o644)
        .open(path)
}

#[cfg(not(unix))]
fn create_file(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// Reads a matrix back from `path`.
pub fn read(path: impl AsRef<Path>) -> Result<Matrix, StoreError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| logged(StoreError::io(IoOp::Open, path, e)))?;

    let mut reader = BufReader::new(file);
    decode(&mut reader).map_err(|e| logged(with_path(e, path)))
}

/// Replaces the placeholder stream path of an I/O error with `path`.
fn with_path(err: StoreError, path: &Path) -> StoreError {
    match err {
        StoreError::Io { op, class, source, .. } => StoreError::Io {
            op,
            path: path.to_path_buf(),
            class,
            source,
        },
        other => other,
    }
}

fn logged(err: StoreError) -> StoreError {
    warn!("{}", err);
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::randomize;
    use matstore_env::{SeededContext, StoreContext};
    use proptest::prelude::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn sample() -> Matrix {
        let mut m = Matrix::create("A", 2, 2).unwrap();
        m.load(&[1, 2, 3, 0xDEAD_BEEF]).unwrap();
        m
    }

    #[test]
    fn test_encode_layout() {
        let bytes = encode(&sample());

        let mut expected = Vec::new();
        expected.extend_from_slice(&2u32.to_le_bytes()); // "A\0"
        expected.extend_from_slice(b"A\0");
        expected.extend_from_slice(&2u32.to_le_bytes());
        expected.extend_from_slice(&2u32.to_le_bytes());
        for v in [1u32, 2, 3, 0xDEAD_BEEF] {
            expected.extend_from_slice(&v.to_le_bytes());
        }
        expected.push(0xFF);

        assert_eq!(bytes, expected);
        assert_eq!(bytes.len(), encoded_len(&sample()));
    }

    #[test]
    fn test_decode_ignores_sentinel() {
        let mut bytes = encode(&sample());
        *bytes.last_mut().unwrap() = 0x00;
        let m = decode(&mut Cursor::new(bytes)).unwrap();
        assert!(m.equal(&sample()));

        let mut bytes = encode(&sample());
        bytes.pop();
        assert!(decode(&mut Cursor::new(bytes)).is_ok());
    }

    #[test]
    fn test_decode_truncation_stages() {
        let bytes = encode(&sample());
        // name_len(4) + "A\0"(2) + rows(4) + cols(4) + data(16) + sentinel(1)
        let cases = [
            (0, Field::NameLen),
            (3, Field::NameLen),
            (5, Field::Name),
            (8, Field::Rows),
            (12, Field::Cols),
            (14, Field::Data),
            (29, Field::Data),
        ];
        for (cut, stage) in cases {
            match decode(&mut Cursor::new(&bytes[..cut])) {
                Err(StoreError::ShortRead { field, .. }) => assert_eq!(field, stage, "cut at {}", cut),
                other => panic!("cut at {}: expected ShortRead, got {:?}", cut, other),
            }
        }
    }

    #[test]
    fn test_decode_rejects_bad_name_length() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&51u32.to_le_bytes());
        bytes.extend_from_slice(&[b'a'; 60]);
        assert!(matches!(
            decode(&mut Cursor::new(bytes)),
            Err(StoreError::CorruptName(_))
        ));

        let bytes = 0u32.to_le_bytes().to_vec();
        assert!(matches!(
            decode(&mut Cursor::new(bytes)),
            Err(StoreError::CorruptName(_))
        ));
    }

    #[test]
    fn test_decode_huge_header_fails_cleanly() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(b"H\0");
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 8]);

        assert!(decode(&mut Cursor::new(bytes)).is_err());
    }

    #[test]
    fn test_write_then_read_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.bin");

        let mut ctx = SeededContext::new(42);
        let mut m = Matrix::create("A", 2, 2).unwrap();
        randomize(&mut m, 1, 1, ctx.rng()).unwrap();

        write(&path, &m).unwrap();
        let back = read(&path).unwrap();

        assert_eq!(back.name(), "A");
        assert_eq!(back.dims(), (2, 2));
        assert_eq!(back.as_slice(), &[1, 1, 1, 1]);
    }

    #[test]
    fn test_write_truncates_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.bin");

        let big = Matrix::create("big", 10, 10).unwrap();
        write(&path, &big).unwrap();
        write(&path, &sample()).unwrap();

        let on_disk = std::fs::read(&path).unwrap();
        assert_eq!(on_disk, encode(&sample()));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        match read(dir.path().join("nope.bin")) {
            Err(StoreError::Io { op, class, .. }) => {
                assert_eq!(op, IoOp::Open);
                assert_eq!(class, crate::error::IoClass::NotFound);
            }
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_truncated_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cut.bin");
        let bytes = encode(&sample());
        std::fs::write(&path, &bytes[..10]).unwrap();

        assert!(matches!(
            read(&path),
            Err(StoreError::ShortRead { field: Field::Cols, .. })
        ));
    }

    #[test]
    fn test_write_into_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_such_dir").join("m.bin");
        assert!(matches!(
            write(&path, &sample()),
            Err(StoreError::Io { op: IoOp::Create, .. })
        ));
    }

    /// Accepts at most `limit` bytes per call.
    struct Stingy {
        limit: usize,
        taken: Vec<u8>,
    }

    impl Write for Stingy {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.limit);
            self.taken.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_to_short_write() {
        let mut out = Stingy { limit: 7, taken: Vec::new() };
        match write_to(&mut out, &sample()) {
            Err(StoreError::ShortWrite { expected, written }) => {
                assert_eq!(expected, encoded_len(&sample()));
                assert_eq!(written, 7);
            }
            other => panic!("expected ShortWrite, got {:?}", other),
        }
        // One call only; nothing beyond the first chunk was retried
        assert_eq!(out.taken.len(), 7);
    }

    #[test]
    fn test_write_to_full_buffer() {
        let mut out = Vec::new();
        let n = write_to(&mut out, &sample()).unwrap();
        assert_eq!(n, encoded_len(&sample()));
        assert_eq!(out, encode(&sample()));
    }

    #[test]
    fn test_degenerate_matrix_roundtrip() {
        let m = Matrix::create("", 0, 3).unwrap();
        let back = decode(&mut Cursor::new(encode(&m))).unwrap();
        assert_eq!(back.name(), "");
        assert_eq!(back.dims(), (0, 3));
        assert!(back.is_empty());
    }

    proptest! {
        #[test]
        fn prop_roundtrip(
            name in "[a-zA-Z0-9_]{0,49}",
            rows in 0u32..6,
            cols in 0u32..6,
            seed in any::<u64>(),
        ) {
            let mut m = Matrix::create(&name, rows, cols).unwrap();
            randomize(&mut m, 0, u32::MAX, SeededContext::new(seed).rng()).unwrap();

            let back = decode(&mut Cursor::new(encode(&m))).unwrap();

            prop_assert_eq!(back.name(), m.name());
            prop_assert!(back.equal(&m));
        }
    }
}
