//! Error types for the matrix storage engine.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the matrix storage engine.
///
/// None of these are fatal: a failed operation leaves the registry and
/// every existing matrix unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Encoded name (terminator included) exceeds the bound
    #[error("Name too long: {len} bytes including terminator (max {max})")]
    NameTooLong { len: usize, max: usize },

    /// Name cannot be represented in the terminator-inclusive encoding
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// rows * cols does not fit in memory addressing
    #[error("Dimension overflow: {rows}x{cols}")]
    DimensionOverflow { rows: u32, cols: u32 },

    /// Operand geometries do not line up
    #[error("Dimension mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },

    /// Loaded buffer does not hold exactly rows * cols elements
    #[error("Length mismatch: expected {expected} elements, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// Shift direction other than 'l' or 'r'
    #[error("Invalid shift direction: {0:?} (expected 'l' or 'r')")]
    InvalidShiftDirection(char),

    /// Random range with low > high
    #[error("Invalid range: [{low}, {high}]")]
    InvalidRange { low: u32, high: u32 },

    /// Element access outside the matrix
    #[error("Index ({row},{col}) out of bounds for {rows}x{cols}")]
    IndexOutOfBounds {
        row: u32,
        col: u32,
        rows: u32,
        cols: u32,
    },

    /// Registry constructed with no slots
    #[error("Registry capacity must be positive")]
    ZeroCapacity,

    /// Buffer allocation failed
    #[error("Allocation of {elements} elements failed")]
    Allocation { elements: usize },

    /// Open/read/write/close failure
    #[error("Failed to {op} {}: {class} ({source})", .path.display())]
    Io {
        op: IoOp,
        path: PathBuf,
        class: IoClass,
        #[source]
        source: io::Error,
    },

    /// Stream ended before a field was complete
    #[error("Short read of {field}: expected {expected} bytes")]
    ShortRead { field: Field, expected: usize },

    /// The single output write came up short
    #[error("Short write: wrote {written} of {expected} bytes")]
    ShortWrite { expected: usize, written: usize },

    /// Name field on disk is not a valid terminator-inclusive name
    #[error("Corrupt name field: {0}")]
    CorruptName(String),
}

impl StoreError {
    /// Creates a dimension mismatch error.
    pub fn mismatch(expected: (u32, u32), found: (u32, u32)) -> Self {
        Self::DimensionMismatch { expected, found }
    }

    /// Creates a classified I/O error.
    pub fn io(op: IoOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            class: IoClass::of(&source),
            source,
        }
    }
}

/// Which file operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Open,
    Create,
    Read,
    Write,
    Sync,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IoOp::Open => "open",
            IoOp::Create => "create",
            IoOp::Read => "read",
            IoOp::Write => "write",
            IoOp::Sync => "sync",
        };
        f.write_str(s)
    }
}

/// Platform error classification.
///
/// Diagnostic only; the class never changes control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoClass {
    PermissionDenied,
    InUse,
    BadDescriptor,
    AlreadyExists,
    NotFound,
    Other,
}

/// errno for a closed or invalid descriptor on unix targets.
const EBADF: i32 = 9;

impl IoClass {
    /// Classifies an I/O error by its platform code.
    pub fn of(err: &io::Error) -> Self {
        if cfg!(unix) && err.raw_os_error() == Some(EBADF) {
            return IoClass::BadDescriptor;
        }
        match err.kind() {
            io::ErrorKind::PermissionDenied => IoClass::PermissionDenied,
            io::ErrorKind::AddrInUse => IoClass::InUse,
            io::ErrorKind::AlreadyExists => IoClass::AlreadyExists,
            io::ErrorKind::NotFound => IoClass::NotFound,
            _ => IoClass::Other,
        }
    }
}

impl fmt::Display for IoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IoClass::PermissionDenied => "do not have access to file",
            IoClass::InUse => "file already in use",
            IoClass::BadDescriptor => "bad file descriptor",
            IoClass::AlreadyExists => "file exists",
            IoClass::NotFound => "no such file",
            IoClass::Other => "i/o failure",
        };
        f.write_str(s)
    }
}

/// A field of the on-disk layout, in read order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    NameLen,
    Name,
    Rows,
    Cols,
    Data,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Field::NameLen => "name length",
            Field::Name => "matrix name",
            Field::Rows => "row count",
            Field::Cols => "column count",
            Field::Data => "matrix data",
        };
        f.write_str(s)
    }
}
