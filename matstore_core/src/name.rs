//! Bounded matrix names.

use crate::error::StoreError;
use serde::Serialize;
use std::fmt;

/// Maximum encoded name length in bytes, terminator included.
pub const MATRIX_NAME_LEN: usize = 50;

/// A validated matrix name.
///
/// The name is stored as text, but its size is bounded by its *encoded*
/// form: the UTF-8 bytes followed by a single NUL terminator. That encoded
/// length must not exceed [`MATRIX_NAME_LEN`]. Interior NUL bytes are
/// rejected so the terminator is always unambiguous on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MatrixName(String);

impl MatrixName {
    /// Validates and wraps a name.
    pub fn new(name: impl Into<String>) -> Result<Self, StoreError> {
        let name = name.into();
        if name.contains('\0') {
            return Err(StoreError::InvalidName(format!(
                "{:?} contains a NUL byte",
                name
            )));
        }
        let len = name.len() + 1;
        if len > MATRIX_NAME_LEN {
            return Err(StoreError::NameTooLong {
                len,
                max: MATRIX_NAME_LEN,
            });
        }
        Ok(Self(name))
    }

    /// Recovers a name from its terminator-inclusive encoding.
    pub(crate) fn from_encoded(bytes: &[u8]) -> Result<Self, StoreError> {
        let (last, text) = bytes
            .split_last()
            .ok_or_else(|| StoreError::CorruptName("empty name field".to_string()))?;
        if *last != 0 {
            return Err(StoreError::CorruptName("missing terminator".to_string()));
        }
        let text = std::str::from_utf8(text)
            .map_err(|e| StoreError::CorruptName(format!("not UTF-8: {}", e)))?;
        Self::new(text).map_err(|e| StoreError::CorruptName(e.to_string()))
    }

    /// Encoded length, terminator included.
    pub fn encoded_len(&self) -> usize {
        self.0.len() + 1
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatrixName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MatrixName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for MatrixName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MatrixName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
