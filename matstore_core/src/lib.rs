//! matstore Core - In-Process Matrix Storage Engine
//!
//! A small store for named `u32` matrices:
//! 1. **Entity**: `Matrix` owns a bounded name and a row-major buffer
//! 2. **Transforms**: wrapping add, logical shift, uniform randomize
//! 3. **Codec**: byte-exact, length-prefixed binary files
//! 4. **Registry**: fixed-capacity slots recycled by eviction
//!
//! Everything here is single-threaded and synchronous. Failures are
//! reported as [`StoreError`] and never leave a matrix half-modified.

pub mod codec;
pub mod error;
pub mod matrix;
pub mod name;
pub mod registry;
pub mod transform;

// Re-export key types for convenience
pub use error::{Field, IoClass, IoOp, StoreError};
pub use matrix::Matrix;
pub use name::{MatrixName, MATRIX_NAME_LEN};
pub use registry::{Registry, DEFAULT_CAPACITY};
pub use transform::{add, bitwise_shift, randomize, ShiftDirection};
