//! Elementwise transforms layered on top of the matrix buffer.
//!
//! Every transform validates its arguments before touching any element,
//! so a failed call leaves all matrices exactly as they were.

use crate::error::StoreError;
use crate::matrix::Matrix;
use rand::Rng;
use std::fmt;
use tracing::debug;

/// Direction of a logical bit shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    Left,
    Right,
}

impl ShiftDirection {
    /// Applies the shift to one value.
    ///
    /// Amounts of 32 or more shift every bit out and yield 0; the amount
    /// is never reduced modulo the bit width.
    pub fn apply(self, value: u32, amount: u32) -> u32 {
        match self {
            ShiftDirection::Left => value.checked_shl(amount).unwrap_or(0),
            ShiftDirection::Right => value.checked_shr(amount).unwrap_or(0),
        }
    }
}

impl TryFrom<char> for ShiftDirection {
    type Error = StoreError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'l' => Ok(ShiftDirection::Left),
            'r' => Ok(ShiftDirection::Right),
            other => Err(StoreError::InvalidShiftDirection(other)),
        }
    }
}

impl fmt::Display for ShiftDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftDirection::Left => f.write_str("l"),
            ShiftDirection::Right => f.write_str("r"),
        }
    }
}

/// Elementwise `c = a + b`, wrapping on overflow.
///
/// `a` and `b` must agree in both rows and cols, and `c` must already be
/// sized like `a`.
pub fn add(a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<(), StoreError> {
    if a.dims() != b.dims() {
        return Err(StoreError::mismatch(a.dims(), b.dims()));
    }
    if c.dims() != a.dims() {
        return Err(StoreError::mismatch(a.dims(), c.dims()));
    }

    for ((out, &x), &y) in c
        .as_mut_slice()
        .iter_mut()
        .zip(a.as_slice())
        .zip(b.as_slice())
    {
        *out = x.wrapping_add(y);
    }
    Ok(())
}

/// Logical shift of every element; `direction` must be `'l'` or `'r'`.
pub fn bitwise_shift(matrix: &mut Matrix, direction: char, amount: u32) -> Result<(), StoreError> {
    let direction = ShiftDirection::try_from(direction)?;
    shift(matrix, direction, amount);
    Ok(())
}

/// Typed form of [`bitwise_shift`].
pub fn shift(matrix: &mut Matrix, direction: ShiftDirection, amount: u32) {
    for value in matrix.as_mut_slice() {
        *value = direction.apply(*value, amount);
    }
    debug!(name = %matrix.name(), %direction, amount, "shifted matrix");
}

/// Fills every element uniformly from `[low, high]` inclusive.
pub fn randomize<R: Rng + ?Sized>(
    matrix: &mut Matrix,
    low: u32,
    high: u32,
    rng: &mut R,
) -> Result<(), StoreError> {
    if low > high {
        return Err(StoreError::InvalidRange { low, high });
    }
    for value in matrix.as_mut_slice() {
        *value = rng.gen_range(low..=high);
    }
    Ok(())
}
