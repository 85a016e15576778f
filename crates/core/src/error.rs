//! Usage errors of the hashing interface
//!
//! Every variant is detected before any work starts; no partial output is
//! ever written.

use thiserror::Error;

use crate::params::INPUT_LENGTH;

/// Result alias for hashing calls
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Input longer than [`INPUT_LENGTH`]
    #[error("input is {len} bytes, at most {max} allowed", max = INPUT_LENGTH)]
    LengthExceeded { len: usize },

    /// Offset/length pair does not lie inside the source buffer
    #[error("range {offset}+{len} is outside a buffer of {available} bytes")]
    OutOfBounds {
        offset: i64,
        len: i64,
        available: usize,
    },

    /// Batch source or destination too small for `count` items
    #[error("batch needs {required} bytes but only {available} are available")]
    CapacityError { required: u128, available: usize },
}

impl Error {
    /// Stable numeric code, shared with the C ABI
    pub const fn code(&self) -> i32 {
        match self {
            Error::LengthExceeded { .. } => -1,
            Error::OutOfBounds { .. } => -2,
            Error::CapacityError { .. } => -3,
        }
    }
}
