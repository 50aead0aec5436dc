use core::{error, fmt, result};

use crate::tweak::BLOCK_SIZE;

/// Result is a specialized [`result::Result`] for this crate.
pub type Result<T> = result::Result<T, Error>;

/// Error is the error type returned by this crate.
///
/// Every error is fatal to the operation that raised it. The cipher
/// instance itself stays intact and can be re-initialized with
/// [`init`][crate::XtsCipher::init].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The supplied parameters are invalid: key lengths differ or
    /// are unsupported, or the sector size is below one block.
    Configuration(&'static str),
    /// An operation was invoked in a lifecycle state that does not
    /// permit it, e.g. `process` after `finalize`.
    Lifecycle(&'static str),
    /// `finalize` was called with fewer than 16 bytes in the active
    /// data unit. XTS cannot encrypt a data unit shorter than one
    /// block.
    ///
    /// It contains the number of bytes buffered.
    InsufficientData(usize),
    /// Independent mode only: the bytes supplied for the data unit
    /// do not match the sector size, either by crossing the sector
    /// boundary during `process` or by falling short at `finalize`.
    SizeMismatch {
        /// The configured sector size.
        expected: usize,
        /// The bytes the caller supplied.
        got: usize,
    },
    /// The caller-provided output slice cannot hold the bytes this
    /// call is guaranteed to emit.
    ///
    /// No input is consumed when this is returned.
    OutputBufferTooSmall {
        /// Bytes the call would have written.
        needed: usize,
        /// Capacity of the slice provided.
        got: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(msg) => {
                write!(f, "invalid configuration: {}", msg)
            }
            Error::Lifecycle(msg) => {
                write!(f, "operation not permitted: {}", msg)
            }
            Error::InsufficientData(n) => {
                write!(
                    f,
                    "insufficient data: {} bytes buffered, a data unit needs at least {}",
                    n, BLOCK_SIZE
                )
            }
            Error::SizeMismatch { expected, got } => {
                write!(
                    f,
                    "data unit size mismatch: expected {} bytes, got {}",
                    expected, got
                )
            }
            Error::OutputBufferTooSmall { needed, got } => {
                write!(
                    f,
                    "output buffer too small: need {} bytes, got {}",
                    needed, got
                )
            }
        }
    }
}

impl error::Error for Error {}

impl From<cipher::InvalidLength> for Error {
    fn from(_: cipher::InvalidLength) -> Self {
        Error::Configuration("key length not supported by the block cipher")
    }
}
