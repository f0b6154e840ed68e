//! Error taxonomy for container construction and lazy decoding.

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;
pub type UnitResult = Result<()>;

pub use std::io::Error as IoError;
pub use std::io::Result as IoResult;


/// All ways opening or reading a DAT container can fail.
///
/// `FormatMismatch`, `LengthMismatch` and `Truncated` are fatal during
/// construction. `TranslatorFailure` and `CrossReferenceMissing` are
/// absorbed into sentinel cache values and never propagate past the
/// catalog. `IndexOutOfRange` is only returned by the checked getters.
#[derive(Debug)]
pub enum Error {
    /// A fixed literal (magic bytes, header markers, sequence prefix) did not match.
    FormatMismatch(String),

    /// The header's `file_size` field does not equal the file's actual length.
    LengthMismatch { expected: u64, actual: u64 },

    /// The reader ran out of bytes before a structure was fully parsed.
    Truncated(String),

    /// A bitmap translator rejected a frame's payload.
    TranslatorFailure(String),

    /// A checked getter was called with an index outside the valid range.
    IndexOutOfRange { category: &'static str, index: usize, len: usize },

    /// An animation record referenced a sequence or frame that is not present.
    CrossReferenceMissing(String),

    /// Any other I/O failure (permission, disk, etc) not already classified above.
    Io(IoError),
}

impl Error {
    pub fn format_mismatch(message: impl Into<String>) -> Self {
        Error::FormatMismatch(message.into())
    }

    pub fn truncated(message: impl Into<String>) -> Self {
        Error::Truncated(message.into())
    }

    pub fn translator_failure(message: impl Into<String>) -> Self {
        Error::TranslatorFailure(message.into())
    }

    pub fn cross_reference_missing(message: impl Into<String>) -> Self {
        Error::CrossReferenceMissing(message.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FormatMismatch(message) => write!(f, "format mismatch: {}", message),
            Error::LengthMismatch { expected, actual } =>
                write!(f, "header declares file size {} but file is {} bytes", expected, actual),
            Error::Truncated(message) => write!(f, "truncated while reading {}", message),
            Error::TranslatorFailure(message) => write!(f, "bitmap translator failed: {}", message),
            Error::IndexOutOfRange { category, index, len } =>
                write!(f, "index {} out of range for {} (len {})", index, category, len),
            Error::CrossReferenceMissing(message) => write!(f, "cross-reference missing: {}", message),
            Error::Io(error) => write!(f, "io error: {}", error),
        }
    }
}

impl std::error::Error for Error {}

/// Enable using the `?` operator on `io::Result`. A short read surfaces here as an
/// `UnexpectedEof` io error; callers parsing fixed-size structures should prefer
/// `Error::truncated` directly so the message names the structure being read.
impl From<IoError> for Error {
    fn from(error: IoError) -> Self {
        if error.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::Truncated(error.to_string())
        } else {
            Error::Io(error)
        }
    }
}
