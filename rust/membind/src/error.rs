use thiserror::Error;

/// A specialized `Result` type for toolkit operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_alignment(alignment: usize) -> Error {
        ErrorKind::InvalidAlignment { alignment }.into()
    }

    pub fn invalid_size(size: usize) -> Error {
        ErrorKind::InvalidSize { size }.into()
    }

    pub fn out_of_bounds(offset: usize, len: usize, available: usize) -> Error {
        ErrorKind::OutOfBounds {
            offset,
            len,
            available,
        }
        .into()
    }

    pub fn size_mismatch(required: usize, available: usize) -> Error {
        ErrorKind::SizeMismatch {
            required,
            available,
        }
        .into()
    }

    pub fn out_of_range(index: usize, count: usize) -> Error {
        ErrorKind::OutOfRange { index, count }.into()
    }

    pub fn uninitialized_read(index: usize) -> Error {
        ErrorKind::UninitializedRead { index }.into()
    }

    pub fn use_after_free() -> Error {
        ErrorKind::UseAfterFree.into()
    }

    pub fn double_free() -> Error {
        ErrorKind::DoubleFree.into()
    }

    pub fn allocation_failed(size: usize) -> Error {
        ErrorKind::AllocationFailed { size }.into()
    }

    pub fn checksum_mismatch(element: impl Into<String>) -> Error {
        ErrorKind::ChecksumMismatch {
            element: element.into(),
        }
        .into()
    }
}

/// The contract violations the toolkit can report.
///
/// All of these are programmer-error signals, not transient conditions:
/// none are retried, and a failed operation leaves block contents
/// untouched.
#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid alignment {alignment}: must be a power of two")]
    InvalidAlignment { alignment: usize },

    #[error("invalid size {size}")]
    InvalidSize { size: usize },

    #[error("out of bounds: offset {offset} + {len} bytes exceeds block of {available} bytes")]
    OutOfBounds {
        offset: usize,
        len: usize,
        available: usize,
    },

    #[error("size mismatch: need {required} bytes, have {available}")]
    SizeMismatch { required: usize, available: usize },

    #[error("index {index} out of range for {count} elements")]
    OutOfRange { index: usize, count: usize },

    #[error("read of uninitialized slot {index}")]
    UninitializedRead { index: usize },

    #[error("operation on a deallocated block")]
    UseAfterFree,

    #[error("block deallocated twice")]
    DoubleFree,

    #[error("allocation of {size} bytes failed")]
    AllocationFailed { size: usize },

    #[error("checksum mismatch for '{element}'")]
    ChecksumMismatch { element: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
