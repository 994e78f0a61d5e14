use thiserror::Error;

/// Contract violations reported by the video core.
///
/// None of these are recoverable runtime conditions: they signal a caller
/// that broke a precondition and are propagated as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed size, index, coordinate or mismatched operand sizes.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// An operation that needs state which is not there (yet).
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// A required collaborator was never supplied.
    #[error("missing dependency: {0}")]
    MissingDependency(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Return early with [`Error::InvalidArgument`] unless `$cond` holds.
macro_rules! ensure_argument {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::Error::InvalidArgument(format!($($arg)+)));
        }
    };
}

pub(crate) use ensure_argument;
