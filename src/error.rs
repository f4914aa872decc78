//! Error taxonomy of the library

use thiserror::Error;

use crate::strat::StratError;

pub type Result<T> = std::result::Result<T, ScotchError>;

#[derive(Debug, Error)]
pub enum ScotchError {
    #[error("out of memory")]
    OutOfMemory,

    #[error("invalid strategy: {0}")]
    Strat(#[from] StratError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal inconsistency: {0}")]
    Inconsistent(String),

    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<std::collections::TryReserveError> for ScotchError {
    fn from(_: std::collections::TryReserveError) -> Self {
        ScotchError::OutOfMemory
    }
}

/// Bail out of a check with an [`ScotchError::Inconsistent`] error
macro_rules! inconsistent {
    ($($arg:tt)*) => {
        return Err($crate::error::ScotchError::Inconsistent(format!($($arg)*)))
    };
}

/// Bail out with an [`ScotchError::InvalidInput`] error
macro_rules! invalid {
    ($($arg:tt)*) => {
        return Err($crate::error::ScotchError::InvalidInput(format!($($arg)*)))
    };
}

pub(crate) use inconsistent;
pub(crate) use invalid;
