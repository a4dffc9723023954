use thiserror::Error;

use crate::device::DeviceError;

/// Errors produced while processing an action
///
/// Usage errors (`WrongArity`, `WrongType`, `IndexOutOfRange`, `Usage`) are
/// raised before the device is touched. `Device` wraps whatever the device
/// layer returned once validation had passed.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Wrong number of arguments
    #[error("Action '{action}' takes {expected} parameter(s)")]
    WrongArity {
        action: String,
        expected: &'static str,
    },

    /// Argument has the wrong type or is out of range
    #[error("Action '{action}' takes parameter(s): {expected}")]
    WrongType { action: String, expected: String },

    /// Queue index outside 1..=queue_size
    #[error("{message}")]
    IndexOutOfRange { index: i64, size: usize, message: String },

    /// Any other misuse: unknown targets, version gates
    #[error("{0}")]
    Usage(String),

    /// Both ways of playing a favourite failed
    #[error("1: {first} | 2: {second}")]
    FavouriteUnplayable {
        first: DeviceError,
        second: DeviceError,
    },

    /// A command run through the re-entrant interface reported failure
    #[error("{0}")]
    Command(String),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl ActionError {
    /// General fail-fast error with a free-form message
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn wrong_arity(action: &str, expected: &'static str) -> Self {
        Self::WrongArity {
            action: action.to_string(),
            expected,
        }
    }

    pub fn wrong_type(action: &str, expected: impl Into<String>) -> Self {
        Self::WrongType {
            action: action.to_string(),
            expected: expected.into(),
        }
    }

    pub fn index_out_of_range(index: i64, size: usize, message: impl Into<String>) -> Self {
        Self::IndexOutOfRange {
            index,
            size,
            message: message.into(),
        }
    }

    /// True for errors caused by the invocation rather than the device
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::WrongArity { .. }
                | Self::WrongType { .. }
                | Self::IndexOutOfRange { .. }
                | Self::Usage(_)
        )
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Result alias used by strategies
pub type Result<T> = std::result::Result<T, ActionError>;
