use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised by domain-type constructors and conversions.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("understanding level must be between 1 and 5, got {0}")]
    LevelOutOfRange(u8),

    #[error("mood must be between 1 and 5, got {0}")]
    MoodOutOfRange(u8),

    #[error("study time must be at most {max} minutes, got {got}")]
    StudyTimeOutOfRange { got: u16, max: u16 },

    #[error("invalid storage mode: {0}")]
    InvalidStorageMode(String),
}

pub type Result<T> = StdResult<T, CoreError>;
