use thiserror::Error;

/// A date string that none of the accepted formats could parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("invalid date: {0:?}")]
    Invalid(String),
}

/// Unknown discriminators arriving from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeywordError {
    #[error("unknown category id: {0}")]
    UnknownCategory(u32),
    #[error("unknown task type: {0:?}")]
    UnknownTaskType(String),
    #[error("unknown resource type: {0:?}")]
    UnknownResourceType(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown timezone: {0}")]
    InvalidTimezone(String),
    #[error("no user config directory")]
    NoConfigDir,
}
