use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TuneError {
    /// Rejected batch or step input: missing columns, too few rows,
    /// unparseable values, or out-of-range limits.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl TuneError {
    pub(crate) fn invalid(msg: impl Into<String>) -> eyre::Report {
        eyre::Report::new(TuneError::InvalidInput(msg.into()))
    }
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
