use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// The producer gave up abnormally. Normal exhaustion is never an error.
    #[error("producer faulted: {0}")]
    Fault(String),

    #[error("index {index} out of range for materialized sequence of length {len}")]
    Index { index: usize, len: usize },

    #[error("cached sequence was pulled from while it was already producing")]
    Reentrancy,
}

impl SequenceError {
    pub fn fault(reason: impl Into<String>) -> Self {
        Self::Fault(reason.into())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown demo '{name}' (expected one of: {known})")]
    UnknownDemo { name: String, known: String },

    #[error("invalid delay '{value}': expected a whole number of milliseconds")]
    InvalidDelay { value: String },

    #[error("flag '{flag}' requires a value")]
    MissingValue { flag: String },

    #[error("unknown flag '{flag}'")]
    UnknownFlag { flag: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
