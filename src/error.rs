//! Error types for cluster permutation testing.

/// Error type for test construction and execution failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The sample matrix is unusable (empty, too few epochs, non-finite values).
    InvalidInput(String),
    /// A configuration parameter is out of range.
    InvalidConfig(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Build an `InvalidInput` from anything displayable.
    pub(crate) fn input(msg: impl std::fmt::Display) -> Self {
        Error::InvalidInput(msg.to_string())
    }

    /// Build an `InvalidConfig` from anything displayable.
    pub(crate) fn config(msg: impl std::fmt::Display) -> Self {
        Error::InvalidConfig(msg.to_string())
    }
}
