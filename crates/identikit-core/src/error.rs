use thiserror::Error;

/// Core error type shared across Identikit crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A generated record violates one of the documented field formats.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    /// A batch request cannot be served as given.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Convenience alias for results returned by Identikit crates.
pub type Result<T> = std::result::Result<T, Error>;
