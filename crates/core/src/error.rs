//! Error types shared across the engine crates

use thiserror::Error;

/// Result alias used throughout the workspace
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for the retrieval engine
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or missing configuration (corpus, synonyms, settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure inside the retrieval pipeline
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Failure writing to the preference store
    #[error("Preference store error: {0}")]
    Preference(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config("corpus is empty".to_string());
        assert_eq!(err.to_string(), "Configuration error: corpus is empty");
    }
}
