//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while resolving a step's environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("environment variable '{var}' is not set")]
    MissingVar { var: String },

    /// An environment variable holds something that is not valid Unicode.
    #[error("environment variable '{var}' is not valid unicode")]
    NotUnicode { var: String },
}
