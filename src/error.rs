use thiserror::Error;

use crate::client::boards::AdapterError;

/// Top-level error type for the pipeline.
///
/// Failures scoped to a single record or a single board are absorbed closer
/// to where they happen (inside the adapter, or inside `run_search`); only
/// failures that make the whole run meaningless reach this type.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (fatal at the point raised)
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration file not found: {path}")]
    ConfigFileNotFound { path: String },

    #[error("Environment variable '{name}' referenced in {context} is not set")]
    MissingEnvVar { name: String, context: String },

    // I/O errors (file writer, config plumbing)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    // Requested board unknown or disabled
    #[error("Board '{requested}' not found or not enabled. Available boards: {available}")]
    BoardNotFound { requested: String, available: String },

    // run_search invoked with zero constructed adapters
    #[error(
        "No job board adapters available. Check configuration and ensure at least one board is enabled."
    )]
    NoAdaptersAvailable,

    // Adapter failure surfaced by search_specific_board
    #[error("Board adapter error: {0}")]
    Adapter(AdapterError),
}

pub type Result<T> = std::result::Result<T, Error>;

// Adapter error conversion. run_search absorbs these per board; the
// specific-board path re-raises them through this impl.
impl From<AdapterError> for Error {
    fn from(err: AdapterError) -> Self {
        Self::Adapter(err)
    }
}
