use crate::client::JobPosting;
use async_trait::async_trait;
use thiserror::Error;

/// Generic search criteria built once per run and shared across adapters.
///
/// Each adapter translates these into its own native query parameters.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    /// Keywords, joined by the adapter as its query language requires
    pub keywords: Vec<String>,
    /// Free-text location, empty when unconstrained
    pub location: String,
    /// Restrict to remote-only postings
    pub remote: Option<bool>,
    /// Employment type filter (e.g. "FULLTIME"), adapter-interpreted
    pub employment_type: Option<String>,
}

/// Errors that can occur during board adapter operations
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Invalid board configuration: {0}")]
    InvalidConfig(String),

    #[error("Job not found: {0}")]
    NotFound(String),
}

/// Trait for job board adapters.
///
/// An adapter translates generic search criteria into one board's native
/// query and that board's native results back into normalized postings.
/// Zero results is not an error; adapters return an error only for
/// transport or API failures. Required credentials are validated at
/// construction, never deferred to first use.
#[async_trait]
pub trait BoardAdapter: Send + Sync {
    /// Board name matching the configuration entry
    fn board_name(&self) -> &str;

    /// Execute a search and return normalized postings
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<JobPosting>, AdapterError>;

    /// Fetch full details for one posting by its board-specific id
    async fn get_job_details(&self, job_id: &str) -> Result<JobPosting, AdapterError>;
}
