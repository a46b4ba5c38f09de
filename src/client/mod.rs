pub mod boards;
pub mod orchestrator;
pub mod rate_limiter;

pub use boards::{AdapterError, AdapterRegistry, BoardAdapter, SearchCriteria};
pub use orchestrator::SearchOrchestrator;
pub use rate_limiter::RateLimiter;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Workplace arrangement of a posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteType {
    Remote,
    Hybrid,
    Onsite,
}

impl RemoteType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Hybrid => "hybrid",
            Self::Onsite => "onsite",
        }
    }
}

impl std::fmt::Display for RemoteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized job posting produced by a board adapter.
///
/// Constructed fresh per search result by the adapter's conversion routine
/// and never mutated afterwards. `requirements` and `raw_data` are always
/// present, possibly empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    /// Job title
    pub title: String,
    /// Employer name
    pub company: String,
    /// Free-text location, or a fixed placeholder when unknown
    pub location: String,
    /// Workplace arrangement
    pub remote_type: RemoteType,
    /// Lower salary bound, currency unspecified
    pub salary_min: Option<i64>,
    /// Upper salary bound, currency unspecified
    pub salary_max: Option<i64>,
    /// Full description, possibly empty
    pub description: String,
    /// Requirement lines in source order
    pub requirements: Vec<String>,
    /// When the posting was published, if the source said
    pub posted_date: Option<DateTime<Utc>>,
    /// Application link, possibly empty
    pub job_url: String,
    /// Name of the source board
    pub board_name: String,
    /// Board-specific identifier, possibly empty
    pub board_job_id: String,
    /// Unmodified source record, retained for diagnostics
    pub raw_data: serde_json::Map<String, serde_json::Value>,
}
