pub mod client;
pub mod config;
pub mod error;
pub mod output;

pub use client::{
    AdapterError, AdapterRegistry, BoardAdapter, JobPosting, RemoteType, SearchCriteria,
    SearchOrchestrator,
};
pub use config::{BoardConfig, Config, SearchConfig};
pub use error::{Error, Result};
pub use output::FileWriter;
