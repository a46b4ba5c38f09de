use crate::client::boards::{AdapterRegistry, BoardAdapter, SearchCriteria};
use crate::client::JobPosting;
use crate::config::{Config, SearchConfig};
use crate::error::{Error, Result};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Coordinates searches across the configured job boards.
///
/// Two phases: adapters are constructed once from configuration, then any
/// number of runs execute against that fixed set. Board-level skips during
/// initialization are never fatal; ending up with zero adapters only fails
/// the first search attempt.
pub struct SearchOrchestrator {
    adapters: Vec<Arc<dyn BoardAdapter>>,
    search_config: SearchConfig,
}

impl SearchOrchestrator {
    /// Construct adapter instances for every enabled board, in listed
    /// order. Boards that are disabled, name no adapter, name an
    /// unregistered adapter, or fail construction are skipped with a log.
    #[must_use]
    pub fn new(config: &Config, registry: &AdapterRegistry) -> Self {
        let mut adapters: Vec<Arc<dyn BoardAdapter>> = Vec::new();

        for board in &config.boards {
            if !board.enabled {
                debug!("Skipping disabled board: {}", board.name);
                continue;
            }

            let Some(adapter_name) = board.adapter.as_deref() else {
                warn!("Board '{}' has no adapter specified", board.name);
                continue;
            };

            let Some(factory) = registry.get(adapter_name) else {
                warn!(
                    "No adapter implementation found for '{adapter_name}'. Skipping board '{}'",
                    board.name
                );
                continue;
            };

            match factory(board) {
                Ok(adapter) => {
                    info!("Initialized adapter for board: {}", board.name);
                    adapters.push(adapter);
                }
                Err(e) => {
                    error!(
                        "Failed to initialize adapter for board '{}': {e}",
                        board.name
                    );
                }
            }
        }

        if adapters.is_empty() {
            warn!("No adapters initialized. No job boards are enabled.");
        } else {
            info!("Successfully initialized {} adapter(s)", adapters.len());
        }

        Self {
            adapters,
            search_config: config.search.clone(),
        }
    }

    /// One criteria object per run, shared by every adapter in that run.
    fn build_search_criteria(&self) -> SearchCriteria {
        let criteria = SearchCriteria {
            keywords: self.search_config.keywords.clone(),
            location: self.search_config.location.clone(),
            remote: self.search_config.remote,
            employment_type: self.search_config.employment_type.clone(),
        };
        debug!("Built search criteria: {criteria:?}");
        criteria
    }

    /// Search all boards, tolerating per-board failure.
    ///
    /// Returns the concatenation of every successful board's results, in
    /// adapter-construction order with each board's own order preserved.
    /// Results are never deduplicated across boards.
    pub async fn run_search(&self) -> Result<Vec<JobPosting>> {
        if self.adapters.is_empty() {
            return Err(Error::NoAdaptersAvailable);
        }

        info!("Starting search across {} job board(s)", self.adapters.len());
        let criteria = self.build_search_criteria();

        let mut all_results = Vec::new();
        let mut successful_boards = 0usize;
        let mut failed_boards = 0usize;

        for adapter in &self.adapters {
            let board_name = adapter.board_name();
            info!("Searching {board_name}...");

            match adapter.search(&criteria).await {
                Ok(results) => {
                    info!("{board_name}: Found {} job(s)", results.len());
                    all_results.extend(results);
                    successful_boards += 1;
                }
                Err(e) => {
                    // Keep going with the remaining boards
                    error!("{board_name}: Search failed - {e}");
                    failed_boards += 1;
                }
            }
        }

        info!(
            "Search complete: {} total job(s) from {successful_boards} board(s) ({failed_boards} failed)",
            all_results.len()
        );

        Ok(all_results)
    }

    /// Search one board by name (case-insensitive).
    ///
    /// Unlike `run_search`, an adapter failure here propagates: the caller
    /// asked for exactly this board and must learn if it failed.
    pub async fn search_specific_board(&self, board_name: &str) -> Result<Vec<JobPosting>> {
        let adapter = self
            .adapters
            .iter()
            .find(|a| a.board_name().eq_ignore_ascii_case(board_name))
            .ok_or_else(|| Error::BoardNotFound {
                requested: board_name.to_string(),
                available: self.get_enabled_boards().join(", "),
            })?;

        info!("Searching specific board: {board_name}");
        let criteria = self.build_search_criteria();

        let results = adapter.search(&criteria).await?;
        info!("{}: Found {} job(s)", adapter.board_name(), results.len());
        Ok(results)
    }

    /// Names of the constructed adapters, in construction order
    #[must_use]
    pub fn get_enabled_boards(&self) -> Vec<String> {
        self.adapters
            .iter()
            .map(|adapter| adapter.board_name().to_string())
            .collect()
    }
}
