use super::jsearch::JSearchAdapter;
use super::traits::{AdapterError, BoardAdapter};
use crate::config::BoardConfig;
use std::collections::HashMap;
use std::sync::Arc;

/// Constructor for one adapter implementation
pub type AdapterFactory =
    Box<dyn Fn(&BoardConfig) -> Result<Arc<dyn BoardAdapter>, AdapterError> + Send + Sync>;

/// Lookup table from adapter-name keys to constructors.
///
/// Populated once at startup and read-only afterwards. Looking up an
/// unknown name is not an error here; the orchestrator decides how to
/// handle absence.
#[derive(Default)]
pub struct AdapterRegistry {
    factories: HashMap<String, AdapterFactory>,
}

impl AdapterRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every adapter shipped with the crate.
    ///
    /// Future adapters (adzuna, remoteok, remotive, ...) register here.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("jsearch", |config| {
            let adapter: Arc<dyn BoardAdapter> = Arc::new(JSearchAdapter::from_config(config)?);
            Ok(adapter)
        });
        registry
    }

    /// Register a constructor under an adapter-name key
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&BoardConfig) -> Result<Arc<dyn BoardAdapter>, AdapterError> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    /// Look up a constructor; `None` when the name is unknown
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AdapterFactory> {
        self.factories.get(name)
    }

    /// Registered adapter-name keys
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_registers_jsearch() {
        let registry = AdapterRegistry::builtin();
        assert!(registry.get("jsearch").is_some());
        assert!(registry.names().contains(&"jsearch"));
    }

    #[test]
    fn test_unknown_name_is_not_an_error() {
        let registry = AdapterRegistry::builtin();
        assert!(registry.get("adzuna").is_none());
    }

    #[test]
    fn test_builtin_factory_constructs_adapter() {
        let registry = AdapterRegistry::builtin();
        let config: BoardConfig = serde_json::from_value(json!({
            "name": "JSearch",
            "enabled": true,
            "adapter": "jsearch",
            "api_key": "test-key"
        }))
        .unwrap();

        let factory = registry.get("jsearch").unwrap();
        let adapter = factory(&config).unwrap();
        assert_eq!(adapter.board_name(), "JSearch");
    }

    #[test]
    fn test_builtin_factory_propagates_construction_failure() {
        let registry = AdapterRegistry::builtin();
        let config: BoardConfig = serde_json::from_value(json!({
            "name": "JSearch",
            "enabled": true,
            "adapter": "jsearch"
        }))
        .unwrap();

        let factory = registry.get("jsearch").unwrap();
        assert!(matches!(
            factory(&config),
            Err(AdapterError::MissingCredential(_))
        ));
    }
}
