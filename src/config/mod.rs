//! Configuration loading for the pipeline.
//!
//! Configuration lives in a directory of YAML files. Every file is read,
//! `${VAR}` tokens are substituted from the process environment, and the
//! resolved text is parsed and deserialized into typed structs. A
//! referenced but unset variable fails the load before anything is
//! returned; the orchestrator only ever sees fully-resolved configuration.

use crate::error::{Error, Result};
use config::FileFormat;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

pub const SEARCH_CRITERIA_FILE: &str = "search-criteria.yaml";
pub const JOB_BOARDS_FILE: &str = "job-boards.yaml";
pub const FILTERS_FILE: &str = "filters.yaml";

/// Global search configuration, shared by all boards
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub remote: Option<bool>,
    #[serde(default)]
    pub employment_type: Option<String>,
}

/// One job-board entry.
///
/// `name`, `enabled`, and `adapter` are the orchestrator's concern; every
/// other key is adapter-specific (credentials, rate limits, default search
/// parameters) and is carried through opaquely.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub adapter: Option<String>,
    #[serde(flatten)]
    pub settings: serde_json::Map<String, Value>,
}

impl BoardConfig {
    /// The adapter-specific settings as one JSON object, for the adapter's
    /// own deserialization
    #[must_use]
    pub fn settings_value(&self) -> Value {
        Value::Object(self.settings.clone())
    }
}

/// Fully-loaded pipeline configuration, read-only after load
#[derive(Debug, Clone)]
pub struct Config {
    pub search: SearchConfig,
    pub boards: Vec<BoardConfig>,
    /// Notification settings (e.g. Slack), opaque to the core
    pub notifications: Option<Value>,
    /// Post-search filter settings, opaque to the core
    pub filters: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchFile {
    #[serde(default)]
    search: SearchConfig,
}

#[derive(Debug, Default, Deserialize)]
struct BoardsFile {
    #[serde(default)]
    boards: Vec<BoardConfig>,
    #[serde(default)]
    notifications: Option<Value>,
}

impl Config {
    /// Load all configuration files from a directory.
    ///
    /// `search-criteria.yaml` and `job-boards.yaml` are required;
    /// `filters.yaml` is optional.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let search_file: SearchFile = load_yaml_file(&config_dir.join(SEARCH_CRITERIA_FILE))?;
        let boards_file: BoardsFile = load_yaml_file(&config_dir.join(JOB_BOARDS_FILE))?;

        let filters_path = config_dir.join(FILTERS_FILE);
        let filters = if filters_path.exists() {
            Some(load_yaml_file::<Value>(&filters_path)?)
        } else {
            None
        };

        debug!(
            "Loaded configuration: {} board(s), {} keyword(s)",
            boards_file.boards.len(),
            search_file.search.keywords.len()
        );

        Ok(Self {
            search: search_file.search,
            boards: boards_file.boards,
            notifications: boards_file.notifications,
            filters,
        })
    }
}

fn load_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(Error::ConfigFileNotFound {
            path: path.display().to_string(),
        });
    }

    let raw = std::fs::read_to_string(path)?;
    let resolved = substitute_env_vars(&raw, &path.display().to_string())?;

    let parsed = config::Config::builder()
        .add_source(config::File::from_str(&resolved, FileFormat::Yaml))
        .build()?;

    // Route through serde_json so flattened board settings deserialize
    // with their value types intact
    let value: Value = parsed.try_deserialize()?;
    Ok(serde_json::from_value(value)?)
}

/// Replace `${VAR}` tokens with environment values, failing on the first
/// referenced variable that is not set.
fn substitute_env_vars(raw: &str, context: &str) -> Result<String> {
    let pattern =
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("hardcoded pattern compiles");

    let mut resolved = String::with_capacity(raw.len());
    let mut last_end = 0;

    for captures in pattern.captures_iter(raw) {
        let token = captures.get(0).expect("capture 0 always present");
        let name = &captures[1];

        let value = std::env::var(name).map_err(|_| Error::MissingEnvVar {
            name: name.to_string(),
            context: context.to_string(),
        })?;

        resolved.push_str(&raw[last_end..token.start()]);
        resolved.push_str(&value);
        last_end = token.end();
    }

    resolved.push_str(&raw[last_end..]);
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config_dir(boards_yaml: &str, search_yaml: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(JOB_BOARDS_FILE), boards_yaml).unwrap();
        fs::write(dir.path().join(SEARCH_CRITERIA_FILE), search_yaml).unwrap();
        dir
    }

    #[test]
    fn test_load_full_configuration() {
        let dir = write_config_dir(
            r#"
boards:
  - name: JSearch
    enabled: true
    adapter: jsearch
    api_key: test-key
    rate_limit:
      requests_per_second: 2
  - name: Dormant
    adapter: jsearch
"#,
            r#"
search:
  keywords:
    - DevOps
    - Engineer
  location: Austin, TX
  remote: true
  employment_type: FULLTIME
"#,
        );

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.boards.len(), 2);
        assert_eq!(config.boards[0].name, "JSearch");
        assert!(config.boards[0].enabled);
        assert_eq!(config.boards[0].adapter.as_deref(), Some("jsearch"));
        assert_eq!(
            config.boards[0].settings.get("api_key"),
            Some(&Value::String("test-key".to_string()))
        );

        // enabled defaults to false when absent
        assert!(!config.boards[1].enabled);

        assert_eq!(config.search.keywords, vec!["DevOps", "Engineer"]);
        assert_eq!(config.search.location, "Austin, TX");
        assert_eq!(config.search.remote, Some(true));
        assert_eq!(config.search.employment_type.as_deref(), Some("FULLTIME"));
        assert!(config.filters.is_none());
    }

    #[test]
    fn test_env_substitution_resolves_tokens() {
        std::env::set_var("JOB_PIPELINE_TEST_KEY", "secret-from-env");
        let dir = write_config_dir(
            r#"
boards:
  - name: JSearch
    enabled: true
    adapter: jsearch
    api_key: ${JOB_PIPELINE_TEST_KEY}
"#,
            "search:\n  keywords: [Rust]\n",
        );

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(
            config.boards[0].settings.get("api_key"),
            Some(&Value::String("secret-from-env".to_string()))
        );
    }

    #[test]
    fn test_missing_env_var_fails_fast() {
        std::env::remove_var("JOB_PIPELINE_TEST_UNSET");
        let dir = write_config_dir(
            r#"
boards:
  - name: JSearch
    enabled: true
    adapter: jsearch
    api_key: ${JOB_PIPELINE_TEST_UNSET}
"#,
            "search:\n  keywords: [Rust]\n",
        );

        let result = Config::load(dir.path());
        assert!(matches!(
            result,
            Err(Error::MissingEnvVar { ref name, .. }) if name == "JOB_PIPELINE_TEST_UNSET"
        ));
    }

    #[test]
    fn test_missing_required_file_errors() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(JOB_BOARDS_FILE), "boards: []\n").unwrap();

        let result = Config::load(dir.path());
        assert!(matches!(result, Err(Error::ConfigFileNotFound { .. })));
    }

    #[test]
    fn test_optional_filters_loaded_when_present() {
        let dir = write_config_dir("boards: []\n", "search:\n  keywords: [Rust]\n");
        fs::write(
            dir.path().join(FILTERS_FILE),
            "exclude_companies:\n  - Initech\n",
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        let filters = config.filters.unwrap();
        assert!(filters.get("exclude_companies").is_some());
    }

    #[test]
    fn test_substitute_env_vars_plain_text_untouched() {
        let text = "no tokens here, just $dollars and {braces}";
        assert_eq!(substitute_env_vars(text, "test").unwrap(), text);
    }
}
