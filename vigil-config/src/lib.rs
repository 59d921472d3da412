//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Precedence: `VIGIL_`-prefixed environment variables win over file
//! values, and `${VAR}` placeholders inside string values are expanded
//! recursively (bounded depth) before deserialization. Every section is
//! optional; defaults target the NDMA advisories page and a local
//! chromedriver.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct VigilConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// The page to scrape and the label stamped onto every record.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_url")]
    pub url: String,
    #[serde(default = "default_source_label")]
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    #[serde(default = "default_true")]
    pub headless: bool,
    #[serde(default = "default_ready_timeout_secs")]
    pub ready_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_interval_mins")]
    pub interval_mins: u64,
    #[serde(default = "default_collection")]
    pub collection: String,
}

/// The tag is `provider`; Firestore is the production target, `memory`
/// keeps everything in-process for tests and dry runs.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum StoreConfig {
    Firestore {
        project_id: String,
        #[serde(default)]
        auth_token: Option<String>,
        #[serde(default = "default_firestore_endpoint")]
        endpoint: String,
    },
    Memory,
}

fn default_source_url() -> String {
    "https://www.ndma.gov.pk/advisories".into()
}
fn default_source_label() -> String {
    "NDMA Pakistan".into()
}
fn default_webdriver_url() -> String {
    "http://localhost:9515".into()
}
fn default_true() -> bool {
    true
}
fn default_ready_timeout_secs() -> u64 {
    20
}
fn default_bind() -> String {
    "0.0.0.0:5000".into()
}
fn default_interval_mins() -> u64 {
    15
}
fn default_collection() -> String {
    "advisories".into()
}
fn default_firestore_endpoint() -> String {
    "https://firestore.googleapis.com".into()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            label: default_source_label(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: true,
            ready_timeout_secs: default_ready_timeout_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_mins: default_interval_mins(),
            collection: default_collection(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Memory
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if !s.contains('$') {
                return;
            }
            let mut current = std::mem::take(s);
            for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                let expanded = shellexpand::env(&current)
                    .map(|cow| cow.into_owned())
                    .unwrap_or_else(|_| current.clone());
                if expanded == current {
                    break;
                }
                current = expanded;
            }
            *s = current;
        }
        Value::Array(items) => items.iter_mut().for_each(expand_env_in_value),
        Value::Object(map) => map.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML file + env overrides).
pub struct VigilConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for VigilConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl VigilConfigLoader {
    /// Start with the defaults: `VIGIL_` env overrides with `__` nesting.
    ///
    /// ```
    /// use vigil_config::VigilConfigLoader;
    ///
    /// let config = VigilConfigLoader::new().load().expect("valid config");
    /// assert_eq!(config.sync.interval_mins, 15);
    /// assert_eq!(config.source.label, "NDMA Pakistan");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a config file. The file is optional so headless deployments
    /// can rely purely on environment variables; the `config` crate infers
    /// the format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet; used by tests and the CLI.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// ```
    /// use vigil_config::{StoreConfig, VigilConfigLoader};
    ///
    /// let config = VigilConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// sync:
    ///   interval_mins: 5
    /// store:
    ///   provider: memory
    /// "#,
    ///     )
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.sync.interval_mins, 5);
    /// assert!(matches!(config.store, StoreConfig::Memory));
    /// ```
    pub fn load(self) -> Result<VigilConfig, ConfigError> {
        // Environment goes in last: the `config` crate gives precedence to
        // later sources, and env must win over any attached file.
        let merged = self
            .builder
            .add_source(
                Environment::with_prefix("VIGIL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Round-trip through serde_json so `${VAR}` placeholders can be
        // expanded anywhere in the tree before typing the result.
        let mut v: Value = merged.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
