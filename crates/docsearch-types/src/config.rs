//! Configuration loading for docsearch.
//!
//! Layered config: defaults -> config file -> env vars. Connection
//! parameters are consumed once at process startup; there is no runtime
//! reconfiguration. Config file lives at ~/.config/docsearch/config.toml.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::TypesError;

/// Connection and sync settings.
///
/// Environment variables use the DOCSEARCH_ prefix:
/// DOCSEARCH_HOST, DOCSEARCH_USER, DOCSEARCH_PASSWORD, DOCSEARCH_CA_CERTS,
/// DOCSEARCH_CERT_FINGERPRINT, DOCSEARCH_INDEX, etc.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Search engine base URL
    #[serde(default = "default_host")]
    pub host: String,

    /// Basic auth username
    #[serde(default = "default_user")]
    pub user: String,

    /// Basic auth password (never logged, never serialized)
    #[serde(default = "default_password")]
    pub password: SecretString,

    /// Path to a PEM CA bundle for TLS verification
    #[serde(default)]
    pub ca_certs: Option<String>,

    /// Expected TLS certificate fingerprint pin
    #[serde(default)]
    pub cert_fingerprint: Option<String>,

    /// Name of the search index
    #[serde(default = "default_index")]
    pub index: String,

    /// Whether mutations trigger index sync automatically
    #[serde(default = "default_autosync")]
    pub autosync: bool,

    /// Hint that the store client may parallelize bulk requests
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Maximum sync entries per pipeline batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "http://localhost:9200".to_string()
}

fn default_user() -> String {
    "elastic".to_string()
}

fn default_password() -> SecretString {
    SecretString::from("changeme")
}

fn default_index() -> String {
    "documents".to_string()
}

fn default_autosync() -> bool {
    true
}

fn default_parallel() -> bool {
    true
}

fn default_batch_size() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: default_host(),
            user: default_user(),
            password: default_password(),
            ca_certs: None,
            cert_fingerprint: None,
            index: default_index(),
            autosync: default_autosync(),
            parallel: default_parallel(),
            batch_size: default_batch_size(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/docsearch/config.toml)
    /// 3. Caller-specified config file (optional)
    /// 4. Environment variables (DOCSEARCH_*)
    pub fn load(config_path: Option<&str>) -> Result<Self, TypesError> {
        let config_dir = ProjectDirs::from("", "", "docsearch")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("host", default_host())
            .map_err(|e| TypesError::Config(e.to_string()))?
            .set_default("user", default_user())
            .map_err(|e| TypesError::Config(e.to_string()))?
            .set_default("password", "changeme")
            .map_err(|e| TypesError::Config(e.to_string()))?
            .set_default("index", default_index())
            .map_err(|e| TypesError::Config(e.to_string()))?
            .set_default("autosync", default_autosync())
            .map_err(|e| TypesError::Config(e.to_string()))?
            .set_default("parallel", default_parallel())
            .map_err(|e| TypesError::Config(e.to_string()))?
            .set_default("batch_size", default_batch_size() as i64)
            .map_err(|e| TypesError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| TypesError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Flat keys, so no separator: DOCSEARCH_CA_CERTS -> ca_certs
        builder = builder.add_source(Environment::with_prefix("DOCSEARCH").try_parsing(true));

        let config = builder
            .build()
            .map_err(|e| TypesError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| TypesError::Config(e.to_string()))
    }
}
