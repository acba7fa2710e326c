//! Runner configuration.
//!
//! Layers, lowest precedence first: built-in defaults, an optional JSON
//! file, `REQRES_*` environment variables, then command-line flags.
//!
//! Environment variables:
//! - REQRES_BASE_URL: service root (default: https://reqres.in)
//! - REQRES_API_KEY: value of the API-key header (default: reqres-free-v1)
//! - REQRES_API_KEY_HEADER: header name (default: x-api-key)
//! - REQRES_TIMEOUT_MS: per-request timeout; unset or 0 keeps the client default

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::ApiKey;
use crate::environment::Environment;
use crate::error::{ContractError, Result};
use crate::storage;

pub const DEFAULT_BASE_URL: &str = "https://reqres.in";

pub const ENV_BASE_URL: &str = "REQRES_BASE_URL";
pub const ENV_API_KEY: &str = "REQRES_API_KEY";
pub const ENV_API_KEY_HEADER: &str = "REQRES_API_KEY_HEADER";
pub const ENV_TIMEOUT_MS: &str = "REQRES_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RunnerConfig {
    pub base_url: String,
    pub api_key: ApiKey,
    pub timeout_ms: Option<u64>,
    /// Extra path variables; override the collection's own.
    pub variables: BTreeMap<String, String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: ApiKey::default(),
            timeout_ms: None,
            variables: BTreeMap::new(),
        }
    }
}

/// Values supplied on the command line; `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub api_key_header: Option<String>,
    pub timeout_ms: Option<u64>,
    pub variables: Vec<(String, String)>,
}

impl RunnerConfig {
    /// Defaults, or the file when one is given.
    pub fn from_file(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => storage::load_config(path),
            None => Ok(Self::default()),
        }
    }

    /// Defaults, then the file (if any), then the process environment.
    ///
    /// For library callers; the CLI reads the same variables through clap.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_file(path)?.with_env(|key| std::env::var(key).ok())
    }

    /// Apply `REQRES_*` variables read through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(base_url) = read(ENV_BASE_URL) {
            debug!(base_url = %base_url, "base URL from environment");
            self.base_url = base_url;
        }
        if let Some(value) = read(ENV_API_KEY) {
            self.api_key.value = value;
        }
        if let Some(header) = read(ENV_API_KEY_HEADER) {
            self.api_key.header = header;
        }
        if let Some(raw) = read(ENV_TIMEOUT_MS) {
            let ms = raw.parse::<u64>().map_err(|e| {
                ContractError::Config(format!("{ENV_TIMEOUT_MS} must be an integer: {e}"))
            })?;
            self.timeout_ms = Some(ms);
        }
        Ok(self)
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(value) = overrides.api_key {
            self.api_key.value = value;
        }
        if let Some(header) = overrides.api_key_header {
            self.api_key.header = header;
        }
        if overrides.timeout_ms.is_some() {
            self.timeout_ms = overrides.timeout_ms;
        }
        self.variables.extend(overrides.variables);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ContractError::Config("base_url cannot be empty".to_string()));
        }
        if self.api_key.header.trim().is_empty() {
            return Err(ContractError::Config(
                "API key header name cannot be empty".to_string(),
            ));
        }
        // Parses and checks the scheme.
        Environment::new(&self.base_url)?;
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.filter(|ms| *ms > 0).map(Duration::from_millis)
    }

    /// Environment for a collection: its variables first, config variables on top.
    pub fn environment(&self, collection_vars: &BTreeMap<String, String>) -> Result<Environment> {
        Ok(Environment::new(&self.base_url)?
            .with_variables(collection_vars.clone())
            .with_variables(self.variables.clone()))
    }
}
