use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::collections::Collection;
use crate::config::RunnerConfig;
use crate::error::{ContractError, Result};
use crate::testing::RunReport;

pub fn load_config(path: &Path) -> Result<RunnerConfig> {
    load_json(path, "config")
}

pub fn load_collection(path: &Path) -> Result<Collection> {
    load_json(path, "collection")
}

/// Write the report as pretty JSON, creating parent directories as needed.
pub fn save_report(path: &Path, report: &RunReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            ContractError::Config(format!(
                "Failed to create report directory `{}`: {e}",
                parent.display()
            ))
        })?;
    }
    let raw = report.to_json()?;
    fs::write(path, raw).map_err(|e| {
        ContractError::Config(format!(
            "Failed to write report file `{}`: {e}",
            path.display()
        ))
    })
}

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let raw = fs::read_to_string(path).map_err(|e| {
        ContractError::Config(format!("Failed to read {what} file `{}`: {e}", path.display()))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        ContractError::Config(format!("Failed to parse {what} file `{}`: {e}", path.display()))
    })
}
