//! # CLI
//!
//! `reqres-contract` runs a collection against a service and prints a
//! per-case report. Exit codes: 0 all passed, 1 contract failures,
//! 2 infrastructure errors or bad configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{error, info};

use crate::collections::Collection;
use crate::config::{ConfigOverrides, RunnerConfig};
use crate::error::{ContractError, Result};
use crate::http::client::HttpClient;
use crate::storage;
use crate::testing::Runner;

/// Exit code for configuration problems detected before any request is sent.
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// CLI configuration parsed from command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "reqres-contract", version, about = "Run HTTP contract checks against the reqres API")]
pub struct CliConfig {
    /// Service root, e.g. https://reqres.in
    #[arg(long, env = "REQRES_BASE_URL")]
    pub base_url: Option<String>,

    /// API key value sent with authenticated cases
    #[arg(long, env = "REQRES_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Header carrying the API key
    #[arg(long, env = "REQRES_API_KEY_HEADER")]
    pub api_key_header: Option<String>,

    /// Per-request timeout in milliseconds (0 keeps the client default)
    #[arg(long, env = "REQRES_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON collection file to run instead of the built-in reqres collection
    #[arg(long)]
    pub collection: Option<PathBuf>,

    /// Only run cases whose name contains this text (repeatable)
    #[arg(short, long = "filter")]
    pub filters: Vec<String>,

    /// Path variable override, KEY=VALUE (repeatable)
    #[arg(long = "var", value_parser = parse_variable)]
    pub variables: Vec<(String, String)>,

    /// Report format written to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write a JSON report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// List selected case names and exit
    #[arg(long)]
    pub list: bool,
}

/// Output format for CLI reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl CliConfig {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            api_key_header: self.api_key_header.clone(),
            timeout_ms: self.timeout_ms,
            variables: self.variables.clone(),
        }
    }

    pub fn resolve_config(&self) -> Result<RunnerConfig> {
        // Flags already carry the REQRES_* environment values.
        let config =
            RunnerConfig::from_file(self.config.as_deref())?.with_overrides(self.overrides());
        config.validate()?;
        Ok(config)
    }

    pub fn resolve_collection(&self) -> Result<Collection> {
        let collection = match &self.collection {
            Some(path) => storage::load_collection(path)?,
            None => Collection::reqres(),
        };
        Ok(collection.select(&self.filters))
    }
}

/// Execute the CLI and return the process exit code.
pub async fn run(cli: CliConfig) -> Result<i32> {
    let config = cli.resolve_config()?;
    let collection = cli.resolve_collection()?;

    if cli.list {
        for name in collection.case_names() {
            println!("{name}");
        }
        return Ok(0);
    }

    if collection.cases.is_empty() {
        return Err(ContractError::Config(format!(
            "no cases in collection `{}` match the given filters",
            collection.name
        )));
    }

    let env = config.environment(&collection.variables)?;
    let client = HttpClient::new(config.timeout())?;
    let runner = Runner::new(client, env, config.api_key.clone());

    info!(
        collection = %collection.name,
        cases = collection.cases.len(),
        base_url = %runner.environment().base_url(),
        "starting run"
    );
    let report = runner.run(&collection.cases).await;

    match cli.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    // The run already happened; a lost report file must not mask its outcome.
    if let Some(path) = &cli.report {
        match storage::save_report(path, &report) {
            Ok(()) => info!(path = %path.display(), "report written"),
            Err(err) => error!(path = %path.display(), "{err}"),
        }
    }

    Ok(report.exit_code())
}

fn parse_variable(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("Invalid variable `{raw}`, expected KEY=VALUE"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Variable name cannot be empty: `{raw}`"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
