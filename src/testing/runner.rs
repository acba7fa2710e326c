use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::auth::ApiKey;
use crate::environment::Environment;
use crate::error::ContractError;
use crate::http::client::HttpClient;
use crate::http::method::HttpMethod;

use super::assertion::AssertionResult;
use super::case::ContractCase;
use super::report::RunReport;

/// Category of an error that stopped a case before all checks ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    MalformedResponse,
    InvalidRequest,
}

impl From<&ContractError> for ErrorKind {
    fn from(err: &ContractError) -> Self {
        match err {
            ContractError::Transport(_) => ErrorKind::Transport,
            ContractError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            ContractError::InvalidRequest(_)
            | ContractError::Config(_)
            | ContractError::Serialization(_) => ErrorKind::InvalidRequest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CaseOutcome {
    Passed,
    /// At least one assertion did not hold.
    Failed,
    /// The case could not be evaluated at all.
    Errored { kind: ErrorKind, message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub name: String,
    pub method: HttpMethod,
    pub url: Option<String>,
    pub status: Option<u16>,
    pub duration_ms: u128,
    #[serde(flatten)]
    pub outcome: CaseOutcome,
    pub assertions: Vec<AssertionResult>,
}

impl CaseResult {
    pub fn failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.assertions.iter().filter(|a| !a.passed)
    }
}

/// Executes contract cases one after another against a single environment.
#[derive(Debug, Clone)]
pub struct Runner {
    client: HttpClient,
    env: Environment,
    api_key: ApiKey,
}

impl Runner {
    pub fn new(client: HttpClient, env: Environment, api_key: ApiKey) -> Self {
        Self {
            client,
            env,
            api_key,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Run every case in order. A failing or erroring case never stops the run.
    pub async fn run(&self, cases: &[ContractCase]) -> RunReport {
        let started = Instant::now();
        let mut results = Vec::with_capacity(cases.len());
        for case in cases {
            results.push(self.run_case(case).await);
        }
        RunReport::from_results(results, started.elapsed().as_millis())
    }

    pub async fn run_case(&self, case: &ContractCase) -> CaseResult {
        let started = Instant::now();
        let mut result = CaseResult {
            name: case.name.clone(),
            method: case.method,
            url: None,
            status: None,
            duration_ms: 0,
            outcome: CaseOutcome::Passed,
            assertions: Vec::with_capacity(case.assertions.len()),
        };

        if let Err(err) = self.execute(case, &mut result).await {
            warn!(case = %case.name, error = %err, "case errored");
            result.outcome = CaseOutcome::Errored {
                kind: ErrorKind::from(&err),
                message: err.to_string(),
            };
        } else if result.failures().next().is_some() {
            for failure in result.failures() {
                warn!(case = %case.name, "{}", failure.message);
            }
            result.outcome = CaseOutcome::Failed;
        } else {
            info!(case = %case.name, status = ?result.status, "case passed");
        }

        result.duration_ms = started.elapsed().as_millis();
        result
    }

    async fn execute(&self, case: &ContractCase, result: &mut CaseResult) -> crate::Result<()> {
        let request = case.build_request(&self.env, &self.api_key)?;
        result.url = Some(request.url.clone());
        info!(case = %case.name, method = %request.method, url = %request.url, "running case");

        let response = self.client.send(&request).await?;
        result.status = Some(response.status);

        for assertion in &case.assertions {
            result.assertions.push(assertion.evaluate(&response)?);
        }
        Ok(())
    }
}
