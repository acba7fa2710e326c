use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::{ApiKey, CaseAuth};
use crate::environment::Environment;
use crate::error::{ContractError, Result};
use crate::http::method::HttpMethod;
use crate::http::request::RequestInput;

use super::assertion::Assertion;

/// One declarative contract check: a request and what the response must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractCase {
    pub name: String,
    pub method: HttpMethod,
    /// Path relative to the environment base URL; may contain `{{variables}}`.
    pub path: String,
    #[serde(default)]
    pub auth: CaseAuth,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<Value>,
    pub assertions: Vec<Assertion>,
}

impl ContractCase {
    pub fn new(name: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            auth: CaseAuth::ApiKey,
            headers: BTreeMap::new(),
            body: None,
            assertions: Vec::new(),
        }
    }

    pub fn anonymous(mut self) -> Self {
        self.auth = CaseAuth::Anonymous;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn expect(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    pub fn expect_status(self, status: u16) -> Self {
        self.expect(Assertion::status(status))
    }

    /// Expect every key of the request body to be echoed back unchanged.
    pub fn expect_echo(self) -> Self {
        let echoed: Vec<(String, Value)> = match &self.body {
            Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            _ => Vec::new(),
        };
        echoed
            .into_iter()
            .fold(self, |case, (field, value)| case.expect(Assertion::equals(field, value)))
    }

    /// Resolve the case into a concrete request.
    pub fn build_request(&self, env: &Environment, api_key: &ApiKey) -> Result<RequestInput> {
        let mut request = RequestInput::new(self.method, env.resolve_url(&self.path)?);
        for (name, value) in &self.headers {
            request = request.header(name.clone(), env.interpolate(value));
        }
        if let Some(body) = &self.body {
            if !self.method.carries_body() {
                return Err(ContractError::InvalidRequest(format!(
                    "case `{}`: {} requests cannot carry a body",
                    self.name, self.method
                )));
            }
            request = request.json(body.clone());
        }
        self.auth.apply(api_key, request)
    }
}
