//! # Authentication
//!
//! The service under test authenticates with a static API-key header. A case
//! either carries that header or deliberately omits it.

use serde::{Deserialize, Serialize};

use crate::error::{ContractError, Result};
use crate::http::request::RequestInput;

pub const DEFAULT_API_KEY_HEADER: &str = "x-api-key";
pub const DEFAULT_API_KEY: &str = "reqres-free-v1";

/// Static API-key credential sent as a request header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    pub header: String,
    pub value: String,
}

impl Default for ApiKey {
    fn default() -> Self {
        Self {
            header: DEFAULT_API_KEY_HEADER.to_string(),
            value: DEFAULT_API_KEY.to_string(),
        }
    }
}

impl ApiKey {
    pub fn new(header: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            value: value.into(),
        }
    }

    pub fn apply(&self, request: RequestInput) -> Result<RequestInput> {
        let header = self.header.trim();
        if header.is_empty() {
            return Err(ContractError::InvalidRequest(
                "API key header name cannot be empty".to_string(),
            ));
        }
        Ok(request.header(header, self.value.trim()))
    }
}

/// Whether a case sends the credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseAuth {
    #[default]
    ApiKey,
    Anonymous,
}

impl CaseAuth {
    pub fn apply(self, key: &ApiKey, request: RequestInput) -> Result<RequestInput> {
        match self {
            CaseAuth::ApiKey => key.apply(request),
            CaseAuth::Anonymous => Ok(request),
        }
    }
}
