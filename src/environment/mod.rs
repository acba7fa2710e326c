//! # Environment & Variables
//!
//! Cases name their targets as paths such as `/api/users/{{user_id}}`. The
//! environment supplies the base URL and the variable values, so the same
//! catalogue can run against the public service or a local stub.

use std::collections::BTreeMap;

use url::Url;

use crate::error::{ContractError, Result};

/// Base URL plus the variables used to resolve case paths.
#[derive(Debug, Clone)]
pub struct Environment {
    base_url: String,
    variables: BTreeMap<String, String>,
}

impl Environment {
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim();
        let parsed = Url::parse(trimmed)
            .map_err(|e| ContractError::Config(format!("Invalid base URL `{trimmed}`: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ContractError::Config(format!(
                "Base URL must use http or https: `{trimmed}`"
            )));
        }

        Ok(Self {
            base_url: trimmed.trim_end_matches('/').to_string(),
            variables: BTreeMap::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Merge variables; later values override earlier ones.
    pub fn with_variables<I, K, V>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in variables {
            self.variables.insert(key.into(), value.into());
        }
        self
    }

    pub fn variable(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Interpolate `{{variable}}` placeholders in the given text.
    ///
    /// One left-to-right pass: substituted values are not rescanned, and
    /// unknown placeholders are left as written.
    pub fn interpolate(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                result.push_str(&rest[start..]);
                return result;
            };
            let name = &after[..end];
            match self.variables.get(name.trim()) {
                Some(value) => result.push_str(value),
                None => result.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after[end + 2..];
        }
        result.push_str(rest);
        result
    }

    /// Turn a case path into an absolute URL.
    pub fn resolve_url(&self, path: &str) -> Result<String> {
        let path = self.interpolate(path.trim());
        if let Some(start) = path.find("{{") {
            let rest = &path[start..];
            let name = rest.split("}}").next().unwrap_or(rest);
            return Err(ContractError::InvalidRequest(format!(
                "Unresolved variable `{name}}}}}` in `{path}`"
            )));
        }

        let url = if path.starts_with("http://") || path.starts_with("https://") {
            path
        } else if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        };

        Url::parse(&url)
            .map_err(|e| ContractError::InvalidRequest(format!("Invalid URL `{url}`: {e}")))?;
        Ok(url)
    }
}
