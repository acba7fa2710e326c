use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ContractError, Result};
use crate::http::response::{HttpResponse, ResponseBody};

/// A single expectation evaluated against a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assertion {
    StatusEquals { expected: u16 },
    FieldPresent { field: String },
    /// Present, not null, and not an empty string, array or object.
    FieldNonEmpty { field: String },
    FieldEquals { field: String, expected: Value },
    BodyEmpty,
}

impl Assertion {
    pub fn status(expected: u16) -> Self {
        Assertion::StatusEquals { expected }
    }

    pub fn present(field: impl Into<String>) -> Self {
        Assertion::FieldPresent { field: field.into() }
    }

    pub fn non_empty(field: impl Into<String>) -> Self {
        Assertion::FieldNonEmpty { field: field.into() }
    }

    pub fn equals(field: impl Into<String>, expected: impl Into<Value>) -> Self {
        Assertion::FieldEquals {
            field: field.into(),
            expected: expected.into(),
        }
    }

    /// Evaluate against a response.
    ///
    /// Field checks on a body that is neither empty nor JSON cannot be
    /// answered and surface as [`ContractError::MalformedResponse`].
    pub fn evaluate(&self, response: &HttpResponse) -> Result<AssertionResult> {
        let (passed, actual, message) = match self {
            Assertion::StatusEquals { expected } => {
                let actual = response.status;
                (
                    actual == *expected,
                    actual.to_string(),
                    format!("Expected status code {expected}, but got {actual}"),
                )
            }
            Assertion::BodyEmpty => (
                response.body.is_empty(),
                response.body.preview(),
                format!("Expected an empty body, but got {}", response.body.preview()),
            ),
            Assertion::FieldPresent { field } => match lookup(&response.body, field)? {
                Some(value) => (true, value.to_string(), String::new()),
                None => (false, MISSING.to_string(), missing_message(field)),
            },
            Assertion::FieldNonEmpty { field } => match lookup(&response.body, field)? {
                Some(value) if is_non_empty(value) => (true, value.to_string(), String::new()),
                Some(value) => (
                    false,
                    value.to_string(),
                    format!("Expected '{field}' to be non-empty, but got {value}"),
                ),
                None => (false, MISSING.to_string(), missing_message(field)),
            },
            Assertion::FieldEquals { field, expected } => match lookup(&response.body, field)? {
                Some(value) => (
                    value == expected,
                    value.to_string(),
                    format!("Expected {field} {expected}, but got {value}"),
                ),
                None => (false, MISSING.to_string(), missing_message(field)),
            },
        };

        Ok(AssertionResult {
            assertion: self.clone(),
            passed,
            actual,
            message: if passed { String::new() } else { message },
        })
    }
}

impl Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assertion::StatusEquals { expected } => write!(f, "status == {expected}"),
            Assertion::FieldPresent { field } => write!(f, "'{field}' present"),
            Assertion::FieldNonEmpty { field } => write!(f, "'{field}' non-empty"),
            Assertion::FieldEquals { field, expected } => write!(f, "'{field}' == {expected}"),
            Assertion::BodyEmpty => write!(f, "body empty"),
        }
    }
}

/// Result of evaluating an assertion.
#[derive(Debug, Clone, Serialize)]
pub struct AssertionResult {
    pub assertion: Assertion,
    pub passed: bool,
    pub actual: String,
    pub message: String,
}

const MISSING: &str = "<missing>";

fn missing_message(field: &str) -> String {
    format!("Response does not contain '{field}'")
}

/// Resolve a field by name; dotted names walk nested objects.
fn lookup<'a>(body: &'a ResponseBody, field: &str) -> Result<Option<&'a Value>> {
    match body {
        ResponseBody::Empty => Ok(None),
        ResponseBody::Text(text) => Err(ContractError::MalformedResponse(format!(
            "expected a JSON body to check '{field}', got: {}",
            body_excerpt(text)
        ))),
        ResponseBody::Json(value) => Ok(field
            .split('.')
            .try_fold(value, |current, segment| current.as_object()?.get(segment))),
    }
}

fn body_excerpt(text: &str) -> String {
    let excerpt: String = text.chars().take(80).collect();
    if excerpt.len() < text.len() {
        format!("{excerpt}…")
    } else {
        excerpt
    }
}

fn is_non_empty(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}
