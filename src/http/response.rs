use std::collections::BTreeMap;

use serde_json::Value;

/// Parsed response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Zero-length body, as returned with 204.
    Empty,
    Json(Value),
    /// Non-empty body that is not valid JSON.
    Text(String),
}

impl ResponseBody {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return ResponseBody::Empty;
        }
        match serde_json::from_slice(bytes) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ResponseBody::Empty)
    }

    /// Short human-readable rendering used in failure messages.
    pub fn preview(&self) -> String {
        const LIMIT: usize = 200;
        let raw = match self {
            ResponseBody::Empty => return "<empty>".to_string(),
            ResponseBody::Json(value) => value.to_string(),
            ResponseBody::Text(text) => text.clone(),
        };
        if raw.chars().count() > LIMIT {
            let cut: String = raw.chars().take(LIMIT).collect();
            format!("{cut}…")
        } else {
            raw
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    pub body: ResponseBody,
    pub duration_ms: u128,
    pub size_bytes: usize,
}
