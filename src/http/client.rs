use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::{ContractError, Result};

use super::request::RequestInput;
use super::response::{HttpResponse, ResponseBody};

/// Thin wrapper over a single `reqwest::Client` reused for a whole run.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    /// Build a client. Without a timeout the reqwest default applies.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout.filter(|t| !t.is_zero()) {
            builder = builder.timeout(timeout);
        }
        let inner = builder
            .build()
            .map_err(|e| ContractError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { inner })
    }

    /// Send exactly one request and read the full response body.
    pub async fn send(&self, request: &RequestInput) -> Result<HttpResponse> {
        let method: reqwest::Method = request.method.into();
        let url = reqwest::Url::parse(&request.url)
            .map_err(|e| ContractError::InvalidRequest(format!("Invalid URL `{}`: {e}", request.url)))?;

        let mut req_builder = self
            .inner
            .request(method, url)
            .headers(build_headers(&request.headers)?);

        match &request.body {
            Some(body) if request.method.carries_body() => req_builder = req_builder.json(body),
            Some(_) => warn!(method = %request.method, url = %request.url, "dropping body on a method without one"),
            None => {}
        }

        debug!(method = %request.method, url = %request.url, "sending request");
        let started = Instant::now();
        let response = req_builder.send().await?;
        let elapsed = started.elapsed().as_millis();

        let status = response.status();
        let headers = collect_headers(response.headers());
        let bytes = response.bytes().await?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            headers,
            size_bytes: bytes.len(),
            body: ResponseBody::from_bytes(&bytes),
            duration_ms: elapsed,
        })
    }
}

pub fn build_headers(input: &BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    for (key, value) in input {
        let key = key.trim();
        if key.is_empty() {
            return Err(ContractError::InvalidRequest("Header key is empty".to_string()));
        }

        let header_name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| ContractError::InvalidRequest(format!("Invalid header key `{key}`: {e}")))?;
        let header_value = HeaderValue::from_str(value.trim()).map_err(|e| {
            ContractError::InvalidRequest(format!("Invalid header value for `{key}`: {e}"))
        })?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                value.to_str().unwrap_or("<binary>").to_string(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_headers_accepts_api_key() {
        let mut input = BTreeMap::new();
        input.insert("x-api-key".to_string(), "reqres-free-v1".to_string());
        let headers = build_headers(&input).unwrap();
        assert_eq!(headers.get("x-api-key").unwrap(), "reqres-free-v1");
    }

    #[test]
    fn build_headers_rejects_bad_name() {
        let mut input = BTreeMap::new();
        input.insert("bad header".to_string(), "v".to_string());
        let err = build_headers(&input).unwrap_err();
        assert!(matches!(err, ContractError::InvalidRequest(_)));
    }

    #[test]
    fn build_headers_rejects_empty_name() {
        let mut input = BTreeMap::new();
        input.insert("  ".to_string(), "v".to_string());
        assert!(build_headers(&input).is_err());
    }

    #[tokio::test]
    async fn invalid_url_is_a_request_error() {
        let client = HttpClient::new(None).unwrap();
        let request = RequestInput::new(crate::http::method::HttpMethod::Get, "not a url");
        let err = client.send(&request).await.unwrap_err();
        assert!(matches!(err, ContractError::InvalidRequest(_)));
    }
}
