//! Request/response exchange with the collector.

mod http;

pub use http::HttpTransport;
use serde::Serialize;
use serde_json::Value;
use std::{
    future::Future,
    pin::Pin,
};
use url::Url;

const API_SEGMENT: &str = "api";

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("request to the collector failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("collector responded with status {0}")]
    Status(u16),
    #[error("collector response could not be understood: {0}")]
    MalformedBody(String),
    #[error("collector reported an error: {0}")]
    Server(String),
}

pub type TransportResult<T> = Result<T, TransportError>;

pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = TransportResult<Value>> + Send + 'a>>;

/// Sends one request to the collector and yields the `data` of its response.
///
/// Implementations make a single attempt. Non-success statuses, unparseable bodies and responses carrying an
/// `errors` list are all reported as errors, and credentials must be attached to every request.
pub trait Transport: Send + Sync {
    fn send<'a>(&'a self, endpoint: &'a Url, request: &'a GraphQlRequest) -> TransportFuture<'a>;
}

/// A query document with its variables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest {
    pub query: &'static str,
    pub variables: Value,
}

impl GraphQlRequest {
    pub fn new(query: &'static str, variables: Value) -> Self {
        Self { query, variables }
    }
}

/// API endpoint for a collector base URL: the base without one trailing slash, followed by `/api`.
pub fn endpoint(server: &str) -> Result<Url, url::ParseError> {
    let base = server.strip_suffix('/').unwrap_or(server);
    Url::parse(&format!("{base}/{API_SEGMENT}"))
}

/// Turn a raw collector response into its `data` object.
pub fn parse_response(status: u16, body: &[u8]) -> TransportResult<Value> {
    if !(200..300).contains(&status) {
        return Err(TransportError::Status(status));
    }

    let mut response: Value =
        serde_json::from_slice(body).map_err(|err| TransportError::MalformedBody(err.to_string()))?;

    if let Some(errors) = response.get("errors").and_then(Value::as_array) {
        if let Some(first) = errors.first() {
            let message = first
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(TransportError::Server(message));
        }
    }

    match response.get_mut("data").map(Value::take) {
        Some(data @ Value::Object(_)) => Ok(data),
        _ => Err(TransportError::MalformedBody("response has no data object".to_string())),
    }
}
