//! MCP JSON-RPC transport.
//!
//! One probe is one `tools/call` request: a single HTTP POST carrying a
//! JSON-RPC 2.0 envelope with a bearer token, answered (or not) within a
//! bounded timeout. Every failure mode (connect error, non-2xx status,
//! unparseable body) surfaces as a [`TransportError`] that the runner maps
//! to one `Failed` result; nothing here aborts a run.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::util::truncate_with_ellipsis;

/// Default per-call timeout in seconds. Generative models can be slow.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// JSON-RPC method used for every probe.
pub const TOOL_CALL_METHOD: &str = "tools/call";

/// Environment variable holding the bearer token. An empty or missing value
/// still produces a well-formed (if likely unauthorized) request.
pub const AUTH_TOKEN_ENV: &str = "MCP_AUTH_TOKEN";

/// Longest HTTP error body snippet carried inside a [`TransportError`].
const MAX_BODY_SNIPPET: usize = 100;

// ---------------------------------------------------------------------------
// TransportError
// ---------------------------------------------------------------------------

/// A single probe's transport failure. Never fatal to the run.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, DNS, TLS, or timeout failure before a response arrived.
    #[error("request failed: {0}")]
    Network(String),

    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("invalid JSON in response body: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// ToolTransport
// ---------------------------------------------------------------------------

/// The seam between the runner and the wire.
///
/// Production uses [`HttpTransport`]; tests substitute a scripted double so
/// the runner can be exercised without a network.
#[async_trait]
pub trait ToolTransport: Send {
    /// Invoke one tool by name with the given argument object, returning the
    /// decoded top-level JSON-RPC reply.
    async fn invoke(
        &mut self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<Value, TransportError>;
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// reqwest-backed [`ToolTransport`] speaking JSON-RPC 2.0 over HTTP POST.
pub struct HttpTransport {
    /// Fully-formed MCP endpoint URL.
    url: String,
    /// Bearer token sent with every request. May be empty.
    auth_token: String,
    /// Per-call timeout.
    timeout: Duration,
    /// Monotonically increasing request id, starting at 1 for the first call.
    request_id: u64,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth_token: auth_token.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            request_id: 0,
        }
    }

    /// Construct with the bearer token taken from `MCP_AUTH_TOKEN`.
    pub fn from_env(url: impl Into<String>) -> Self {
        let token = std::env::var(AUTH_TOKEN_ENV).unwrap_or_default();
        Self::new(url, token)
    }

    /// Builder: set the per-call timeout in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Build the next JSON-RPC request envelope, advancing the id counter.
    fn envelope(&mut self, name: &str, arguments: &Map<String, Value>) -> Value {
        self.request_id += 1;
        json!({
            "jsonrpc": "2.0",
            "id": self.request_id,
            "method": TOOL_CALL_METHOD,
            "params": {
                "name": name,
                "arguments": arguments,
            },
        })
    }
}

#[async_trait]
impl ToolTransport for HttpTransport {
    async fn invoke(
        &mut self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<Value, TransportError> {
        let payload = self.envelope(name, arguments);
        log::debug!(
            "POST {} tool='{}' request_id={}",
            self.url,
            name,
            self.request_id
        );

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let resp = client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.auth_token))
            .json(&payload)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: truncate_with_ellipsis(&body, MAX_BODY_SNIPPET),
            });
        }

        resp.json::<Value>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_envelope_shape() {
        let mut transport = HttpTransport::new("https://worker.example/mcp", "tok");
        let envelope = transport.envelope(
            "@cf/meta/llama-3.1-8b-instruct",
            &args(json!({"prompt": "2+2?"})),
        );

        assert_eq!(envelope["jsonrpc"], "2.0");
        assert_eq!(envelope["id"], 1);
        assert_eq!(envelope["method"], TOOL_CALL_METHOD);
        assert_eq!(envelope["params"]["name"], "@cf/meta/llama-3.1-8b-instruct");
        assert_eq!(envelope["params"]["arguments"]["prompt"], "2+2?");
    }

    #[test]
    fn test_request_ids_increase_monotonically() {
        let mut transport = HttpTransport::new("https://worker.example/mcp", "");
        let empty = Map::new();
        for expected in 1u64..=5 {
            let envelope = transport.envelope("@cf/microsoft/phi-2", &empty);
            assert_eq!(envelope["id"], expected);
        }
    }

    #[test]
    fn test_error_display_is_bounded_for_status() {
        let err = TransportError::Status {
            status: 503,
            body: truncate_with_ellipsis(&"x".repeat(500), 100),
        };
        let text = err.to_string();
        assert!(text.starts_with("HTTP 503:"));
        assert!(text.len() < 130);
    }

    #[test]
    fn test_empty_token_is_allowed() {
        let transport = HttpTransport::new("https://worker.example/mcp", "");
        assert_eq!(transport.auth_token, "");
        assert_eq!(transport.url(), "https://worker.example/mcp");
    }
}
