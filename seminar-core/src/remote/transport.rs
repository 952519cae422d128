//! HTTP transport to the seminar backend.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;

use crate::error::{DeskError, DeskResult};
use crate::remote::RemoteFailure;
use crate::remote::protocol::{ApiRequest, Method};

/// Sends a request and yields the JSON body of a 2xx response.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Base URL, used in failure messages.
    fn base_url(&self) -> &str;

    async fn send(&self, request: &ApiRequest) -> Result<Value, RemoteFailure>;
}

pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> DeskResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeskError::Config(format!("Could not build HTTP client: {e}")))?;

        Ok(HttpTransport {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Transport for HttpTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: &ApiRequest) -> Result<Value, RemoteFailure> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = request.method.as_str(), %url, "Sending request");

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .http
            .request(method, &url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| RemoteFailure::Network(e.to_string()))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| RemoteFailure::Network(e.to_string()))?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            return Err(RemoteFailure::Status {
                status: status.as_u16(),
                body: (!body.is_empty()).then_some(body),
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| RemoteFailure::Malformed(e.to_string()))
    }
}
