//! Dispatch seam: the "perform HTTP request" primitive.
//!
//! # Design
//! The pipeline only needs one operation from its host: execute a fully
//! prepared `HttpRequest` and hand back the raw response, or the reason none
//! arrived. Error statuses are data, never `Err`.
//!
//! `UreqTransport` is the bundled implementation. `ureq` is blocking, so each
//! call runs on tokio's blocking pool. One agent is shared by all calls so
//! connections are pooled; the timeout is set per request. Redirects are not
//! followed: a 3xx reaches the classifier like any other non-2xx status.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn perform(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute(&agent, req))
            .await
            .map_err(|e| TransportError::Other(e.to_string()))?
    }
}

/// Render a JSON value as a query parameter value.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Flatten `data` into query pairs. Arrays repeat the key; nulls are skipped.
pub fn query_pairs(data: Option<&Value>) -> Vec<(String, String)> {
    let Some(Value::Object(map)) = data else {
        return Vec::new();
    };
    let mut pairs = Vec::new();
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                pairs.extend(items.iter().map(|v| (key.clone(), query_value(v))));
            }
            other => pairs.push((key.clone(), query_value(other))),
        }
    }
    pairs
}

fn map_ureq_error(err: ureq::Error, timeout_ms: u64) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout { timeout_ms },
        ureq::Error::HostNotFound => TransportError::Dns(err.to_string()),
        ureq::Error::ConnectionFailed => TransportError::Connect(err.to_string()),
        ureq::Error::Io(e) => TransportError::Io(e.to_string()),
        other => TransportError::Other(other.to_string()),
    }
}

/// Execute `req` on `agent`, which must not treat status codes as errors.
fn execute(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, TransportError> {
    let timeout_ms = req.timeout_ms.unwrap_or(crate::config::DEFAULT_TIMEOUT_MS);
    let timeout = Some(Duration::from_millis(timeout_ms));

    let body = if req.method.sends_data_as_query() {
        None
    } else {
        req.data
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| TransportError::Other(e.to_string()))?
    };
    let query = if req.method.sends_data_as_query() {
        query_pairs(req.data.as_ref())
    } else {
        Vec::new()
    };

    tracing::trace!(target: "mall::http", method = %req.method, url = %req.url, "dispatching");

    macro_rules! prepare {
        ($builder:expr) => {{
            let mut builder = $builder;
            for (k, v) in &req.headers {
                builder = builder.header(k.as_str(), v.as_str());
            }
            for (k, v) in &query {
                builder = builder.query(k, v);
            }
            builder.config().timeout_global(timeout).build()
        }};
    }

    let result = match (req.method, body) {
        (HttpMethod::Get, _) => prepare!(agent.get(&req.url)).call(),
        (HttpMethod::Head, _) => prepare!(agent.head(&req.url)).call(),
        (HttpMethod::Options, _) => prepare!(agent.options(&req.url)).call(),
        (HttpMethod::Delete, None) => prepare!(agent.delete(&req.url)).call(),
        (HttpMethod::Delete, Some(body)) => prepare!(agent.delete(&req.url))
            .force_send_body()
            .content_type("application/json")
            .send(&body[..]),
        (HttpMethod::Post, Some(body)) => prepare!(agent.post(&req.url))
            .content_type("application/json")
            .send(&body[..]),
        (HttpMethod::Post, None) => prepare!(agent.post(&req.url)).send_empty(),
        (HttpMethod::Put, Some(body)) => prepare!(agent.put(&req.url))
            .content_type("application/json")
            .send(&body[..]),
        (HttpMethod::Put, None) => prepare!(agent.put(&req.url)).send_empty(),
        (HttpMethod::Patch, Some(body)) => prepare!(agent.patch(&req.url))
            .content_type("application/json")
            .send(&body[..]),
        (HttpMethod::Patch, None) => prepare!(agent.patch(&req.url)).send_empty(),
    };
    let mut response = result.map_err(|e| map_ureq_error(e, timeout_ms))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| map_ureq_error(e, timeout_ms))?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
