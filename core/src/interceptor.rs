//! Interception stage applied to every outgoing request and upload.
//!
//! # Design
//! `Interceptor` owns the process-wide defaults (base URL, timeout, client
//! header) plus a handle to the session store. `intercept` mutates the
//! descriptor in place and performs no I/O. Requests and uploads share one
//! code path through the `Intercept` trait.

use std::sync::Arc;

use crate::config::{PipelineConfig, TimeoutPolicy};
use crate::http::{set_header, Headers, HttpRequest, UploadRequest};
use crate::session::SessionStore;

pub const AUTHORIZATION: &str = "Authorization";

/// Access to the fields the interception stage normalizes.
pub trait Intercept {
    fn url_mut(&mut self) -> &mut String;
    fn headers_mut(&mut self) -> &mut Headers;
    fn timeout_mut(&mut self) -> &mut Option<u64>;
}

impl Intercept for HttpRequest {
    fn url_mut(&mut self) -> &mut String {
        &mut self.url
    }

    fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    fn timeout_mut(&mut self) -> &mut Option<u64> {
        &mut self.timeout_ms
    }
}

impl Intercept for UploadRequest {
    fn url_mut(&mut self) -> &mut String {
        &mut self.url
    }

    fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    fn timeout_mut(&mut self) -> &mut Option<u64> {
        &mut self.timeout_ms
    }
}

/// Whether `url` already carries an `http://` or `https://` scheme.
pub fn is_absolute(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[derive(Clone)]
pub struct Interceptor {
    base_url: String,
    timeout_ms: u64,
    timeout_policy: TimeoutPolicy,
    client_header: (String, String),
    session: Arc<dyn SessionStore>,
}

impl Interceptor {
    pub fn new(config: &PipelineConfig, session: Arc<dyn SessionStore>) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_ms: config.timeout_ms,
            timeout_policy: config.timeout_policy,
            client_header: config.client_header.clone(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn intercept<R: Intercept + ?Sized>(&self, req: &mut R) {
        let url = req.url_mut();
        if !is_absolute(url) {
            url.insert_str(0, &self.base_url);
        }

        let timeout = req.timeout_mut();
        match self.timeout_policy {
            TimeoutPolicy::FillMissing => {
                timeout.get_or_insert(self.timeout_ms);
            }
            TimeoutPolicy::Override => *timeout = Some(self.timeout_ms),
        }

        let headers = req.headers_mut();
        let (name, value) = &self.client_header;
        set_header(headers, name, value);

        // Never send an empty Authorization header.
        if let Some(token) = self.session.token().filter(|t| !t.is_empty()) {
            set_header(headers, AUTHORIZATION, &token);
        }
    }
}

impl std::fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("timeout_policy", &self.timeout_policy)
            .finish_non_exhaustive()
    }
}
