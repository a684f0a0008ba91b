//! Error types for the request pipeline.
//!
//! # Design
//! `TransportError` covers failures before any response arrives.
//! `RequestError` is what `Pipeline::request` rejects with: one variant per
//! classification path, each carrying the raw response so callers can layer
//! their own handling. Every variant except `Serialize` has already
//! triggered its user-visible effect by the time the caller sees it.

use thiserror::Error;

use crate::http::HttpResponse;

/// Network-level failure: no server response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("host lookup failed: {0}")]
    Dns(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("i/o error: {0}")]
    Io(String),

    #[error("transport error: {0}")]
    Other(String),
}

/// Rejection value of `Pipeline::request`.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server returned 401; the session has been cleared.
    #[error("authorization expired")]
    AuthExpired { response: HttpResponse },

    /// The server returned a non-2xx status other than 401.
    #[error("HTTP {status}: {message}")]
    Server {
        status: u16,
        message: String,
        response: HttpResponse,
    },

    /// A 2xx body did not decode into the expected envelope. The fallback
    /// toast has been shown.
    #[error("failed to decode response body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        response: HttpResponse,
    },

    /// The request payload could not be encoded as JSON.
    #[error("failed to encode request payload: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl RequestError {
    /// Transport status of the response behind this error, if one arrived.
    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            RequestError::AuthExpired { response }
            | RequestError::Server { response, .. }
            | RequestError::Decode { response, .. } => Some(response),
            RequestError::Transport(_) | RequestError::Serialize(_) => None,
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, RequestError::AuthExpired { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_display_includes_status_and_message() {
        let err = RequestError::Server {
            status: 500,
            message: "server down".to_string(),
            response: HttpResponse::new(500, "{}"),
        };
        assert_eq!(err.to_string(), "HTTP 500: server down");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn transport_error_has_no_response() {
        let err = RequestError::from(TransportError::Timeout { timeout_ms: 10_000 });
        assert_eq!(err.to_string(), "request timed out after 10000ms");
        assert!(err.response().is_none());
        assert!(!err.is_auth_expired());
    }

    #[test]
    fn auth_expired_exposes_response() {
        let err = RequestError::AuthExpired {
            response: HttpResponse::new(401, ""),
        };
        assert!(err.is_auth_expired());
        assert_eq!(err.status(), Some(401));
    }
}
