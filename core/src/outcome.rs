//! Response classification.
//!
//! `classify` reduces a transport result to exactly one `Outcome` using the
//! transport status alone. It has no side effects; `Effects::apply` acts on
//! the tag afterwards.

use serde::Deserialize;

use crate::error::{RequestError, TransportError};
use crate::http::HttpResponse;

pub const UNAUTHORIZED: u16 = 401;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(HttpResponse),
    AuthExpired(HttpResponse),
    ServerError { message: String, response: HttpResponse },
    TransportError(TransportError),
}

/// Only `msg` is read from an error body; everything else is ignored.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: Option<String>,
}

/// Server-provided message of an error body, if non-empty.
pub fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.msg)
        .filter(|m| !m.is_empty())
}

/// Classify a completed transport call.
///
/// `fallback_message` is used for error statuses whose body has no `msg`.
pub fn classify(result: Result<HttpResponse, TransportError>, fallback_message: &str) -> Outcome {
    let response = match result {
        Ok(response) => response,
        Err(err) => return Outcome::TransportError(err),
    };
    if response.is_success() {
        return Outcome::Success(response);
    }
    if response.status == UNAUTHORIZED {
        return Outcome::AuthExpired(response);
    }
    let message = server_message(&response.body).unwrap_or_else(|| fallback_message.to_string());
    Outcome::ServerError { message, response }
}

impl Outcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::AuthExpired(_) => "auth_expired",
            Outcome::ServerError { .. } => "server_error",
            Outcome::TransportError(_) => "transport_error",
        }
    }

    /// Split into the successful response or the matching rejection.
    pub fn into_result(self) -> Result<HttpResponse, RequestError> {
        match self {
            Outcome::Success(response) => Ok(response),
            Outcome::AuthExpired(response) => Err(RequestError::AuthExpired { response }),
            Outcome::ServerError { message, response } => Err(RequestError::Server {
                status: response.status,
                message,
                response,
            }),
            Outcome::TransportError(err) => Err(RequestError::Transport(err)),
        }
    }
}
