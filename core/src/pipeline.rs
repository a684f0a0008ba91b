//! The request pipeline every endpoint call goes through.
//!
//! # Design
//! `request` runs four steps, each owned by its own module:
//! intercept (`Interceptor`), perform (`Transport`), classify (`classify`),
//! then apply effects (`Effects`). The pipeline keeps no per-request state,
//! so one instance can serve any number of concurrent calls.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::PipelineConfig;
use crate::effects::{Effects, LogNavigator, LogNotifier, Navigator, Notifier};
use crate::error::RequestError;
use crate::http::{HttpRequest, UploadRequest};
use crate::interceptor::Interceptor;
use crate::outcome::{classify, Outcome};
use crate::session::{MemberStore, SessionStore};
use crate::transport::{Transport, UreqTransport};
use crate::types::Envelope;

#[derive(Clone)]
pub struct Pipeline {
    interceptor: Interceptor,
    transport: Arc<dyn Transport>,
    effects: Effects,
    fallback_error_message: String,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }

    /// Run the interception stage on an upload without dispatching it.
    pub fn prepare_upload(&self, mut upload: UploadRequest) -> UploadRequest {
        self.interceptor.intercept(&mut upload);
        upload
    }

    /// Send `req` and decode a successful body as `Envelope<T>`.
    ///
    /// Rejections have already shown their toast, or cleared the session and
    /// redirected to login, before this returns.
    pub async fn request<T: DeserializeOwned>(&self, mut req: HttpRequest) -> Result<Envelope<T>, RequestError> {
        self.interceptor.intercept(&mut req);
        let method = req.method;
        let url = req.url.clone();
        tracing::debug!(target: "mall::http", %method, %url, timeout_ms = ?req.timeout_ms, "sending request");

        let outcome = classify(self.transport.perform(req).await, &self.fallback_error_message);
        match &outcome {
            Outcome::Success(r) => {
                tracing::debug!(target: "mall::http", %method, %url, status = r.status, "response received")
            }
            Outcome::AuthExpired(_) => {
                tracing::warn!(target: "mall::http", %method, %url, "unauthorized, clearing session")
            }
            Outcome::ServerError { message, response } => {
                tracing::warn!(target: "mall::http", %method, %url, status = response.status, message = %message, "server error")
            }
            Outcome::TransportError(err) => {
                tracing::warn!(target: "mall::http", %method, %url, err = %err, "transport error")
            }
        }
        self.effects.apply(&outcome);

        let response = outcome.into_result()?;
        Envelope::from_body(&response.body).map_err(|source| {
            tracing::warn!(target: "mall::http", %method, %url, err = %source, "undecodable response body");
            self.effects.apply_undecodable();
            RequestError::Decode { source, response }
        })
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("interceptor", &self.interceptor)
            .field("effects", &self.effects)
            .finish_non_exhaustive()
    }
}

/// Wires collaborators into a `Pipeline`. Anything not set falls back to an
/// empty `MemberStore`, `UreqTransport`, and log-only UI surfaces.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    session: Option<Arc<dyn SessionStore>>,
    transport: Option<Arc<dyn Transport>>,
    notifier: Option<Arc<dyn Notifier>>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl PipelineBuilder {
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn build(self) -> Pipeline {
        let config = self.config.unwrap_or_default();
        let session = self.session.unwrap_or_else(|| Arc::new(MemberStore::new()));
        let notifier = self.notifier.unwrap_or_else(|| Arc::new(LogNotifier));
        let navigator = self.navigator.unwrap_or_else(|| Arc::new(LogNavigator));
        Pipeline {
            interceptor: Interceptor::new(&config, session.clone()),
            transport: self.transport.unwrap_or_else(|| Arc::new(UreqTransport::new())),
            effects: Effects::new(&config, session, notifier, navigator),
            fallback_error_message: config.fallback_error_message,
        }
    }
}
