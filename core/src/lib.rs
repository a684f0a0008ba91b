//! Client-side HTTP access layer for the mall mini-program backend.
//!
//! # Overview
//! Every API call goes through one `Pipeline`: the interception stage
//! resolves the URL against the base address, fills in the timeout, adds the
//! client header and the member's token; a `Transport` performs the call; the
//! result is classified by transport status and the matching side effect
//! (toast, or session clear plus login redirect) is applied before the
//! caller gets its `Envelope<T>` or `RequestError`.
//!
//! # Design
//! - Session, notification, navigation and transport are injected trait
//!   objects, so the pipeline holds no globals and is testable in isolation.
//! - `classify` is pure; `Effects::apply` owns every side effect.
//! - Endpoint functions in `services` only describe method, path and payload.
//! - Types use owned `String` / `Vec` fields so they map onto the C ABI in
//!   `mall-ffi`.

pub mod config;
pub mod effects;
pub mod error;
pub mod http;
pub mod interceptor;
pub mod outcome;
pub mod pipeline;
pub mod services;
pub mod session;
pub mod transport;
pub mod types;

pub use config::{PipelineConfig, TimeoutPolicy};
pub use effects::{Effects, LogNavigator, LogNotifier, Navigator, Notifier};
pub use error::{RequestError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, UploadRequest};
pub use interceptor::Interceptor;
pub use outcome::{classify, Outcome};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use session::{MemberStore, Profile, SessionStore};
pub use transport::{Transport, UreqTransport};
pub use types::Envelope;
