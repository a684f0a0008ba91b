//! Side effects performed after classification.
//!
//! The host environment supplies the notification and navigation surfaces.
//! `Effects::apply` is the only place that touches them, so every rejected
//! outcome triggers exactly one user-visible or session-mutating effect.

use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::outcome::Outcome;
use crate::session::SessionStore;

/// Transient user-facing message surface (toast).
pub trait Notifier: Send + Sync {
    fn show_toast(&self, text: &str);
}

/// Page navigation surface.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str);
}

/// Notifier for hosts without a UI: messages go to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show_toast(&self, text: &str) {
        tracing::info!(target: "mall::ui", text, "toast");
    }
}

/// Navigator for hosts without a UI: navigation goes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate_to(&self, path: &str) {
        tracing::info!(target: "mall::ui", path, "navigate");
    }
}

#[derive(Clone)]
pub struct Effects {
    session: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
    network_error_message: String,
    fallback_error_message: String,
}

impl Effects {
    pub fn new(
        config: &PipelineConfig,
        session: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            session,
            notifier,
            navigator,
            login_path: config.login_path.clone(),
            network_error_message: config.network_error_message.clone(),
            fallback_error_message: config.fallback_error_message.clone(),
        }
    }

    pub fn apply(&self, outcome: &Outcome) {
        match outcome {
            Outcome::Success(_) => {}
            Outcome::AuthExpired(_) => {
                self.session.clear();
                self.navigator.navigate_to(&self.login_path);
            }
            Outcome::ServerError { message, .. } => self.notifier.show_toast(message),
            Outcome::TransportError(_) => self.notifier.show_toast(&self.network_error_message),
        }
    }

    /// Effect for a 2xx response whose body could not be decoded.
    pub fn apply_undecodable(&self) {
        self.notifier.show_toast(&self.fallback_error_message);
    }
}

impl std::fmt::Debug for Effects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effects")
            .field("login_path", &self.login_path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::error::TransportError;
    use crate::http::HttpResponse;
    use crate::session::{MemberStore, Profile};

    /// Records every toast and navigation for assertions.
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub toasts: Mutex<Vec<String>>,
        pub navigations: Mutex<Vec<String>>,
    }

    impl Notifier for Recorder {
        fn show_toast(&self, text: &str) {
            self.toasts.lock().push(text.to_string());
        }
    }

    impl Navigator for Recorder {
        fn navigate_to(&self, path: &str) {
            self.navigations.lock().push(path.to_string());
        }
    }

    fn setup() -> (Effects, Arc<MemberStore>, Arc<Recorder>) {
        let store = Arc::new(MemberStore::with_profile(Profile::with_token("tok")));
        let recorder = Arc::new(Recorder::default());
        let effects = Effects::new(
            &PipelineConfig::default(),
            store.clone(),
            recorder.clone(),
            recorder.clone(),
        );
        (effects, store, recorder)
    }

    #[test]
    fn success_touches_nothing() {
        let (effects, store, recorder) = setup();
        effects.apply(&Outcome::Success(HttpResponse::new(200, "{}")));
        assert!(store.token().is_some());
        assert!(recorder.toasts.lock().is_empty());
        assert!(recorder.navigations.lock().is_empty());
    }

    #[test]
    fn auth_expired_clears_session_and_navigates_once() {
        let (effects, store, recorder) = setup();
        effects.apply(&Outcome::AuthExpired(HttpResponse::new(401, "")));
        assert!(store.profile().is_none());
        assert_eq!(*recorder.navigations.lock(), vec!["/pages/login/login".to_string()]);
        assert!(recorder.toasts.lock().is_empty());
    }

    #[test]
    fn server_error_shows_message() {
        let (effects, store, recorder) = setup();
        effects.apply(&Outcome::ServerError {
            message: "server down".to_string(),
            response: HttpResponse::new(500, ""),
        });
        assert_eq!(*recorder.toasts.lock(), vec!["server down".to_string()]);
        assert!(recorder.navigations.lock().is_empty());
        assert!(store.token().is_some());
    }

    #[test]
    fn undecodable_body_shows_fallback_message() {
        let (effects, store, recorder) = setup();
        effects.apply_undecodable();
        assert_eq!(*recorder.toasts.lock(), vec!["请求错误".to_string()]);
        assert!(recorder.navigations.lock().is_empty());
        assert!(store.token().is_some());
    }

    #[test]
    fn transport_error_shows_network_message() {
        let (effects, _store, recorder) = setup();
        effects.apply(&Outcome::TransportError(TransportError::Connect("refused".into())));
        assert_eq!(*recorder.toasts.lock(), vec!["网络错误，换个网络试试吧".to_string()]);
    }
}
