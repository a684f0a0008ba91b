//! Pipeline configuration.
//!
//! `PipelineConfig::default()` matches the production mall backend. Hosts can
//! deserialize the struct from their own config file, or layer environment
//! overrides on top with `from_env`.

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://pcapi-xiaotuxian-front-devtest.itheima.net";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_LOGIN_PATH: &str = "/pages/login/login";
pub const DEFAULT_NETWORK_ERROR_MESSAGE: &str = "网络错误，换个网络试试吧";
pub const DEFAULT_FALLBACK_ERROR_MESSAGE: &str = "请求错误";

/// How the interception stage treats a caller-supplied timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicy {
    /// Keep the caller's timeout; fill in the default only when absent.
    #[default]
    FillMissing,
    /// Always replace the timeout with the default.
    Override,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Prefix for relative request URLs. Stored without a trailing `/`.
    pub base_url: String,
    pub timeout_ms: u64,
    pub timeout_policy: TimeoutPolicy,
    /// Client identification header name and value.
    pub client_header: (String, String),
    /// Navigation target after an unauthorized response.
    pub login_path: String,
    /// Toast shown when the transport fails before a response arrives.
    pub network_error_message: String,
    /// Toast shown for an error status whose body carries no `msg`.
    pub fallback_error_message: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            timeout_policy: TimeoutPolicy::default(),
            client_header: ("source-client".to_string(), "miniapp".to_string()),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            network_error_message: DEFAULT_NETWORK_ERROR_MESSAGE.to_string(),
            fallback_error_message: DEFAULT_FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn new(base_url: &str) -> Self {
        Self::default().with_base_url(base_url)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.timeout_policy = policy;
        self
    }

    pub fn with_login_path(mut self, login_path: &str) -> Self {
        self.login_path = login_path.to_string();
        self
    }

    /// Defaults overridden by `MALL_BASE_URL`, `MALL_TIMEOUT_MS` and
    /// `MALL_LOGIN_PATH`. Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::default().merge_env(|key| std::env::var(key).ok())
    }

    fn merge_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = lookup("MALL_BASE_URL") {
            self = self.with_base_url(&base_url);
        }
        if let Some(raw) = lookup("MALL_TIMEOUT_MS") {
            match raw.parse() {
                Ok(ms) => self.timeout_ms = ms,
                Err(_) => tracing::warn!(target: "mall::config", value = %raw, "ignoring invalid MALL_TIMEOUT_MS"),
            }
        }
        if let Some(login_path) = lookup("MALL_LOGIN_PATH") {
            self.login_path = login_path;
        }
        self
    }
}
