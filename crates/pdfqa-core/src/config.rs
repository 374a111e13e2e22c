use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backend address used when nothing else is configured (uvicorn's default port).
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Environment variable overriding the configured backend URL.
pub const BACKEND_URL_ENV: &str = "PDFQA_BACKEND_URL";

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Per-request timeout. Unset means requests wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Applies overrides in priority order: flag, then environment.
    pub fn with_overrides(mut self, flag: Option<String>, env: Option<String>) -> Self {
        if let Some(url) = flag.or(env).filter(|u| !u.trim().is_empty()) {
            self.backend_url = url;
        }
        self
    }
}
