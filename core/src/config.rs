//! Client configuration.

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable consulted by [`BackendConfig::from_env`].
pub const BASE_URL_ENV: &str = "SNC_BACKEND_URL";

/// Where the backend lives. No validation is applied beyond stripping a
/// trailing `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    base_url: String,
}

impl BackendConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Read `SNC_BACKEND_URL`, falling back to the default base URL.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Size of the worker pool behind `Dispatcher`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub workers: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self { workers: 4 }
    }
}
