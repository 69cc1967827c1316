//! # Core Configuration Module
//!
//! Provides configuration management for the mini-app core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct an `AppConfig`
//! instance that holds all dependencies and settings the core needs. It
//! enforces fail-fast validation so that a bad base URL or a missing bridge is
//! reported at startup rather than on the first request.
//!
//! ## Dependencies (with platform defaults)
//!
//! - `HttpClient` - HTTP transport (desktop default: reqwest)
//! - `HostBridge` - Chat platform SDK (desktop default: headless host)
//! - `Clock` - Time source (default: system clock)
//!
//! When the `desktop-shims` feature is enabled, the desktop defaults are
//! injected automatically if not provided. Without it, a missing bridge fails
//! with [`Error::CapabilityMissing`].
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::AppConfig;
//!
//! let config = AppConfig::builder()
//!     .api_base_url("https://api.example.org/api/v1")
//!     .build()?;
//! ```
//!
//! ### From the environment
//!
//! ```ignore
//! // MINIAPP_API_URL=https://staging.example.org/api/v1
//! // MINIAPP_REQUEST_TIMEOUT_SECS=10
//! let config = AppConfig::from_env()?.build()?;
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{Clock, HostBridge, HttpClient, SystemClock};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Backend used when no base URL is configured.
pub const DEFAULT_API_BASE_URL: &str = "https://likud-rus-camelot770.amvera.io/api/v1";

/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "MINIAPP_API_URL";

/// Environment variable overriding the request timeout, in whole seconds.
pub const REQUEST_TIMEOUT_ENV: &str = "MINIAPP_REQUEST_TIMEOUT_SECS";

/// Transport timeout applied when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
const MAX_EVENT_BUFFER_SIZE: usize = 10_000;

/// Core configuration for the mini-app.
///
/// Use [`AppConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct AppConfig {
    /// Backend base URL without a trailing slash
    pub api_base_url: String,

    /// HTTP transport for API requests
    pub http_client: Arc<dyn HttpClient>,

    /// Chat platform SDK bridge
    pub host_bridge: Arc<dyn HostBridge>,

    /// Time source for synthesized profiles and seed content
    pub clock: Arc<dyn Clock>,

    /// Per-request transport timeout
    pub request_timeout: Duration,

    /// Event bus channel capacity
    pub event_buffer_size: usize,
}

impl AppConfig {
    /// Creates a new builder for constructing an `AppConfig`.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Creates a builder pre-populated from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when [`REQUEST_TIMEOUT_ENV`] is set but is
    /// not a whole number of seconds.
    pub fn from_env() -> Result<AppConfigBuilder> {
        AppConfigBuilder::from_env()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - The base URL is an absolute http(s) URL
    /// - The request timeout is within (0, 300s]
    /// - The event buffer size is within (0, 10000]
    pub fn validate(&self) -> Result<()> {
        normalize_base_url(&self.api_base_url)?;

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        if self.request_timeout > MAX_REQUEST_TIMEOUT {
            return Err(Error::Config(
                "Request timeout exceeds maximum of 300 seconds".to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(
                "Event buffer size exceeds maximum of 10,000".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish_non_exhaustive()
    }
}

/// Parses and normalizes a base URL: absolute, http(s), no trailing slash.
fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::Config("API base URL cannot be empty".to_string()));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| Error::Config(format!("Invalid API base URL '{}': {}", trimmed, e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(Error::Config(format!(
                "API base URL must use http or https, got '{}'",
                other
            )))
        }
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(Error::Config(
            "API base URL must not carry a query string or fragment".to_string(),
        ));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required for API requests. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default ReqwestHttpClient. \
                 In-app browser: inject a fetch-based client."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn host_bridge_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HostBridge".to_string(),
        message: "HostBridge implementation is required for identity and host feedback. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default HeadlessHostBridge. \
                 In-app browser: inject the platform web-app SDK bridge."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(timeout).map_err(|e| {
        Error::Internal(format!("Failed to initialize default HttpClient: {}", e))
    })?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_host_bridge() -> Result<Arc<dyn HostBridge>> {
    use bridge_desktop::HeadlessHostBridge;

    let host: Arc<dyn HostBridge> = Arc::new(HeadlessHostBridge::from_env());
    Ok(host)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_host_bridge() -> Result<Arc<dyn HostBridge>> {
    Err(host_bridge_missing_error())
}

/// Builder for constructing [`AppConfig`] instances.
#[derive(Default)]
pub struct AppConfigBuilder {
    api_base_url: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    host_bridge: Option<Arc<dyn HostBridge>>,
    clock: Option<Arc<dyn Clock>>,
    request_timeout: Option<Duration>,
    event_buffer_size: Option<usize>,
}

impl AppConfigBuilder {
    /// Reads [`API_URL_ENV`] and [`REQUEST_TIMEOUT_ENV`]; unset or blank
    /// variables leave the defaults in place.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::default();

        if let Some(url) = read_env(API_URL_ENV) {
            builder = builder.api_base_url(url);
        }

        if let Some(raw) = read_env(REQUEST_TIMEOUT_ENV) {
            let secs: u64 = raw.parse().map_err(|_| {
                Error::Config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    REQUEST_TIMEOUT_ENV, raw
                ))
            })?;
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        Ok(builder)
    }

    /// Sets the backend base URL.
    ///
    /// Default: [`DEFAULT_API_BASE_URL`]
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) is used when the
    /// `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the host bridge implementation.
    ///
    /// If not provided, the headless desktop host is used when the
    /// `desktop-shims` feature is enabled.
    pub fn host_bridge(mut self, host: Arc<dyn HostBridge>) -> Self {
        self.host_bridge = Some(host);
        self
    }

    /// Sets the time source. Default: [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the per-request transport timeout.
    ///
    /// Default: 30 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the event bus capacity.
    ///
    /// Default: [`DEFAULT_EVENT_BUFFER_SIZE`]
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds the final `AppConfig` instance.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required bridge is missing and no desktop default is available
    /// - The base URL, timeout or buffer size is invalid
    pub fn build(self) -> Result<AppConfig> {
        let api_base_url = normalize_base_url(
            self.api_base_url
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE_URL),
        )?;
        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(request_timeout)?,
        };

        let host_bridge = match self.host_bridge {
            Some(host) => host,
            None => provide_default_host_bridge()?,
        };

        let config = AppConfig {
            api_base_url,
            http_client,
            host_bridge,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            request_timeout,
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::{
        BridgeError, HapticIntensity, HttpRequest, HttpResponse, UserHint,
    };

    struct NoopHttpClient;

    #[async_trait]
    impl HttpClient for NoopHttpClient {
        async fn execute(
            &self,
            _request: HttpRequest,
        ) -> std::result::Result<HttpResponse, BridgeError> {
            Err(BridgeError::ConnectionFailed("offline".to_string()))
        }
    }

    struct NoopHost;

    impl HostBridge for NoopHost {
        fn ready(&self) {}
        fn expand(&self) {}
        fn identity_payload(&self) -> Option<String> {
            None
        }
        fn user_hint(&self) -> Option<UserHint> {
            None
        }
        fn haptic(&self, _intensity: HapticIntensity) {}
        fn alert(&self, _message: &str) {}
        fn share_inline(&self, _text: &str) -> std::result::Result<(), BridgeError> {
            Ok(())
        }
    }

    fn builder_with_bridges() -> AppConfigBuilder {
        AppConfig::builder()
            .http_client(Arc::new(NoopHttpClient))
            .host_bridge(Arc::new(NoopHost))
    }

    #[test]
    fn test_build_with_defaults() {
        let config = builder_with_bridges().build().unwrap();

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.event_buffer_size, DEFAULT_EVENT_BUFFER_SIZE);
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = builder_with_bridges()
            .api_base_url("http://localhost:8080/api/v1/")
            .build()
            .unwrap();

        assert_eq!(config.api_base_url, "http://localhost:8080/api/v1");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        for bad in ["", "not a url", "ftp://example.org/api", "https://x.org/api?v=1"] {
            let result = builder_with_bridges().api_base_url(bad).build();
            assert!(
                matches!(result, Err(Error::Config(_))),
                "expected config error for {bad:?}"
            );
        }
    }

    #[test]
    fn test_timeout_bounds() {
        let zero = builder_with_bridges()
            .request_timeout(Duration::ZERO)
            .build();
        assert!(matches!(zero, Err(Error::Config(_))));

        let huge = builder_with_bridges()
            .request_timeout(Duration::from_secs(301))
            .build();
        assert!(matches!(huge, Err(Error::Config(_))));
    }

    #[test]
    fn test_event_buffer_bounds() {
        let result = builder_with_bridges().event_buffer_size(0).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_debug_does_not_require_bridge_debug() {
        let config = builder_with_bridges().build().unwrap();
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("api_base_url"));
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_missing_http_client_reports_capability() {
        let result = AppConfig::builder()
            .host_bridge(Arc::new(NoopHost))
            .build();

        match result {
            Err(Error::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "HttpClient")
            }
            other => panic!("expected capability error, got {:?}", other.map(|_| ())),
        }
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_missing_host_reports_capability() {
        let result = AppConfig::builder()
            .http_client(Arc::new(NoopHttpClient))
            .build();

        assert!(matches!(
            result,
            Err(Error::CapabilityMissing { ref capability, .. }) if capability == "HostBridge"
        ));
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_build_with_desktop_defaults() {
        let config = AppConfig::builder()
            .build()
            .expect("desktop defaults should succeed");

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }
}
