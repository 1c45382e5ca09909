//! Configuration for the MCule API client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{ApiError, ApiResult};
use crate::routes::{resolve_base_url, RouteTable};
use mcule_core::rate_limit::RateLimitConfig;
use std::env;
use std::fmt;
use std::time::Duration;

/// Default host of the standard API
pub const DEFAULT_STANDARD_URL: &str = "https://mcule.com";

/// Default host of the Ultimate API
pub const DEFAULT_ULTIMATE_URL: &str = "https://ultimateapp.mcule.com";

/// Environment variable holding the API token
pub const TOKEN_ENV_VAR: &str = "MCULE_API_TOKEN";

/// Environment variable holding the transport timeout in seconds
pub const TIMEOUT_ENV_VAR: &str = "MCULE_TIMEOUT_SECS";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The two MCule API flavours
///
/// They differ in routes, default host and the format of the
/// `Authorization` header; everything else is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiVariant {
    /// `mcule.com` compound lookup, search and quoting API
    #[default]
    Standard,
    /// `ultimateapp.mcule.com` search, pricing and quoting API
    Ultimate,
}

impl ApiVariant {
    /// Hardcoded fallback host
    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Standard => DEFAULT_STANDARD_URL,
            Self::Ultimate => DEFAULT_ULTIMATE_URL,
        }
    }

    /// Environment variable that overrides the host
    #[must_use]
    pub fn base_url_env_var(self) -> &'static str {
        match self {
            Self::Standard => "MCULE_BASE_URL",
            Self::Ultimate => "MCULE_ULTIMATE_BASE_URL",
        }
    }

    /// `Authorization` header value for `token`
    #[must_use]
    pub fn authorization_value(self, token: &str) -> String {
        match self {
            Self::Standard => format!("Token {token}"),
            Self::Ultimate => token.to_string(),
        }
    }

    /// Status code the search endpoints answer with on success
    #[must_use]
    pub fn search_success_status(self) -> u16 {
        match self {
            Self::Standard => 200,
            Self::Ultimate => 201,
        }
    }

    /// Route table for this variant rooted at `base_url`
    #[must_use]
    pub fn routes(self, base_url: &str) -> RouteTable {
        RouteTable::build(self, base_url)
    }
}

impl fmt::Display for ApiVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
            Self::Ultimate => f.write_str("ultimate"),
        }
    }
}

/// Client configuration
#[derive(Clone)]
pub struct ClientConfig {
    /// API flavour
    pub variant: ApiVariant,
    /// Authorization token
    pub token: String,
    /// Explicit base URL; falls back to the variant's env var, then its default host
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Rate limit configuration
    pub rate_limit: RateLimitConfig,
    /// Span every request is recorded under; `None` for the client's own span
    pub span: Option<tracing::Span>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("variant", &self.variant)
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("rate_limit", &self.rate_limit)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Configuration for `variant` authenticated with `token`
    pub fn new(variant: ApiVariant, token: impl Into<String>) -> Self {
        Self {
            variant,
            token: token.into(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            rate_limit: RateLimitConfig::default(),
            span: None,
        }
    }

    /// Standard API configuration
    pub fn standard(token: impl Into<String>) -> Self {
        Self::new(ApiVariant::Standard, token)
    }

    /// Ultimate API configuration
    pub fn ultimate(token: impl Into<String>) -> Self {
        Self::new(ApiVariant::Ultimate, token)
    }

    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `MCULE_API_TOKEN`: API token (required)
    /// - `MCULE_BASE_URL` / `MCULE_ULTIMATE_BASE_URL`: host override,
    ///   resolved when the client is built
    /// - `MCULE_TIMEOUT_SECS`: Request timeout in seconds
    pub fn from_env(variant: ApiVariant) -> ApiResult<Self> {
        let token = env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::missing_env(TOKEN_ENV_VAR))?;

        let timeout = env::var(TIMEOUT_ENV_VAR)
            .ok()
            .and_then(|s| s.parse().ok())
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        Ok(Self::new(variant, token).with_timeout(timeout))
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set rate limit config
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Builder-style method to record requests under a caller-owned span
    #[must_use]
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Base URL after applying explicit value, environment and default in that order
    #[must_use]
    pub fn resolved_base_url(&self) -> String {
        resolve_base_url(
            self.base_url.as_deref(),
            env::var(self.variant.base_url_env_var()).ok(),
            self.variant.default_base_url(),
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.token.trim().is_empty() {
            return Err(ApiError::config("token cannot be empty"));
        }

        validate_base_url(&self.resolved_base_url())?;

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        self.rate_limit
            .validate()
            .map_err(|e| ApiError::config(e.to_string()))
    }
}

/// Reject anything that is not an absolute http(s) URL
pub(crate) fn validate_base_url(url: &str) -> ApiResult<()> {
    if url.is_empty() {
        return Err(ApiError::config("base_url cannot be empty"));
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ApiError::config("base_url must start with http:// or https://"));
    }

    Ok(())
}
