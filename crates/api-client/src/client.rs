//! Main API client implementation

use crate::config::{validate_base_url, ApiVariant, ClientConfig};
use crate::endpoints::{CompoundsApi, PricingApi, QuotesApi, SearchApi};
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpRequest, HttpResponse};
use crate::response::{classify, Outcome, SuccessTransform};
use crate::routes::{Route, RouteTable};
use mcule_core::rate_limit::{RateLimitStatus, RateLimiter};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// User agent sent with every request
const CLIENT_USER_AGENT: &str = concat!("mcule-api-client/", env!("CARGO_PKG_VERSION"));

/// MCule API client
///
/// One type serves both API variants; the [`ApiVariant`] decides the route
/// table and the `Authorization` format. Every request goes through
/// [`MculeClient::execute`]:
/// - Rate gate (raises instead of waiting)
/// - Exactly one HTTP call
/// - Response classification
///
/// Cloning is cheap and clones share routes, headers and rate limiter.
#[derive(Clone)]
pub struct MculeClient {
    inner: Client,
    config: Arc<ClientConfig>,
    routes: Arc<RwLock<Arc<RouteTable>>>,
    rate_limiter: Arc<RateLimiter>,
    span: tracing::Span,
}

impl MculeClient {
    /// Create a client for `variant` with default configuration
    pub fn new(variant: ApiVariant, token: impl Into<String>) -> ApiResult<Self> {
        Self::with_config(ClientConfig::new(variant, token))
    }

    /// Create a standard API client
    pub fn standard(token: impl Into<String>) -> ApiResult<Self> {
        Self::new(ApiVariant::Standard, token)
    }

    /// Create an Ultimate API client
    pub fn ultimate(token: impl Into<String>) -> ApiResult<Self> {
        Self::new(ApiVariant::Ultimate, token)
    }

    /// Create a client from environment variables
    pub fn from_env(variant: ApiVariant) -> ApiResult<Self> {
        Self::with_config(ClientConfig::from_env(variant)?)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut authorization =
            HeaderValue::from_str(&config.variant.authorization_value(&config.token))
                .map_err(|_| ApiError::config("token contains characters not allowed in a header"))?;
        authorization.set_sensitive(true);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        default_headers.insert(AUTHORIZATION, authorization);

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        let routes = Arc::new(config.variant.routes(&config.resolved_base_url()));
        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));
        let span = config.span.clone().unwrap_or_else(
            || tracing::info_span!("mcule_client", variant = %config.variant),
        );

        Ok(Self {
            inner,
            config: Arc::new(config),
            routes: Arc::new(RwLock::new(routes)),
            rate_limiter,
            span,
        })
    }

    /// Share `rate_limiter` with other clients instead of owning one
    #[must_use]
    pub fn with_rate_limiter(mut self, rate_limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// API variant this client talks to
    #[must_use]
    pub fn variant(&self) -> ApiVariant {
        self.config.variant
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> String {
        self.routes().base_url().to_string()
    }

    /// Point the client at a different host
    ///
    /// Every route is rebuilt and swapped in at once; requests already in
    /// flight keep the table they started with.
    pub fn set_base_url(&self, base_url: &str) -> ApiResult<()> {
        validate_base_url(base_url)?;
        let rebuilt = Arc::new(self.variant().routes(base_url));

        let mut routes = self.routes.write().unwrap_or_else(PoisonError::into_inner);
        *routes = rebuilt;
        debug!(parent: &self.span, base_url = %base_url, "Routes rebuilt");
        Ok(())
    }

    /// Snapshot of the current route table
    #[must_use]
    pub fn routes(&self) -> Arc<RouteTable> {
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&routes)
    }

    /// Concrete URL for `route` in the current route table
    pub fn url(&self, route: Route, params: &[(&str, &str)]) -> ApiResult<String> {
        self.routes().url(route, params)
    }

    /// The admission gate this client uses
    #[must_use]
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.rate_limiter
    }

    /// Get rate limit status
    #[must_use]
    pub fn rate_limit_status(&self) -> RateLimitStatus {
        self.rate_limiter.status()
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access search endpoints
    #[must_use]
    pub fn search(&self) -> SearchApi {
        SearchApi::new(self.clone())
    }

    /// Access compound lookup endpoints (standard API)
    #[must_use]
    pub fn compounds(&self) -> CompoundsApi {
        CompoundsApi::new(self.clone())
    }

    /// Access pricing endpoints (Ultimate API)
    #[must_use]
    pub fn pricing(&self) -> PricingApi {
        PricingApi::new(self.clone())
    }

    /// Access quote endpoints
    #[must_use]
    pub fn quotes(&self) -> QuotesApi {
        QuotesApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Request execution
    // -------------------------------------------------------------------------

    /// Gate, send and classify one request
    ///
    /// Returns `Err` when the rate gate rejects the request, the transport
    /// fails or a success body cannot be read. Remote 4xx/5xx answers come
    /// back as [`Outcome::Failed`].
    pub fn execute<T: SuccessTransform>(
        &self,
        request: HttpRequest,
        expected_status: u16,
        transform: &T,
    ) -> ApiResult<Outcome<T::Output>> {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::debug_span!(
            parent: &self.span,
            "mcule_request",
            request_id = %request_id,
            method = %request.method,
            url = %request.url,
        );
        let _entered = span.enter();

        if let Err(e) = self.rate_limiter.gate() {
            warn!(
                request_id = %request_id,
                url = %request.url,
                error = %e,
                "Rate limited"
            );
            return Err(e.into());
        }

        let start = Instant::now();
        let response = self.send(&request_id, request)?;
        debug!(
            status = response.status,
            elapsed_ms = start.elapsed().as_millis(),
            "Response received"
        );

        classify(response, expected_status, transform)
    }

    /// Execute a single request without gating or classification
    fn send(&self, request_id: &str, request: HttpRequest) -> ApiResult<HttpResponse> {
        let mut builder = self
            .inner
            .request(request.method.into(), &request.url)
            .header(X_REQUEST_ID, request_id);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send()?;
        Ok(HttpResponse::from_reqwest(response)?)
    }
}

impl std::fmt::Debug for MculeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MculeClient")
            .field("variant", &self.variant())
            .field("base_url", &self.base_url())
            .finish_non_exhaustive()
    }
}
