//! Client for the MCule chemistry APIs
//!
//! This crate talks to both the standard MCule API and MCule Ultimate with
//! a single client type selected by [`ApiVariant`].
//!
//! # Features
//!
//! - **Variant-aware routes**: one route table per variant, rebuilt atomically
//!   when the base URL changes
//! - **Rate limiting**: per-minute and per-day quotas plus minimum spacing,
//!   rejected calls fail fast with a retry hint
//! - **Response classification**: remote errors come back as
//!   [`Outcome::Failed`] and are logged with their category
//! - **Request correlation**: every call carries a unique `X-Request-ID`
//!
//! # Example
//!
//! ```rust,no_run
//! use mcule_api_client::{MculeClient, Outcome};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MculeClient::ultimate("my-token")?;
//!
//!     match client.search().exact_search("CCO")? {
//!         Outcome::Success(hit) => println!("Found {}", hit.compound_id),
//!         Outcome::Failed(failure) => println!("HTTP {}", failure.status),
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod middleware;
pub mod response;
pub mod routes;

pub use client::MculeClient;
pub use config::{ApiVariant, ClientConfig};
pub use error::{ApiError, ApiResult};
pub use response::{FailedResponse, FailureCategory, Outcome};
pub use routes::{Route, RouteTable};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::MculeClient;
    pub use crate::config::{ApiVariant, ClientConfig};
    pub use crate::endpoints::{
        CompoundsApi, Currency, PricingApi, QuoteFileType, QuoteOptions, QuoteState, QuotesApi,
        SearchApi,
    };
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::middleware::{RateLimitConfig, RateLimiter};
    pub use crate::response::{FilePayload, JsonPayload, Outcome, SearchPayload};
}
