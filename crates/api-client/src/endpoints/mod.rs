//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for one group of MCule endpoints.
//! Calling a route the client's [`ApiVariant`](crate::ApiVariant) does not
//! have fails with [`ApiError::UnsupportedEndpoint`](crate::ApiError::UnsupportedEndpoint)
//! before anything is sent.
//!
//! ## Mapping to MCule routes
//!
//! | Module | Routes | Variant |
//! |--------|--------|---------|
//! | `search` | `searches/`, `search/exact/`, `search/sim/`, `search/sss/`, `search/lookup/` | both |
//! | `compounds` | `compound/{id}`, `lookup/inchikey/{key}`, `database-files` | standard |
//! | `pricing` | `pricing/` | Ultimate |
//! | `quotes` | `iquote-queries/`, `iquotes/{id}` | both |

pub mod compounds;
pub mod pricing;
pub mod quotes;
pub mod search;
pub mod types;

pub use compounds::CompoundsApi;
pub use pricing::PricingApi;
pub use quotes::QuotesApi;
pub use search::SearchApi;
pub use types::{Currency, QuoteFileType, QuoteOptions, QuoteState, DEFAULT_SIMILARITY_THRESHOLD};

/// Expected status for reads
pub(crate) const OK: u16 = 200;

/// Expected status for Ultimate searches, pricing and quote creation
pub(crate) const CREATED: u16 = 201;

pub(crate) fn collect_strs<S: AsRef<str>>(items: &[S]) -> Vec<&str> {
    items.iter().map(AsRef::as_ref).collect()
}
