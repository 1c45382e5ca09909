//! URL routes for the MCule APIs
//!
//! A [`RouteTable`] maps every logical endpoint of one API variant to a URL
//! template derived from a single base URL. Templates may contain
//! `{mcule_id}`, `{inchi_key}`, `{quote_id}` and `{file_type}` placeholders
//! that are filled in at request time with [`RouteTable::url`].
//!
//! Tables are immutable. Changing the base URL means building a new table,
//! so a reader never sees routes pointing at two different hosts.

use crate::config::ApiVariant;
use crate::error::{ApiError, ApiResult};
use std::collections::BTreeMap;
use std::fmt;

/// Path prefix shared by both API variants
const API_PREFIX: &str = "api/v1";

/// Logical endpoint names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Route {
    /// Downloadable database files (standard)
    DatabaseFiles,
    /// Compound details by MCule ID (standard)
    CompoundDetails,
    /// Compound lookup by InChIKey (standard)
    InchiKeyLookup,
    /// Free-text lookup of one query: ID, SMILES, InChI or InChIKey (standard)
    SingleQueryLookup,
    /// Compound availability by MCule ID (standard)
    CompoundAvailability,
    /// Compound prices by MCule ID (standard)
    CompoundPrices,
    /// Exact search for several queries (standard)
    ExactSearch,
    /// Exact search with availability (standard)
    ExactSearchWithAvailability,
    /// Similarity search (standard)
    SimilaritySearch,
    /// Substructure search (standard)
    SubstructureSearch,
    /// Typed search endpoint (Ultimate)
    Searches,
    /// Pricing endpoint (Ultimate)
    Pricing,
    /// Quote request creation
    QuoteRequest,
    /// Quote request status
    QuoteStatus,
    /// Detailed quote
    DetailedQuote,
    /// Structures missing from a quote (standard)
    QuoteMissingStructures,
    /// Quote export as PDF or Excel
    QuoteDownload,
}

impl Route {
    /// Stable snake_case name used in logs and errors
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::DatabaseFiles => "database_files",
            Self::CompoundDetails => "compound_details",
            Self::InchiKeyLookup => "inchi_key_lookup",
            Self::SingleQueryLookup => "single_query_lookup",
            Self::CompoundAvailability => "compound_availability",
            Self::CompoundPrices => "compound_prices",
            Self::ExactSearch => "exact_search",
            Self::ExactSearchWithAvailability => "exact_search_with_availability",
            Self::SimilaritySearch => "similarity_search",
            Self::SubstructureSearch => "substructure_search",
            Self::Searches => "searches",
            Self::Pricing => "pricing",
            Self::QuoteRequest => "quote_request",
            Self::QuoteStatus => "quote_status",
            Self::DetailedQuote => "detailed_quote",
            Self::QuoteMissingStructures => "quote_missing_structures",
            Self::QuoteDownload => "quote_download",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every endpoint URL of one API variant, derived from one base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    variant: ApiVariant,
    base_url: String,
    api_url: String,
    templates: BTreeMap<Route, String>,
}

impl RouteTable {
    /// Build the table for `variant` rooted at `base_url`
    #[must_use]
    pub fn build(variant: ApiVariant, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let api_url = format!("{base_url}/{API_PREFIX}");

        let paths: &[(Route, &str)] = match variant {
            ApiVariant::Standard => &[
                (Route::DatabaseFiles, "database-files"),
                (Route::CompoundDetails, "compound/{mcule_id}"),
                (Route::InchiKeyLookup, "lookup/inchikey/{inchi_key}"),
                (Route::SingleQueryLookup, "search/lookup/"),
                (Route::CompoundAvailability, "compound/{mcule_id}/availability"),
                (Route::CompoundPrices, "compound/{mcule_id}/prices"),
                (Route::ExactSearch, "search/exact/"),
                (Route::ExactSearchWithAvailability, "search/exact/availability/"),
                (Route::SimilaritySearch, "search/sim/"),
                (Route::SubstructureSearch, "search/sss/"),
                (Route::QuoteRequest, "iquote-queries/"),
                (Route::QuoteStatus, "iquote-queries/{quote_id}"),
                (Route::DetailedQuote, "iquotes/{quote_id}"),
                (Route::QuoteMissingStructures, "iquotes/{quote_id}/missing"),
                (Route::QuoteDownload, "iquotes/{quote_id}/{file_type}"),
            ],
            ApiVariant::Ultimate => &[
                (Route::Searches, "searches/"),
                (Route::Pricing, "pricing/"),
                (Route::QuoteRequest, "iquote-queries/"),
                (Route::QuoteStatus, "iquote-queries/{quote_id}/"),
                (Route::DetailedQuote, "iquotes/{quote_id}/"),
                (Route::QuoteDownload, "iquotes/{quote_id}/{file_type}/"),
            ],
        };

        let templates = paths
            .iter()
            .map(|(route, path)| (*route, format!("{api_url}/{path}")))
            .collect();

        Self {
            variant,
            base_url,
            api_url,
            templates,
        }
    }

    /// Variant this table belongs to
    #[must_use]
    pub fn variant(&self) -> ApiVariant {
        self.variant
    }

    /// Base URL the table was built from
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Versioned API root (`{base}/api/v1`)
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Whether the variant exposes `route`
    #[must_use]
    pub fn supports(&self, route: Route) -> bool {
        self.templates.contains_key(&route)
    }

    /// Raw template for `route`, placeholders included
    pub fn template(&self, route: Route) -> ApiResult<&str> {
        self.templates
            .get(&route)
            .map(String::as_str)
            .ok_or(ApiError::UnsupportedEndpoint {
                route,
                variant: self.variant,
            })
    }

    /// Concrete URL for `route` with every `{name}` placeholder filled from `params`
    ///
    /// The template is expanded in a single pass, so values are inserted
    /// verbatim even when they contain braces.
    pub fn url(&self, route: Route, params: &[(&str, &str)]) -> ApiResult<String> {
        let template = self.template(route)?;
        let mut url = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            let name = &rest[start + 1..start + len];
            let value = params
                .iter()
                .find(|(param, _)| *param == name)
                .map(|(_, value)| *value)
                .ok_or_else(|| {
                    ApiError::InvalidUrl(format!("{route} requires a value for {{{name}}}"))
                })?;

            url.push_str(&rest[..start]);
            url.push_str(value);
            rest = &rest[start + len + 1..];
        }

        url.push_str(rest);
        Ok(url)
    }

    /// All `(route, template)` pairs in a stable order
    pub fn iter(&self) -> impl Iterator<Item = (Route, &str)> {
        self.templates.iter().map(|(route, t)| (*route, t.as_str()))
    }
}

/// Pick the base URL: explicit value, then environment value, then `default`
///
/// Empty strings count as absent.
#[must_use]
pub fn resolve_base_url(explicit: Option<&str>, from_env: Option<String>, default: &str) -> String {
    explicit
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .or_else(|| from_env.filter(|url| !url.is_empty()))
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_standard_routes() {
        let routes = RouteTable::build(ApiVariant::Standard, "https://mcule.com");

        assert_eq!(routes.api_url(), "https://mcule.com/api/v1");
        assert_eq!(
            routes.template(Route::CompoundDetails).unwrap(),
            "https://mcule.com/api/v1/compound/{mcule_id}"
        );
        assert_eq!(
            routes.template(Route::ExactSearchWithAvailability).unwrap(),
            "https://mcule.com/api/v1/search/exact/availability/"
        );
        assert!(!routes.supports(Route::Pricing));
        assert!(!routes.supports(Route::Searches));
    }

    #[test]
    fn test_ultimate_routes() {
        let routes = RouteTable::build(ApiVariant::Ultimate, "https://ultimateapp.mcule.com");

        assert_eq!(
            routes.template(Route::Searches).unwrap(),
            "https://ultimateapp.mcule.com/api/v1/searches/"
        );
        assert_eq!(
            routes.template(Route::QuoteDownload).unwrap(),
            "https://ultimateapp.mcule.com/api/v1/iquotes/{quote_id}/{file_type}/"
        );
        assert!(!routes.supports(Route::CompoundDetails));
        assert!(matches!(
            routes.template(Route::QuoteMissingStructures),
            Err(ApiError::UnsupportedEndpoint { route: Route::QuoteMissingStructures, .. })
        ));
    }

    #[test]
    fn test_url_fills_placeholders() {
        let routes = RouteTable::build(ApiVariant::Standard, "https://mcule.com");

        let url = routes
            .url(Route::QuoteDownload, &[("quote_id", "42"), ("file_type", "pdf")])
            .unwrap();
        assert_eq!(url, "https://mcule.com/api/v1/iquotes/42/pdf");
    }

    #[test]
    fn test_url_missing_placeholder() {
        let routes = RouteTable::build(ApiVariant::Standard, "https://mcule.com");

        let err = routes.url(Route::QuoteDownload, &[("quote_id", "42")]).unwrap_err();
        match err {
            ApiError::InvalidUrl(msg) => assert!(msg.contains("{file_type}")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_url_values_are_not_expanded_again() {
        let routes = RouteTable::build(ApiVariant::Standard, "https://mcule.com");

        let url = routes
            .url(Route::QuoteDownload, &[("quote_id", "{file_type}"), ("file_type", "pdf")])
            .unwrap();
        assert_eq!(url, "https://mcule.com/api/v1/iquotes/{file_type}/pdf");

        let url = routes
            .url(Route::CompoundDetails, &[("mcule_id", "a{b")])
            .unwrap();
        assert_eq!(url, "https://mcule.com/api/v1/compound/a{b");
    }

    #[test]
    fn test_url_ignores_unused_params() {
        let routes = RouteTable::build(ApiVariant::Ultimate, "https://mcule.com");

        let url = routes.url(Route::Pricing, &[("quote_id", "1")]).unwrap();
        assert_eq!(url, "https://mcule.com/api/v1/pricing/");
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let routes = RouteTable::build(ApiVariant::Ultimate, "https://custom.example/");
        assert_eq!(routes.base_url(), "https://custom.example");
        assert_eq!(
            routes.template(Route::Pricing).unwrap(),
            "https://custom.example/api/v1/pricing/"
        );
    }

    #[test]
    fn test_rebuild_replaces_every_route() {
        let original = RouteTable::build(ApiVariant::Standard, "https://mcule.com");
        let rebuilt = RouteTable::build(original.variant(), "https://custom.example");

        assert_eq!(original.iter().count(), rebuilt.iter().count());
        for (_, template) in rebuilt.iter() {
            assert!(template.starts_with("https://custom.example/api/v1/"));
            assert!(!template.contains("mcule.com"));
        }
    }

    #[test]
    fn test_resolve_base_url_order() {
        let default = "https://mcule.com";

        assert_eq!(
            resolve_base_url(Some("https://a.example"), Some("https://b.example".into()), default),
            "https://a.example"
        );
        assert_eq!(
            resolve_base_url(None, Some("https://b.example".into()), default),
            "https://b.example"
        );
        assert_eq!(resolve_base_url(Some(""), Some(String::new()), default), default);
        assert_eq!(resolve_base_url(None, None, default), default);
    }

    proptest! {
        #[test]
        fn proptest_build_is_deterministic(host in "[a-z]{1,12}\\.[a-z]{2,5}", ultimate in any::<bool>()) {
            let variant = if ultimate { ApiVariant::Ultimate } else { ApiVariant::Standard };
            let base = format!("https://{host}");

            let first = RouteTable::build(variant, &base);
            let second = RouteTable::build(variant, &base);

            prop_assert_eq!(&first, &second);
            for (_, template) in first.iter() {
                prop_assert!(template.starts_with(&base));
            }
        }
    }
}
