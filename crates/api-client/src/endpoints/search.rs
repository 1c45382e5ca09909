//! Search endpoints
//!
//! The Ultimate API exposes one typed `searches/` endpoint; the standard API
//! has one route per search kind. [`SearchApi`] picks the right form for the
//! client's variant.

use super::{collect_strs, OK};
use crate::client::MculeClient;
use crate::config::ApiVariant;
use crate::error::ApiResult;
use crate::http::HttpRequest;
use crate::response::{DefaultOnSuccess, JsonPayload, Outcome, SearchPayload, SearchResultOnSuccess};
use crate::routes::Route;
use serde_json::json;

/// Search API interface
#[derive(Clone)]
pub struct SearchApi {
    client: MculeClient,
}

impl SearchApi {
    /// Create a new search API interface
    pub(crate) fn new(client: MculeClient) -> Self {
        Self { client }
    }

    /// Exact match for one SMILES
    ///
    /// The payload carries the first match's compound id. A search without
    /// matches is reported as [`ApiError::MalformedPayload`](crate::ApiError::MalformedPayload).
    pub fn exact_search(&self, smiles: &str) -> ApiResult<Outcome<SearchPayload>> {
        let request = self.exact_request(smiles)?;
        self.client
            .execute(request, self.search_status(), &SearchResultOnSuccess)
    }

    /// Similarity search around `smiles`
    ///
    /// `threshold` is the minimum similarity, see
    /// [`DEFAULT_SIMILARITY_THRESHOLD`](super::DEFAULT_SIMILARITY_THRESHOLD).
    pub fn similarity_search(
        &self,
        smiles: &str,
        limit: u32,
        threshold: f64,
    ) -> ApiResult<Outcome<JsonPayload>> {
        let request = self.similarity_request(smiles, limit, threshold)?;
        self.client
            .execute(request, self.search_status(), &DefaultOnSuccess)
    }

    /// Substructure search for `smiles`
    pub fn substructure_search(&self, smiles: &str, limit: u32) -> ApiResult<Outcome<JsonPayload>> {
        let request = self.substructure_request(smiles, limit)?;
        self.client
            .execute(request, self.search_status(), &DefaultOnSuccess)
    }

    /// Exact search for several queries at once (standard API)
    ///
    /// POST /search/exact/
    pub fn multiple_queries<S: AsRef<str>>(&self, queries: &[S]) -> ApiResult<Outcome<JsonPayload>> {
        let url = self.client.url(Route::ExactSearch, &[])?;
        let request = HttpRequest::post(url, json!({ "queries": collect_strs(queries) }));
        self.client.execute(request, OK, &DefaultOnSuccess)
    }

    /// Exact search for several queries including availability (standard API)
    ///
    /// POST /search/exact/availability/
    pub fn multiple_queries_with_availability<S: AsRef<str>>(
        &self,
        queries: &[S],
    ) -> ApiResult<Outcome<JsonPayload>> {
        let url = self.client.url(Route::ExactSearchWithAvailability, &[])?;
        let request = HttpRequest::post(url, json!({ "queries": collect_strs(queries) }));
        self.client.execute(request, OK, &DefaultOnSuccess)
    }

    /// Look up one identifier, SMILES, InChI or InChIKey (standard API)
    ///
    /// GET /search/lookup/?query=<query>
    pub fn single_query(&self, query: &str) -> ApiResult<Outcome<JsonPayload>> {
        let url = self.client.url(Route::SingleQueryLookup, &[])?;
        let request = HttpRequest::get(url).with_query("query", query);
        self.client.execute(request, OK, &DefaultOnSuccess)
    }

    fn search_status(&self) -> u16 {
        self.client.variant().search_success_status()
    }

    fn exact_request(&self, smiles: &str) -> ApiResult<HttpRequest> {
        match self.client.variant() {
            ApiVariant::Ultimate => Ok(HttpRequest::post(
                self.client.url(Route::Searches, &[])?,
                json!({ "query": { "type": "exact", "queries": [smiles] } }),
            )),
            ApiVariant::Standard => Ok(HttpRequest::post(
                self.client.url(Route::ExactSearch, &[])?,
                json!({ "queries": [smiles] }),
            )),
        }
    }

    fn similarity_request(&self, smiles: &str, limit: u32, threshold: f64) -> ApiResult<HttpRequest> {
        match self.client.variant() {
            ApiVariant::Ultimate => Ok(HttpRequest::post(
                self.client.url(Route::Searches, &[])?,
                json!({
                    "query": {
                        "type": "sim",
                        "query": smiles,
                        "limit": limit,
                        "sim_threshold": threshold,
                    }
                }),
            )),
            ApiVariant::Standard => Ok(HttpRequest::post(
                self.client.url(Route::SimilaritySearch, &[])?,
                json!({ "query": smiles, "limit": limit, "threshold": threshold }),
            )),
        }
    }

    fn substructure_request(&self, smiles: &str, limit: u32) -> ApiResult<HttpRequest> {
        match self.client.variant() {
            ApiVariant::Ultimate => Ok(HttpRequest::post(
                self.client.url(Route::Searches, &[])?,
                json!({ "query": { "type": "sss", "query": smiles, "limit": limit } }),
            )),
            ApiVariant::Standard => Ok(HttpRequest::post(
                self.client.url(Route::SubstructureSearch, &[])?,
                json!({ "query": smiles, "limit": limit }),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::http::HttpMethod;

    fn api(variant: ApiVariant) -> SearchApi {
        MculeClient::with_config(
            ClientConfig::new(variant, "secret").with_base_url("https://mcule.test"),
        )
        .unwrap()
        .search()
    }

    #[test]
    fn test_ultimate_exact_request() {
        let req = api(ApiVariant::Ultimate).exact_request("CCO").unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "https://mcule.test/api/v1/searches/");
        assert_eq!(
            req.body,
            Some(json!({"query": {"type": "exact", "queries": ["CCO"]}}))
        );
    }

    #[test]
    fn test_standard_exact_request() {
        let req = api(ApiVariant::Standard).exact_request("CCO").unwrap();
        assert_eq!(req.url, "https://mcule.test/api/v1/search/exact/");
        assert_eq!(req.body, Some(json!({"queries": ["CCO"]})));
    }

    #[test]
    fn test_similarity_requests() {
        let req = api(ApiVariant::Ultimate)
            .similarity_request("c1ccccc1", 10, 0.7)
            .unwrap();
        assert_eq!(
            req.body,
            Some(json!({"query": {"type": "sim", "query": "c1ccccc1", "limit": 10, "sim_threshold": 0.7}}))
        );

        let req = api(ApiVariant::Standard)
            .similarity_request("c1ccccc1", 10, 0.9)
            .unwrap();
        assert_eq!(req.url, "https://mcule.test/api/v1/search/sim/");
        assert_eq!(
            req.body,
            Some(json!({"query": "c1ccccc1", "limit": 10, "threshold": 0.9}))
        );
    }

    #[test]
    fn test_substructure_requests() {
        let req = api(ApiVariant::Ultimate).substructure_request("C=O", 5).unwrap();
        assert_eq!(
            req.body,
            Some(json!({"query": {"type": "sss", "query": "C=O", "limit": 5}}))
        );

        let req = api(ApiVariant::Standard).substructure_request("C=O", 5).unwrap();
        assert_eq!(req.url, "https://mcule.test/api/v1/search/sss/");
    }

    #[test]
    fn test_standard_only_routes_fail_on_ultimate() {
        let err = api(ApiVariant::Ultimate).multiple_queries(&["CCO"]).unwrap_err();
        assert!(matches!(
            err,
            crate::ApiError::UnsupportedEndpoint { route: Route::ExactSearch, variant: ApiVariant::Ultimate }
        ));
    }
}
