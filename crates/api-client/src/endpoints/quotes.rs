//! Quote endpoints
//!
//! A quote is created with one of the `request_*` calls, polled with
//! [`QuotesApi::status`] until [`QuoteState::is_finished`], then fetched as
//! JSON or exported as a file.
//!
//! [`QuoteState::is_finished`]: crate::endpoints::QuoteState::is_finished

use super::pricing::compounds;
use super::{collect_strs, CREATED, OK};
use crate::client::MculeClient;
use crate::endpoints::types::{QuoteFileType, QuoteOptions};
use crate::error::{ApiError, ApiResult};
use crate::http::HttpRequest;
use crate::response::{DefaultOnSuccess, FileOnSuccess, FilePayload, JsonPayload, Outcome};
use crate::routes::Route;
use serde_json::{json, Map, Value};

/// Quote API interface
#[derive(Clone)]
pub struct QuotesApi {
    client: MculeClient,
}

impl QuotesApi {
    /// Create a new quotes API interface
    pub(crate) fn new(client: MculeClient) -> Self {
        Self { client }
    }

    /// Request a quote for `inchi_keys`, all at the same `amount` in mg
    ///
    /// `amount` takes precedence over [`QuoteOptions::amount`] in the body.
    pub fn request_single<S: AsRef<str>>(
        &self,
        inchi_keys: &[S],
        delivery_country: &str,
        amount: u32,
        options: &QuoteOptions,
    ) -> ApiResult<Outcome<JsonPayload>> {
        let amounts = vec![amount; inchi_keys.len()];
        let mut body = base_body(options, delivery_country)?;
        body.insert("compounds".into(), Value::Array(compounds(inchi_keys, &amounts)));
        body.insert("amount".into(), json!(amount));
        self.create(body)
    }

    /// Request a quote for `inchi_keys`, each at its own amount in mg
    pub fn request_multi<S: AsRef<str>>(
        &self,
        inchi_keys: &[S],
        amounts: &[u32],
        delivery_country: &str,
        options: &QuoteOptions,
    ) -> ApiResult<Outcome<JsonPayload>> {
        let mut body = base_body(options, delivery_country)?;
        body.insert("compounds".into(), Value::Array(compounds(inchi_keys, amounts)));
        self.create(body)
    }

    /// Request a quote for free-form queries (IDs, SMILES, InChIKeys)
    ///
    /// Amount, purity and delivery constraints come from `options`.
    pub fn request_batch<S: AsRef<str>>(
        &self,
        queries: &[S],
        delivery_country: &str,
        options: &QuoteOptions,
    ) -> ApiResult<Outcome<JsonPayload>> {
        let mut body = base_body(options, delivery_country)?;
        body.insert("queries".into(), json!(collect_strs(queries)));
        self.create(body)
    }

    /// Quote request status
    ///
    /// Read the state with [`JsonPayload::quote_state`]. Expects 200, as
    /// every read does; a 201 answer is reported as [`Outcome::Failed`].
    pub fn status(&self, quote_id: u64) -> ApiResult<Outcome<JsonPayload>> {
        self.get(Route::QuoteStatus, quote_id)
    }

    /// Full quote once the request is done
    ///
    /// Expects 200, like [`QuotesApi::status`].
    pub fn detailed(&self, quote_id: u64) -> ApiResult<Outcome<JsonPayload>> {
        self.get(Route::DetailedQuote, quote_id)
    }

    /// Structures of a quote that could not be sourced (standard API)
    pub fn missing_structures(&self, quote_id: u64) -> ApiResult<Outcome<JsonPayload>> {
        self.get(Route::QuoteMissingStructures, quote_id)
    }

    /// Export a quote as PDF or Excel
    ///
    /// Expects 200, like [`QuotesApi::status`].
    pub fn download(
        &self,
        quote_id: u64,
        file_type: QuoteFileType,
    ) -> ApiResult<Outcome<FilePayload>> {
        let id = quote_id.to_string();
        let url = self.client.url(
            Route::QuoteDownload,
            &[("quote_id", &id), ("file_type", file_type.as_str())],
        )?;
        self.client
            .execute(HttpRequest::get(url), OK, &FileOnSuccess)
    }

    fn create(&self, body: Map<String, Value>) -> ApiResult<Outcome<JsonPayload>> {
        let request = self.create_request(body)?;
        self.client.execute(request, CREATED, &DefaultOnSuccess)
    }

    fn create_request(&self, body: Map<String, Value>) -> ApiResult<HttpRequest> {
        let url = self.client.url(Route::QuoteRequest, &[])?;
        Ok(HttpRequest::post(url, Value::Object(body)))
    }

    fn get(&self, route: Route, quote_id: u64) -> ApiResult<Outcome<JsonPayload>> {
        let id = quote_id.to_string();
        let url = self.client.url(route, &[("quote_id", &id)])?;
        self.client
            .execute(HttpRequest::get(url), OK, &DefaultOnSuccess)
    }
}

/// Set options plus the delivery country
fn base_body(options: &QuoteOptions, delivery_country: &str) -> ApiResult<Map<String, Value>> {
    let mut body = match serde_json::to_value(options)? {
        Value::Object(map) => map,
        other => {
            return Err(ApiError::malformed(format!(
                "quote options serialized to {other}, expected an object"
            )))
        }
    };
    body.insert("delivery_country".into(), json!(delivery_country));
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiVariant, ClientConfig};
    use crate::endpoints::types::Currency;
    use crate::http::HttpMethod;

    fn api(variant: ApiVariant) -> QuotesApi {
        MculeClient::with_config(
            ClientConfig::new(variant, "secret").with_base_url("https://mcule.test"),
        )
        .unwrap()
        .quotes()
    }

    #[test]
    fn test_base_body_omits_unset_options() {
        let body = base_body(&QuoteOptions::default(), "HU").unwrap();
        assert_eq!(Value::Object(body), json!({"delivery_country": "HU"}));
    }

    #[test]
    fn test_base_body_keeps_set_options() {
        let options = QuoteOptions::default()
            .with_customer_name("Ada")
            .with_currency(Currency::Gbp)
            .with_scheme("fast");
        let body = base_body(&options, "GB").unwrap();

        assert_eq!(
            Value::Object(body),
            json!({
                "customer_name": "Ada",
                "currency": "GBP",
                "scheme": "fast",
                "delivery_country": "GB",
            })
        );
    }

    #[test]
    fn test_create_request_targets_quote_route() {
        let quotes = api(ApiVariant::Ultimate);
        let req = quotes
            .create_request(base_body(&QuoteOptions::default(), "US").unwrap())
            .unwrap();

        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "https://mcule.test/api/v1/iquote-queries/");
    }

    #[test]
    fn test_missing_structures_is_standard_only() {
        let err = api(ApiVariant::Ultimate).missing_structures(7).unwrap_err();
        assert!(matches!(
            err,
            ApiError::UnsupportedEndpoint { route: Route::QuoteMissingStructures, .. }
        ));
    }
}
