//! Pricing endpoints (Ultimate API)
//!
//! Prices are requested per InChIKey, either with one amount for every
//! compound or with one amount per compound.

use super::{collect_strs, CREATED};
use crate::client::MculeClient;
use crate::endpoints::types::Currency;
use crate::error::ApiResult;
use crate::http::HttpRequest;
use crate::response::{DefaultOnSuccess, JsonPayload, Outcome};
use crate::routes::Route;
use serde_json::{json, Value};
use tracing::warn;

/// Pricing API interface
#[derive(Clone)]
pub struct PricingApi {
    client: MculeClient,
}

impl PricingApi {
    /// Create a new pricing API interface
    pub(crate) fn new(client: MculeClient) -> Self {
        Self { client }
    }

    /// Prices for `inchi_keys`, all at the same `amount` in mg
    ///
    /// `individual` asks for per-compound prices instead of prices for
    /// ordering the compounds together.
    pub fn price_search_single<S: AsRef<str>>(
        &self,
        inchi_keys: &[S],
        amount: u32,
        currency: Currency,
        individual: bool,
    ) -> ApiResult<Outcome<JsonPayload>> {
        let request = self.single_request(inchi_keys, amount, currency, individual)?;
        self.client.execute(request, CREATED, &DefaultOnSuccess)
    }

    /// Prices for `inchi_keys`, each at its own amount in mg
    ///
    /// Keys and amounts are paired in order; extra entries on either side
    /// are dropped.
    pub fn price_search_multi<S: AsRef<str>>(
        &self,
        inchi_keys: &[S],
        amounts: &[u32],
        currency: Currency,
        individual: bool,
    ) -> ApiResult<Outcome<JsonPayload>> {
        let request = self.multi_request(inchi_keys, amounts, currency, individual)?;
        self.client.execute(request, CREATED, &DefaultOnSuccess)
    }

    fn single_request<S: AsRef<str>>(
        &self,
        inchi_keys: &[S],
        amount: u32,
        currency: Currency,
        individual: bool,
    ) -> ApiResult<HttpRequest> {
        let amounts = vec![amount; inchi_keys.len()];
        let body = json!({
            "compounds": compounds(inchi_keys, &amounts),
            "amount": amount,
            "currency": currency,
            "individual": individual,
        });
        Ok(HttpRequest::post(self.client.url(Route::Pricing, &[])?, body))
    }

    fn multi_request<S: AsRef<str>>(
        &self,
        inchi_keys: &[S],
        amounts: &[u32],
        currency: Currency,
        individual: bool,
    ) -> ApiResult<HttpRequest> {
        let body = json!({
            "compounds": compounds(inchi_keys, amounts),
            "currency": currency,
            "individual": individual,
        });
        Ok(HttpRequest::post(self.client.url(Route::Pricing, &[])?, body))
    }
}

/// `[{inchi_key, amount}]` pairs shared by pricing and quote bodies
pub(crate) fn compounds<S: AsRef<str>>(inchi_keys: &[S], amounts: &[u32]) -> Vec<Value> {
    if inchi_keys.len() != amounts.len() {
        warn!(
            inchi_keys = inchi_keys.len(),
            amounts = amounts.len(),
            "InChIKey and amount counts differ, extra entries are ignored"
        );
    }

    collect_strs(inchi_keys)
        .into_iter()
        .zip(amounts)
        .map(|(inchi_key, amount)| json!({ "inchi_key": inchi_key, "amount": amount }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn api() -> PricingApi {
        MculeClient::with_config(
            ClientConfig::ultimate("secret").with_base_url("https://mcule.test"),
        )
        .unwrap()
        .pricing()
    }

    #[test]
    fn test_single_request_uses_one_amount() {
        let req = api()
            .single_request(&["KEY-A", "KEY-B"], 5, Currency::Eur, true)
            .unwrap();

        assert_eq!(req.url, "https://mcule.test/api/v1/pricing/");
        assert_eq!(
            req.body,
            Some(json!({
                "compounds": [
                    {"inchi_key": "KEY-A", "amount": 5},
                    {"inchi_key": "KEY-B", "amount": 5},
                ],
                "amount": 5,
                "currency": "EUR",
                "individual": true,
            }))
        );
    }

    #[test]
    fn test_multi_request_pairs_amounts() {
        let req = api()
            .multi_request(&["KEY-A", "KEY-B"], &[1, 10], Currency::Usd, false)
            .unwrap();

        assert_eq!(
            req.body,
            Some(json!({
                "compounds": [
                    {"inchi_key": "KEY-A", "amount": 1},
                    {"inchi_key": "KEY-B", "amount": 10},
                ],
                "currency": "USD",
                "individual": false,
            }))
        );
    }

    #[test]
    fn test_compounds_truncates_to_shorter_list() {
        let pairs = compounds(&["KEY-A", "KEY-B", "KEY-C"], &[1, 2]);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1], json!({"inchi_key": "KEY-B", "amount": 2}));
    }

    #[test]
    fn test_pricing_unavailable_on_standard() {
        let api = MculeClient::with_config(
            ClientConfig::standard("secret").with_base_url("https://mcule.test"),
        )
        .unwrap()
        .pricing();

        assert!(api
            .price_search_single(&["KEY-A"], 1, Currency::Usd, false)
            .is_err());
    }
}
