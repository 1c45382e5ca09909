//! Live tests against the real MCule API
//!
//! Run with `--features integration` and `MCULE_API_TOKEN` set. Tests skip
//! themselves when the token is missing.

#![cfg(feature = "integration")]

use mcule_api_client::{ApiVariant, MculeClient, Outcome};

fn live_client(variant: ApiVariant) -> Option<MculeClient> {
    match MculeClient::from_env(variant) {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping live test: {e}");
            None
        }
    }
}

#[test]
fn test_live_single_query() {
    let Some(client) = live_client(ApiVariant::Standard) else {
        return;
    };

    match client.search().single_query("CCO").unwrap() {
        Outcome::Success(payload) => assert!(payload.response.is_object()),
        Outcome::Failed(failure) => panic!("lookup failed with HTTP {}", failure.status),
    }
}

#[test]
fn test_live_ultimate_exact_search() {
    let Some(client) = live_client(ApiVariant::Ultimate) else {
        return;
    };

    let outcome = client.search().exact_search("CCO").unwrap();
    if let Outcome::Success(hit) = outcome {
        assert!(hit.compound_id.starts_with("MCULE-"));
    }
}
