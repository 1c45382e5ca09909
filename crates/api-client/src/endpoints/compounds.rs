//! Compound lookup endpoints (standard API)

use super::OK;
use crate::client::MculeClient;
use crate::error::ApiResult;
use crate::http::HttpRequest;
use crate::response::{DefaultOnSuccess, JsonPayload, Outcome};
use crate::routes::Route;

/// Compound lookup API interface
#[derive(Clone)]
pub struct CompoundsApi {
    client: MculeClient,
}

impl CompoundsApi {
    /// Create a new compounds API interface
    pub(crate) fn new(client: MculeClient) -> Self {
        Self { client }
    }

    /// Compound details
    ///
    /// GET /compound/<mcule_id>
    pub fn details(&self, mcule_id: &str) -> ApiResult<Outcome<JsonPayload>> {
        self.get(Route::CompoundDetails, &[("mcule_id", mcule_id)])
    }

    /// Compound by InChIKey
    ///
    /// GET /lookup/inchikey/<inchi_key>
    pub fn by_inchi_key(&self, inchi_key: &str) -> ApiResult<Outcome<JsonPayload>> {
        self.get(Route::InchiKeyLookup, &[("inchi_key", inchi_key)])
    }

    /// Supplier availability of a compound
    ///
    /// GET /compound/<mcule_id>/availability
    pub fn availability(&self, mcule_id: &str) -> ApiResult<Outcome<JsonPayload>> {
        self.get(Route::CompoundAvailability, &[("mcule_id", mcule_id)])
    }

    /// Price list of a compound
    ///
    /// GET /compound/<mcule_id>/prices
    pub fn prices(&self, mcule_id: &str) -> ApiResult<Outcome<JsonPayload>> {
        self.get(Route::CompoundPrices, &[("mcule_id", mcule_id)])
    }

    /// Downloadable database files
    ///
    /// GET /database-files
    pub fn database_files(&self) -> ApiResult<Outcome<JsonPayload>> {
        self.get(Route::DatabaseFiles, &[])
    }

    fn get(&self, route: Route, params: &[(&str, &str)]) -> ApiResult<Outcome<JsonPayload>> {
        let request = HttpRequest::get(self.client.url(route, params)?);
        self.client.execute(request, OK, &DefaultOnSuccess)
    }
}
