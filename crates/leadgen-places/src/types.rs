//! Provider response shapes.
//!
//! Only the fields the aggregator consumes are modelled. Everything is
//! optional at this layer: the provider omits fields freely, and deciding
//! which absences are fatal for a place belongs to the caller.
//!
//! ### Text search
//! `{"status": "OK", "results": [{"name", "place_id", "formatted_address", "types": [..]}, ..]}`.
//! `results` is kept as raw JSON so one malformed entry cannot fail the
//! whole page; use [`TextSearchResponse::places`] to decode entries one by one.
//!
//! ### Place details
//! `{"status": "OK", "result": {"name", "formatted_address",
//! "formatted_phone_number", "website", "types"}}`. A missing `result`
//! decodes as empty details rather than an error.

use serde::Deserialize;

use crate::error::PlacesError;

/// Decoded text-search response.
#[derive(Debug, Clone)]
pub struct TextSearchResponse {
    /// Provider status string (`"OK"`, `"ZERO_RESULTS"`, `"REQUEST_DENIED"`, ...).
    pub status: Option<String>,
    pub error_message: Option<String>,
    pub results: Vec<serde_json::Value>,
}

impl TextSearchResponse {
    /// Decodes at most `limit` entries, in provider order.
    pub fn places(&self, limit: usize) -> impl Iterator<Item = Result<Place, PlacesError>> + '_ {
        self.results
            .iter()
            .take(limit)
            .enumerate()
            .map(|(idx, raw)| {
                Place::deserialize(raw).map_err(|source| PlacesError::Deserialize {
                    context: format!("textsearch result #{idx}"),
                    source,
                })
            })
    }
}

/// One text-search hit, before detail enrichment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    /// Provider category list, e.g. `["point_of_interest", "establishment"]`.
    #[serde(default)]
    pub types: Option<Vec<String>>,
}

/// Envelope of the place-details endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<PlaceDetails>,
}

/// Fields fetched per place to fill gaps in the search hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub types: Option<Vec<String>>,
}
