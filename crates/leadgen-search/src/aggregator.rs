//! The search pipeline.
//!
//! 1. Validate the request (no network before this passes).
//! 2. Run the provider text search. Any failure here aborts the call.
//! 3. For the first [`MAX_PLACES`] hits, look up details, build a
//!    [`Company`], and save it. A failing place is skipped; a failing save
//!    keeps the company in the response.
//! 4. If the caller's token resolves to a user, save one history row.
//!
//! Detail lookups run through an ordered, bounded stream: up to
//! `detail_concurrency` places are in flight, results come back in provider
//! order, and each place's failure is contained in its own future.

use futures::{future, stream, StreamExt};
use leadgen_core::{first_present, AppConfig, Company, SearchRequest};
use leadgen_places::{Place, PlacesClient, PlacesError};

use crate::error::{EnrichmentError, HistoryError, SearchError};
use crate::identity::{bearer_token, IdentityResolver};
use crate::store::CompanyStore;

/// Provider hits processed per search. There is no pagination.
pub const MAX_PLACES: usize = 20;

pub struct CompanySearch<S, I> {
    places: PlacesClient,
    store: S,
    identity: I,
    detail_concurrency: usize,
}

impl<S, I> CompanySearch<S, I>
where
    S: CompanyStore,
    I: IdentityResolver,
{
    /// `detail_concurrency` below 1 is treated as 1 (sequential lookups).
    #[must_use]
    pub fn new(places: PlacesClient, store: S, identity: I, detail_concurrency: usize) -> Self {
        Self {
            places,
            store,
            identity,
            detail_concurrency: detail_concurrency.max(1),
        }
    }

    /// Builds the places client from `config` and wires in the collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Configuration`] if the places API key is blank
    /// or the provider base URL is unusable.
    pub fn from_config(config: &AppConfig, store: S, identity: I) -> Result<Self, SearchError> {
        let places = PlacesClient::with_base_url(
            &config.places_api_key,
            config.places_timeout_secs,
            &config.places_base_url,
        )
        .map_err(|e| SearchError::Configuration(e.to_string()))?;

        Ok(Self::new(places, store, identity, config.detail_concurrency))
    }

    #[must_use]
    pub fn identity(&self) -> &I {
        &self.identity
    }

    /// Runs one search.
    ///
    /// `authorization` is the raw `authorization` header value, if the caller
    /// sent one. It only affects whether a history row is written.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Validation`] if the request has no keywords.
    /// - [`SearchError::Upstream`] if the text search fails at the transport
    ///   or HTTP level, or its response has no `results` collection.
    pub async fn search(
        &self,
        request: &SearchRequest,
        authorization: Option<&str>,
    ) -> Result<Vec<Company>, SearchError> {
        request.validate()?;

        let keywords: Vec<String> = request.terms().map(str::to_owned).collect();
        tracing::info!(
            keywords = %keywords.join(", "),
            location = request.location().unwrap_or("worldwide"),
            "searching companies"
        );

        let response = self.places.text_search(request).await?;
        tracing::debug!(
            results = response.results.len(),
            "places text search returned"
        );

        let companies: Vec<Company> = stream::iter(response.places(MAX_PLACES))
            .map(|place| self.process_place(place, &keywords))
            .buffered(self.detail_concurrency)
            .filter_map(future::ready)
            .collect()
            .await;

        if let Some(header) = authorization {
            if let Err(e) = self.record_history(request, header, companies.len()).await {
                tracing::warn!(error = %e, "failed to store search history");
            }
        }

        tracing::info!(companies = companies.len(), "company search complete");
        Ok(companies)
    }

    /// Enriches and saves one place. `None` means the place was skipped.
    async fn process_place(
        &self,
        place: Result<Place, PlacesError>,
        keywords: &[String],
    ) -> Option<Company> {
        let company = match self.enrich(place).await {
            Ok(company) => company,
            Err(e) => {
                tracing::warn!(error = %e, "skipping place");
                return None;
            }
        };

        if let Err(e) = self.store.save_company(&company, keywords).await {
            tracing::warn!(company = %company.name, error = %e, "failed to save company");
        }

        Some(company)
    }

    async fn enrich(&self, place: Result<Place, PlacesError>) -> Result<Company, EnrichmentError> {
        let place = place?;
        let place_id = place
            .place_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(EnrichmentError::MissingField("place_id"))?;

        let details = self.places.place_details(place_id).await.inspect_err(|e| {
            tracing::debug!(place_id, error = %e, "place details lookup failed");
        })?;

        let name = first_present([place.name, details.name])
            .ok_or(EnrichmentError::MissingField("name"))?;
        let address = first_present([place.formatted_address, details.formatted_address]);
        let phone = first_present([details.formatted_phone_number]);
        let website = first_present([details.website]);
        let description = first_present([
            place.types.map(|t| t.join(", ")),
            details.types.map(|t| t.join(", ")),
        ]);

        Ok(Company::new(name, address, phone, website, description))
    }

    async fn record_history(
        &self,
        request: &SearchRequest,
        authorization: &str,
        results_count: usize,
    ) -> Result<(), HistoryError> {
        let Some(token) = bearer_token(authorization) else {
            return Ok(());
        };

        let Some(user_id) = self.identity.resolve(token).await? else {
            tracing::debug!("authorization did not resolve to a user; skipping history");
            return Ok(());
        };

        self.store
            .save_search_history(&user_id, request, results_count)
            .await?;
        Ok(())
    }
}
