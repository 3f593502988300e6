//! HTTP client for the places provider.
//!
//! Wraps `reqwest` with the provider's URL conventions: the API key travels
//! as a `key` query parameter and text search takes one free-text `query`.

use std::time::Duration;

use leadgen_core::{encode_component, SearchRequest};
use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::types::{DetailsResponse, PlaceDetails, TextSearchResponse};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Field selection sent with every detail lookup.
pub const DETAIL_FIELDS: &str = "name,formatted_address,formatted_phone_number,website,types";

/// Client for the places text-search and place-details endpoints.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for PlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl PlacesClient {
    /// Creates a client pointed at the production provider.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::MissingApiKey`] if `api_key` is blank, or
    /// [`PlacesError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::MissingApiKey`] if `api_key` is blank,
    /// [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse, or
    /// [`PlacesError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(PlacesError::MissingApiKey);
        }

        let base_url = base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url).map_err(|e| PlacesError::InvalidBaseUrl {
            base_url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("leadgen/0.1 (company-search)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Runs a text search for the request's composed query.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body is not JSON.
    /// - [`PlacesError::MissingResults`] if the body has no `results` array,
    ///   even when the HTTP call itself succeeded.
    pub async fn text_search(
        &self,
        request: &SearchRequest,
    ) -> Result<TextSearchResponse, PlacesError> {
        let url = self.text_search_url(request)?;
        tracing::debug!(query = %request.composed_query(), "places text search");
        let mut body = self.request_json(url).await?;

        let status = body
            .get("status")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned);
        let error_message = body
            .get("error_message")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned);

        let results = match body.get_mut("results").map(serde_json::Value::take) {
            Some(serde_json::Value::Array(items)) => items,
            _ => {
                return Err(PlacesError::MissingResults {
                    status: status.unwrap_or_else(|| "none".to_owned()),
                })
            }
        };

        if let Some(ref s) = status {
            if s != "OK" && s != "ZERO_RESULTS" {
                tracing::warn!(
                    status = %s,
                    error_message = error_message.as_deref().unwrap_or(""),
                    "places text search returned non-OK status"
                );
            }
        }

        Ok(TextSearchResponse {
            status,
            error_message,
            results,
        })
    }

    /// Fetches [`DETAIL_FIELDS`] for one place.
    ///
    /// A response without a `result` object yields empty details.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        let url = self.details_url(place_id)?;
        let body = self.request_json(url).await?;
        let envelope: DetailsResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("details(place_id={place_id})"),
                source: e,
            })?;
        Ok(envelope.result.unwrap_or_default())
    }

    /// Builds the text-search URL.
    ///
    /// Assembled by hand because the location qualifier's `+` separators must
    /// reach the provider unescaped.
    pub(crate) fn text_search_url(&self, request: &SearchRequest) -> Result<Url, PlacesError> {
        let raw = format!(
            "{}/textsearch/json?query={}&key={}",
            self.base_url,
            request.encoded_query(),
            encode_component(&self.api_key)
        );
        Url::parse(&raw).map_err(|e| PlacesError::InvalidBaseUrl {
            base_url: self.base_url.clone(),
            reason: e.to_string(),
        })
    }

    pub(crate) fn details_url(&self, place_id: &str) -> Result<Url, PlacesError> {
        let mut url = Url::parse(&format!("{}/details/json", self.base_url)).map_err(|e| {
            PlacesError::InvalidBaseUrl {
                base_url: self.base_url.clone(),
                reason: e.to_string(),
            }
        })?;
        url.query_pairs_mut()
            .append_pair("place_id", place_id)
            .append_pair("fields", DETAIL_FIELDS)
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the body as JSON.
    async fn request_json(&self, url: Url) -> Result<serde_json::Value, PlacesError> {
        let context = self.redacted(&url);
        // reqwest errors embed the request URL, which carries the API key.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let response = response
            .error_for_status()
            .map_err(reqwest::Error::without_url)?;
        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize { context, source: e })
    }

    /// The URL with the API key masked, for error contexts and logs.
    fn redacted(&self, url: &Url) -> String {
        url.as_str()
            .replace(&encode_component(&self.api_key), "[redacted]")
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
