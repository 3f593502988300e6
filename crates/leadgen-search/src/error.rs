use leadgen_core::RequestError;
use leadgen_places::PlacesError;
use thiserror::Error;

/// Failures that abort a search and reach the caller.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A required secret or setting is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The caller sent unusable input.
    #[error("invalid request: {0}")]
    Validation(#[from] RequestError),

    /// The mandatory text search failed or returned an unusable shape.
    #[error("upstream provider error: {0}")]
    Upstream(#[from] PlacesError),
}

/// A single place that could not be turned into a company. Logged, never raised.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("place lookup failed: {0}")]
    Places(#[from] PlacesError),

    #[error("place has no {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] leadgen_db::DbError),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity provider HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("identity provider response has no user id")]
    MissingUserId,

    #[error("invalid identity provider URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Search-history bookkeeping failed. Logged, never raised.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("identity resolution failed: {0}")]
    Identity(#[from] IdentityError),

    #[error("history insert failed: {0}")]
    Persist(#[from] StoreError),
}
