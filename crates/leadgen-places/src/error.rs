use thiserror::Error;

/// Errors returned by [`crate::PlacesClient`].
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure, or a non-2xx status from the provider.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The text-search response had no `results` collection.
    #[error("no results from places provider (status: {status})")]
    MissingResults { status: String },

    /// The API key was empty.
    #[error("places API key is not configured")]
    MissingApiKey,

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
