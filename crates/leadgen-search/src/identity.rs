//! Bearer token to user id resolution.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::error::IdentityError;

/// Exchanges a bearer token for a user id.
///
/// `Ok(None)` means the token was understood but names no user (expired,
/// revoked, or resolution disabled).
pub trait IdentityResolver: Send + Sync {
    fn resolve(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<String>, IdentityError>> + Send;
}

/// A missing resolver resolves nobody.
impl<T: IdentityResolver> IdentityResolver for Option<T> {
    async fn resolve(&self, token: &str) -> Result<Option<String>, IdentityError> {
        match self {
            Some(inner) => inner.resolve(token).await,
            None => Ok(None),
        }
    }
}

/// Extracts the token from an `authorization` header value.
///
/// A `Bearer ` prefix is stripped when present; a bare value is taken as the
/// token itself. Blank input yields `None`.
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    (!token.is_empty()).then_some(token)
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    #[serde(default)]
    id: Option<String>,
}

/// Client for the hosted auth service's `GET /auth/v1/user` endpoint.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    user_url: Url,
    service_key: String,
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("user_url", &self.user_url.as_str())
            .field("service_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl AuthClient {
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidUrl`] if `base_url` does not parse, or
    /// [`IdentityError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(base_url: &str, service_key: &str, timeout_secs: u64) -> Result<Self, IdentityError> {
        let raw = format!("{}/auth/v1/user", base_url.trim_end_matches('/'));
        let user_url = Url::parse(&raw).map_err(|e| IdentityError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("leadgen/0.1 (company-search)")
            .build()?;

        Ok(Self {
            client,
            user_url,
            service_key: service_key.to_owned(),
        })
    }

    /// Builds a client when both settings are configured, otherwise `None`.
    ///
    /// # Errors
    ///
    /// See [`AuthClient::new`].
    pub fn from_config(config: &leadgen_core::AppConfig) -> Result<Option<Self>, IdentityError> {
        match (config.auth_url.as_deref(), config.auth_service_key.as_deref()) {
            (Some(url), Some(key)) => Self::new(url, key, config.places_timeout_secs).map(Some),
            _ => Ok(None),
        }
    }
}

impl IdentityResolver for AuthClient {
    async fn resolve(&self, token: &str) -> Result<Option<String>, IdentityError> {
        let response = self
            .client
            .get(self.user_url.clone())
            .bearer_auth(token)
            .header("apikey", &self.service_key)
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Ok(None);
        }

        let user: UserResponse = response.error_for_status()?.json().await?;
        match user.id.filter(|id| !id.is_empty()) {
            Some(id) => Ok(Some(id)),
            None => Err(IdentityError::MissingUserId),
        }
    }
}
