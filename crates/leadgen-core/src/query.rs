//! Inbound search request and provider query composition.
//!
//! The provider takes a single free-text `query` parameter. Keywords are
//! space-joined and the location is appended as `+in+<location>`, where the
//! `+` characters are literal (they decode to spaces on the provider side)
//! and the location is percent-encoded on its own.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Characters left unescaped by a URI-component encoder.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Caller input rejected before any network call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("keywords are required")]
    MissingKeywords,
}

/// One search invocation: keywords plus an optional location scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl SearchRequest {
    #[must_use]
    pub fn new(keywords: Vec<String>, location: Option<String>) -> Self {
        Self { keywords, location }
    }

    /// Ensures at least one non-blank keyword is present.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::MissingKeywords`] if `keywords` is empty or
    /// holds only blank strings.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.terms().next().is_none() {
            return Err(RequestError::MissingKeywords);
        }
        Ok(())
    }

    /// Non-blank keywords, in caller order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.keywords
            .iter()
            .map(String::as_str)
            .filter(|k| !k.trim().is_empty())
    }

    /// Keywords joined with single spaces, before any encoding.
    #[must_use]
    pub fn query_text(&self) -> String {
        self.terms().collect::<Vec<_>>().join(" ")
    }

    /// The location, if present and not blank.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.trim().is_empty())
    }

    /// The `+in+<encoded location>` qualifier, or an empty string.
    #[must_use]
    pub fn location_qualifier(&self) -> String {
        self.location()
            .map(|l| format!("+in+{}", encode_component(l)))
            .unwrap_or_default()
    }

    /// Query text followed by the location qualifier, e.g.
    /// `"软件开发+in+%E5%8C%97%E4%BA%AC"`.
    #[must_use]
    pub fn composed_query(&self) -> String {
        format!("{}{}", self.query_text(), self.location_qualifier())
    }

    /// The value placed after `query=` in the provider URL: encoded query
    /// text followed by the location qualifier.
    #[must_use]
    pub fn encoded_query(&self) -> String {
        format!(
            "{}{}",
            encode_component(&self.query_text()),
            self.location_qualifier()
        )
    }
}

/// Percent-encodes `value` as a URI component (space becomes `%20`).
#[must_use]
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}
