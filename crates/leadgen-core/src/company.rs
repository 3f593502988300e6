use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

static SCHEME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("valid scheme regex"));
static WWW_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^www\.").expect("valid www regex"));

/// A normalized company contact record, returned to callers and persisted.
///
/// `email` is never observed data. It is a `contact@<host>` guess built from
/// `website`, present exactly when `website` is, and flagged through
/// `email_inferred`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub email_inferred: bool,
}

impl Company {
    /// Builds a company and derives its contact email from `website`.
    #[must_use]
    pub fn new(
        name: String,
        address: Option<String>,
        phone: Option<String>,
        website: Option<String>,
        description: Option<String>,
    ) -> Self {
        let email = website.as_deref().map(derive_contact_email);
        Self {
            name,
            address,
            phone,
            website,
            email_inferred: email.is_some(),
            email,
            description,
        }
    }
}

/// A persisted record of one search made by an identified caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistoryItem {
    pub id: i64,
    pub keywords: Vec<String>,
    pub location: Option<String>,
    pub results_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Guesses a contact address for a website: `contact@` followed by the
/// website with a leading `http://`/`https://` and a leading `www.` removed.
///
/// Nothing past the prefixes is touched, so a path in `website` ends up in
/// the address as well.
#[must_use]
pub fn derive_contact_email(website: &str) -> String {
    let without_scheme = SCHEME_PREFIX.replace(website, "");
    let host = WWW_PREFIX.replace(&without_scheme, "");
    format!("contact@{host}")
}

/// Returns the first candidate that is present and not blank.
pub fn first_present<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}
