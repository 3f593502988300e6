//! Company search: one keyword/location query in, a normalized company list out.
//!
//! [`CompanySearch`] runs the provider text search, enriches each hit with a
//! detail lookup, and records companies and search history as best-effort
//! side effects through the [`CompanyStore`] and [`IdentityResolver`] seams.

pub mod aggregator;
pub mod error;
pub mod identity;
pub mod store;

pub use aggregator::{CompanySearch, MAX_PLACES};
pub use error::{EnrichmentError, HistoryError, IdentityError, SearchError, StoreError};
pub use identity::{bearer_token, AuthClient, IdentityResolver};
pub use store::{CompanyStore, NoopStore, PgStore};
