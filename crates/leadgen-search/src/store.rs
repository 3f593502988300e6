//! Append-only sink for search results and history.

use std::future::Future;

use leadgen_core::{Company, SearchRequest};
use sqlx::PgPool;

use crate::error::StoreError;

/// Where a search writes its side effects.
///
/// Callers treat every method as best-effort: an `Err` is logged and the
/// search carries on.
pub trait CompanyStore: Send + Sync {
    /// Persist one company along with the keywords that found it.
    fn save_company(
        &self,
        company: &Company,
        keywords: &[String],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Persist one search made by `user_id`.
    fn save_search_history(
        &self,
        user_id: &str,
        request: &SearchRequest,
        results_count: usize,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Postgres-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CompanyStore for PgStore {
    async fn save_company(&self, company: &Company, keywords: &[String]) -> Result<(), StoreError> {
        leadgen_db::insert_company(&self.pool, company, keywords).await?;
        Ok(())
    }

    async fn save_search_history(
        &self,
        user_id: &str,
        request: &SearchRequest,
        results_count: usize,
    ) -> Result<(), StoreError> {
        let keywords: Vec<String> = request.terms().map(str::to_owned).collect();
        leadgen_db::insert_search_history(
            &self.pool,
            user_id,
            &keywords,
            request.location(),
            results_count,
        )
        .await?;
        Ok(())
    }
}

/// Discards everything. Used for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl CompanyStore for NoopStore {
    async fn save_company(&self, _company: &Company, _keywords: &[String]) -> Result<(), StoreError> {
        Ok(())
    }

    async fn save_search_history(
        &self,
        _user_id: &str,
        _request: &SearchRequest,
        _results_count: usize,
    ) -> Result<(), StoreError> {
        Ok(())
    }
}
