//! Database operations for the `search_history` table.

use chrono::{DateTime, Utc};
use leadgen_core::SearchHistoryItem;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `search_history` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SearchHistoryRow {
    pub id: i64,
    pub user_id: String,
    pub keywords: Vec<String>,
    pub location: Option<String>,
    pub results_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<SearchHistoryRow> for SearchHistoryItem {
    fn from(row: SearchHistoryRow) -> Self {
        SearchHistoryItem {
            id: row.id,
            keywords: row.keywords,
            location: row.location,
            results_count: row.results_count,
            created_at: row.created_at,
        }
    }
}

/// Record one completed search for `user_id`. `created_at` is set by the server.
///
/// # Errors
///
/// Returns [`DbError::OutOfRange`] if `results_count` does not fit the
/// column, or [`DbError::Sqlx`] if the insert fails.
pub async fn insert_search_history(
    pool: &PgPool,
    user_id: &str,
    keywords: &[String],
    location: Option<&str>,
    results_count: usize,
) -> Result<i64, DbError> {
    let count = i32::try_from(results_count).map_err(|_| DbError::OutOfRange {
        field: "results_count",
        value: results_count,
    })?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO search_history (user_id, keywords, location, results_count) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id",
    )
    .bind(user_id)
    .bind(keywords)
    .bind(location)
    .bind(count)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// List one user's searches, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_search_history(
    pool: &PgPool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<SearchHistoryRow>, DbError> {
    let rows = sqlx::query_as::<_, SearchHistoryRow>(
        "SELECT id, user_id, keywords, location, results_count, created_at \
         FROM search_history \
         WHERE user_id = $1 \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
