use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use leadgen_db::CompanyRow;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct CompaniesQuery {
    pub limit: Option<i64>,
}

/// A saved company, as listed back to callers.
#[derive(Debug, Serialize)]
pub(super) struct SavedCompanyItem {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CompanyRow> for SavedCompanyItem {
    fn from(row: CompanyRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            phone: row.phone,
            website: row.website,
            email: row.email,
            description: row.description,
            keywords: row.keywords,
            created_at: row.created_at,
        }
    }
}

pub(super) async fn list_companies(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CompaniesQuery>,
) -> Result<Json<Vec<SavedCompanyItem>>, ApiError> {
    let limit = normalize_limit(query.limit);
    let rows = leadgen_db::list_recent_companies(&state.pool, limit)
        .await
        .map_err(|e| map_db_error(&req_id.0, &e))?;

    Ok(Json(rows.into_iter().map(SavedCompanyItem::from).collect()))
}
