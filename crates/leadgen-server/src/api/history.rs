use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Extension, Json,
};
use leadgen_core::SearchHistoryItem;
use leadgen_search::{bearer_token, IdentityResolver};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct HistoryQuery {
    pub limit: Option<i64>,
}

/// `GET /api/v1/search-history`: the calling user's searches, newest first.
pub(super) async fn list_search_history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<SearchHistoryItem>>, ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;

    let user_id = state
        .search
        .identity()
        .resolve(token)
        .await
        .map_err(|e| {
            tracing::error!(request_id = %req_id.0, error = %e, "identity resolution failed");
            ApiError::new(StatusCode::BAD_GATEWAY, "identity provider error")
        })?
        .ok_or_else(|| ApiError::unauthorized("bearer token does not identify a user"))?;

    let limit = normalize_limit(query.limit);
    let rows = leadgen_db::list_search_history(&state.pool, &user_id, limit)
        .await
        .map_err(|e| map_db_error(&req_id.0, &e))?;

    Ok(Json(rows.into_iter().map(SearchHistoryItem::from).collect()))
}
