use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderMap},
    Extension, Json,
};
use leadgen_core::{Company, SearchRequest};
use leadgen_search::SearchError;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

/// `POST /api/v1/search-companies`. Responds with a bare JSON array of companies.
pub(super) async fn search_companies(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<Vec<Company>>, ApiError> {
    // Malformed bodies are caller errors, reported with the same `{error}` shape.
    let Json(request) = payload.map_err(|rejection| {
        ApiError::bad_request(format!("invalid request: {}", rejection.body_text()))
    })?;

    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());

    match state.search.search(&request, authorization).await {
        Ok(companies) => Ok(Json(companies)),
        Err(e) => {
            if matches!(e, SearchError::Validation(_)) {
                tracing::debug!(request_id = %req_id.0, error = %e, "rejected search request");
            } else {
                tracing::error!(request_id = %req_id.0, error = %e, "company search failed");
            }
            Err(ApiError::from(e))
        }
    }
}
