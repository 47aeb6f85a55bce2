//! The validation entry point and access-flag lookup.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use serde::Serialize;

use wicket_common::constants::headers::X_VISITOR_ID;
use wicket_common::{ValidateRequest, ValidateResponse};

use crate::state::AppState;

/// Visitor identity, supplied by the fronting layer. A missing or empty
/// header is a caller bug, not a gate outcome.
fn visitor_id(headers: &HeaderMap) -> Result<&str, StatusCode> {
    headers
        .get(X_VISITOR_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(StatusCode::BAD_REQUEST)
}

/// Validate submitted answers for a gated article
pub async fn validate_answers(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, StatusCode> {
    let visitor = visitor_id(&headers)?;

    if request.slug.is_empty() || request.question_set_id.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let response = state
        .validator
        .validate(&state.store, visitor, &request)
        .await;

    Ok(Json(response))
}

#[derive(Serialize)]
pub struct AccessResponse {
    slug: String,
    granted: bool,
}

/// Has this visitor already passed the gate for a slug?
pub async fn access_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Result<Json<AccessResponse>, StatusCode> {
    let visitor = visitor_id(&headers)?;

    let granted = state
        .validator
        .is_granted(&state.store, visitor, &slug)
        .await
        .map_err(|err| StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR))?;

    Ok(Json(AccessResponse { slug, granted }))
}
