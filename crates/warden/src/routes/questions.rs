//! Client-facing question listing.
//!
//! Returns the redacted view of a question set: the encrypted reference
//! answers and comparison flags never leave the server.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use wicket_common::ClientQuestion;

use crate::state::AppState;

#[derive(Serialize)]
pub struct QuestionSetResponse {
    set_id: String,
    questions: Vec<ClientQuestion>,
}

/// List the questions of a set, without answers
pub async fn get_questions(
    State(state): State<AppState>,
    Path(set_id): Path<String>,
) -> Result<Json<QuestionSetResponse>, StatusCode> {
    let Some(set) = state.catalog.get(&set_id) else {
        return Err(StatusCode::NOT_FOUND);
    };

    Ok(Json(QuestionSetResponse {
        set_id,
        questions: set.questions.iter().map(ClientQuestion::from).collect(),
    }))
}
