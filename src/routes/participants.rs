use axum::{extract::State, response::Redirect, routing::get, Json, Router};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppError, models::participant::Participant, routes::extract::AppPath,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/participants/:participant_id", get(participant))
        .route("/participants/:participant_id/confirm", get(confirm))
}

#[derive(Serialize)]
struct ParticipantDetails {
    participant: Participant,
}

async fn participant(
    State(state): State<AppState>,
    AppPath(participant_id): AppPath<Uuid>,
) -> Result<Json<ParticipantDetails>, AppError> {
    let participant = state.trips.get_participant(participant_id).await?;
    Ok(Json(ParticipantDetails { participant }))
}

async fn confirm(
    State(state): State<AppState>,
    AppPath(participant_id): AppPath<Uuid>,
) -> Result<Redirect, AppError> {
    let outcome = state.trips.confirm_participant(participant_id).await?;
    let target = state
        .config
        .trip_page_url(&outcome.trip_id().to_string());
    Ok(Redirect::to(&target))
}
