use axum::{
    extract::State,
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        email::Email,
        participant::Participant,
        trip::{NewTrip, Trip, TripPlan},
    },
    routes::extract::{AppJson, AppPath},
    services::trips::TripConfirmation,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips", post(create_trip))
        .route("/trips/:trip_id", get(trip_details).put(update_trip))
        .route("/trips/:trip_id/confirm", get(confirm_trip))
        .route("/trips/:trip_id/invites", post(create_invite))
        .route("/trips/:trip_id/participants", get(participants))
}

#[derive(Deserialize)]
struct CreateTripBody {
    destination: String,
    starts_at: String,
    ends_at: String,
    owner_name: String,
    owner_email: String,
    #[serde(default, alias = "emails_to_invate")]
    emails_to_invite: Vec<String>,
}

#[derive(Serialize)]
struct TripCreated {
    #[serde(rename = "tripId")]
    trip_id: Uuid,
}

async fn create_trip(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateTripBody>,
) -> Result<(StatusCode, Json<TripCreated>), AppError> {
    let plan = TripPlan::parse(&body.destination, &body.starts_at, &body.ends_at)?;
    let new_trip = NewTrip::new(
        plan,
        &body.owner_name,
        &body.owner_email,
        &body.emails_to_invite,
    )?;
    let trip_id = state.trips.create_trip(new_trip).await?;
    Ok((StatusCode::CREATED, Json(TripCreated { trip_id })))
}

#[derive(Serialize)]
struct TripDetails {
    trip: Trip,
}

async fn trip_details(
    State(state): State<AppState>,
    AppPath(trip_id): AppPath<Uuid>,
) -> Result<Json<TripDetails>, AppError> {
    let trip = state.trips.get_trip_details(trip_id).await?;
    Ok(Json(TripDetails { trip }))
}

#[derive(Deserialize)]
struct UpdateTripBody {
    destination: String,
    starts_at: String,
    ends_at: String,
}

async fn update_trip(
    State(state): State<AppState>,
    AppPath(trip_id): AppPath<Uuid>,
    AppJson(body): AppJson<UpdateTripBody>,
) -> Result<Json<TripCreated>, AppError> {
    let plan = TripPlan::parse(&body.destination, &body.starts_at, &body.ends_at)?;
    let trip_id = state.trips.update_trip(trip_id, plan).await?;
    Ok(Json(TripCreated { trip_id }))
}

async fn confirm_trip(
    State(state): State<AppState>,
    AppPath(trip_id): AppPath<Uuid>,
) -> Result<Redirect, AppError> {
    match state.trips.confirm_trip(trip_id).await? {
        TripConfirmation::AlreadyConfirmed => debug!(%trip_id, "trip was already confirmed"),
        TripConfirmation::Confirmed(report) => debug!(%trip_id, ?report, "trip confirmed"),
    }
    let target = state.config.trip_page_url(&trip_id.to_string());
    Ok(Redirect::to(&target))
}

#[derive(Deserialize)]
struct InviteBody {
    email: String,
}

#[derive(Serialize)]
struct InviteCreated {
    #[serde(rename = "participantId")]
    participant_id: Uuid,
}

async fn create_invite(
    State(state): State<AppState>,
    AppPath(trip_id): AppPath<Uuid>,
    AppJson(body): AppJson<InviteBody>,
) -> Result<(StatusCode, Json<InviteCreated>), AppError> {
    let email = Email::parse(&body.email)?;
    let participant_id = state.trips.create_invite(trip_id, email).await?;
    Ok((StatusCode::CREATED, Json(InviteCreated { participant_id })))
}

#[derive(Serialize)]
struct ParticipantList {
    participants: Vec<Participant>,
}

async fn participants(
    State(state): State<AppState>,
    AppPath(trip_id): AppPath<Uuid>,
) -> Result<Json<ParticipantList>, AppError> {
    let participants = state.trips.get_participants(trip_id).await?;
    Ok(Json(ParticipantList { participants }))
}
