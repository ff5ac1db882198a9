use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::activity::{DayPlan, NewActivity},
    routes::extract::{AppJson, AppPath},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/trips/:trip_id/activities",
        post(create_activity).get(activities),
    )
}

#[derive(Deserialize)]
struct ActivityBody {
    title: String,
    occurs_at: String,
}

#[derive(Serialize)]
struct ActivityCreated {
    #[serde(rename = "activityId")]
    activity_id: Uuid,
}

async fn create_activity(
    State(state): State<AppState>,
    AppPath(trip_id): AppPath<Uuid>,
    AppJson(body): AppJson<ActivityBody>,
) -> Result<(StatusCode, Json<ActivityCreated>), AppError> {
    let activity = NewActivity::new(&body.title, &body.occurs_at)?;
    let activity_id = state.trips.create_activity(trip_id, activity).await?;
    Ok((StatusCode::CREATED, Json(ActivityCreated { activity_id })))
}

#[derive(Serialize)]
struct ActivityDays {
    activities: Vec<DayPlan>,
}

async fn activities(
    State(state): State<AppState>,
    AppPath(trip_id): AppPath<Uuid>,
) -> Result<Json<ActivityDays>, AppError> {
    let activities = state.trips.get_activities(trip_id).await?;
    Ok(Json(ActivityDays { activities }))
}
