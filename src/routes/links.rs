use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::link::{Link, NewLink},
    routes::extract::{AppJson, AppPath},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/trips/:trip_id/links", post(create_link).get(links))
}

#[derive(Deserialize)]
struct LinkBody {
    title: String,
    url: String,
}

#[derive(Serialize)]
struct LinkCreated {
    #[serde(rename = "linkId")]
    link_id: Uuid,
}

async fn create_link(
    State(state): State<AppState>,
    AppPath(trip_id): AppPath<Uuid>,
    AppJson(body): AppJson<LinkBody>,
) -> Result<(StatusCode, Json<LinkCreated>), AppError> {
    let link = NewLink::new(&body.title, &body.url)?;
    let link_id = state.trips.create_link(trip_id, link).await?;
    Ok((StatusCode::CREATED, Json(LinkCreated { link_id })))
}

#[derive(Serialize)]
struct LinkList {
    links: Vec<Link>,
}

async fn links(
    State(state): State<AppState>,
    AppPath(trip_id): AppPath<Uuid>,
) -> Result<Json<LinkList>, AppError> {
    let links = state.trips.get_links(trip_id).await?;
    Ok(Json(LinkList { links }))
}
