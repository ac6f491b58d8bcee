use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    dto::recommend::{HeroBanner, ShakerRequest, ShakerResponse},
    error::AppResult,
    mood::MoodTag,
    response::ApiResponse,
    services::recommend_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/hero", get(hero))
        .route("/hero/preview", get(preview))
        .route("/shaker", post(shaker))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PreviewQuery {
    pub mood: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PhrasePreview {
    pub mood: MoodTag,
    pub template: String,
}

#[utoipa::path(
    get,
    path = "/api/hero",
    responses(
        (status = 200, description = "Weather-driven promotional banner", body = ApiResponse<HeroBanner>)
    ),
    tag = "Recommendations"
)]
pub async fn hero(State(state): State<AppState>) -> AppResult<Json<ApiResponse<HeroBanner>>> {
    let resp = recommend_service::hero_banner(&state, Utc::now()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/hero/preview",
    params(PreviewQuery),
    responses(
        (status = 200, description = "Random template for a mood tag; unknown tags use the standard bank", body = ApiResponse<PhrasePreview>)
    ),
    tag = "Recommendations"
)]
pub async fn preview(Query(query): Query<PreviewQuery>) -> Json<ApiResponse<PhrasePreview>> {
    let (mood, template) = recommend_service::mood_preview(&query.mood);
    Json(ApiResponse::success(
        "Preview",
        PhrasePreview {
            mood,
            template: template.to_string(),
        },
        None,
    ))
}

#[utoipa::path(
    post,
    path = "/api/shaker",
    request_body = ShakerRequest,
    responses(
        (status = 200, description = "Flavor recommendation", body = ApiResponse<ShakerResponse>),
        (status = 404, description = "Nothing on the menu can be recommended"),
        (status = 422, description = "Invalid cravings"),
    ),
    tag = "Recommendations"
)]
pub async fn shaker(
    State(state): State<AppState>,
    Json(payload): Json<ShakerRequest>,
) -> AppResult<Json<ApiResponse<ShakerResponse>>> {
    let resp = recommend_service::shake(&state, payload).await?;
    Ok(Json(resp))
}
