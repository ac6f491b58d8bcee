use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::visits::{RecordVisitRequest, VisitRecorded},
    error::AppResult,
    response::ApiResponse,
    services::visit_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(record_visit))
}

#[utoipa::path(
    post,
    path = "/api/visits",
    request_body = RecordVisitRequest,
    responses(
        (status = 200, description = "Client resolved and visit appended", body = ApiResponse<VisitRecorded>),
        (status = 422, description = "Invalid device traits"),
    ),
    tag = "Visits"
)]
pub async fn record_visit(
    State(state): State<AppState>,
    Json(payload): Json<RecordVisitRequest>,
) -> AppResult<Json<ApiResponse<VisitRecorded>>> {
    let resp = visit_service::record_visit(&state, payload).await?;
    Ok(Json(resp))
}
