use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod doc;
pub mod health;
pub mod menu;
pub mod params;
pub mod recommend;
pub mod visits;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/menu", menu::router())
        .nest("/visits", visits::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .merge(recommend::router())
}
