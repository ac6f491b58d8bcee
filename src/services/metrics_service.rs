use crate::{
    dto::metrics::{DashboardCounts, TopClient, TopClientList},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    response::ApiResponse,
    routes::params::TopClientsQuery,
    state::AppState,
};

// Both aggregates are computed by database functions; nothing is recounted here.

pub async fn dashboard_counts(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<DashboardCounts>> {
    ensure_admin(user)?;
    let counts = sqlx::query_as::<_, DashboardCounts>("SELECT * FROM dashboard_counts()")
        .fetch_one(&state.pool)
        .await?;
    Ok(ApiResponse::success("Dashboard", counts, None))
}

pub async fn top_clients(
    state: &AppState,
    user: &AuthUser,
    query: TopClientsQuery,
) -> AppResult<ApiResponse<TopClientList>> {
    ensure_admin(user)?;
    let items = sqlx::query_as::<_, TopClient>("SELECT * FROM top_clients($1)")
        .bind(query.normalized_limit())
        .fetch_all(&state.pool)
        .await?;
    Ok(ApiResponse::success("Top clients", TopClientList { items }, None))
}
