use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Row returned by the `dashboard_counts()` function.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DashboardCounts {
    pub total_visits: i64,
    pub unique_clients: i64,
    pub visits_today: i64,
    pub total_reviews: i64,
    pub average_rating: Option<f64>,
    pub active_products: i64,
    pub sold_out_products: i64,
}

/// Row returned by the `top_clients(limit)` function.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TopClient {
    pub client_id: Uuid,
    pub visit_count: i64,
    pub last_visit: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TopClientList {
    #[schema(value_type = Vec<TopClient>)]
    pub items: Vec<TopClient>,
}
