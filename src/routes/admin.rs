use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{HeaderMap, header},
    routing::{delete, get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        metrics::{DashboardCounts, TopClientList},
        products::{
            CreateProductRequest, ImageUploaded, ProductList, SetAvailabilityRequest,
            SetFlagRequest, UpdateProductRequest,
        },
        reviews::ReviewList,
    },
    error::AppResult,
    integrations::storage::MAX_IMAGE_BYTES,
    middleware::auth::AuthUser,
    models::Product,
    response::ApiResponse,
    routes::params::{InventoryQuery, ReviewQuery, TopClientsQuery},
    services::{metrics_service, product_service, review_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_inventory).post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/products/{id}/availability", patch(set_availability))
        .route("/products/{id}/featured", patch(set_featured))
        .route("/products/{id}/active", patch(set_active))
        .route("/products/{id}/trivia", post(generate_trivia))
        .route(
            "/products/{id}/image",
            put(upload_image).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES)),
        )
        .route("/metrics/summary", get(metrics_summary))
        .route("/metrics/top-clients", get(top_clients))
        .route("/reviews", get(list_reviews))
        .route("/reviews/{id}", delete(delete_review))
}

#[utoipa::path(
    get,
    path = "/api/admin/products",
    params(InventoryQuery),
    responses(
        (status = 200, description = "Inventory including inactive products", body = ApiResponse<ProductList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_inventory(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<InventoryQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_inventory(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<Product>),
        (status = 422, description = "Invalid fields"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::create_product(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<Product>),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Invalid fields"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::update_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deactivated (soft delete)", body = ApiResponse<Product>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::delete_product(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/products/{id}/availability",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = SetAvailabilityRequest,
    responses(
        (status = 200, description = "Availability updated", body = ApiResponse<Product>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn set_availability(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetAvailabilityRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::set_availability(&state, &user, id, payload.availability).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/products/{id}/featured",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = SetFlagRequest,
    responses(
        (status = 200, description = "Featured flag updated", body = ApiResponse<Product>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn set_featured(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetFlagRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::set_featured(&state, &user, id, payload.value).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/products/{id}/active",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = SetFlagRequest,
    responses(
        (status = 200, description = "Active flag updated", body = ApiResponse<Product>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn set_active(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetFlagRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::set_active(&state, &user, id, payload.value).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products/{id}/trivia",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Trivia generated and saved", body = ApiResponse<Product>),
        (status = 404, description = "Not Found"),
        (status = 502, description = "AI endpoint unavailable"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn generate_trivia(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::generate_trivia(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}/image",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body(content = Vec<u8>, content_type = "image/webp", description = "Pre-resized image"),
    responses(
        (status = 200, description = "Image stored, public URL returned", body = ApiResponse<ImageUploaded>),
        (status = 400, description = "Unsupported or empty image"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<ApiResponse<ImageUploaded>>> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let resp = product_service::upload_image(&state, &user, id, content_type, &body).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/metrics/summary",
    responses(
        (status = 200, description = "Server-computed dashboard counts", body = ApiResponse<DashboardCounts>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn metrics_summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardCounts>>> {
    let resp = metrics_service::dashboard_counts(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/metrics/top-clients",
    params(TopClientsQuery),
    responses(
        (status = 200, description = "Clients ranked by visits", body = ApiResponse<TopClientList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn top_clients(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TopClientsQuery>,
) -> AppResult<Json<ApiResponse<TopClientList>>> {
    let resp = metrics_service::top_clients(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/reviews",
    params(ReviewQuery),
    responses(
        (status = 200, description = "Reviews for moderation, newest first", body = ApiResponse<ReviewList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ReviewQuery>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::moderation_list(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/reviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review removed"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = review_service::delete_review(&state, &user, id).await?;
    Ok(Json(resp))
}
