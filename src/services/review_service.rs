use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::reviews::{CreateReviewRequest, ReviewList},
    entity::reviews::{ActiveModel, Column, Entity as Reviews, Model as ReviewModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Review, ReviewSummary},
    response::{ApiResponse, Meta},
    routes::params::{Pagination, ReviewQuery},
    services::product_service::find_product,
    state::AppState,
};

pub async fn summary(state: &AppState, product_id: Uuid) -> AppResult<ReviewSummary> {
    let (count, average_rating): (i64, Option<f64>) = sqlx::query_as(
        "SELECT count(*), avg(rating)::DOUBLE PRECISION FROM reviews WHERE product_id = $1",
    )
    .bind(product_id)
    .fetch_one(&state.pool)
    .await?;

    Ok(ReviewSummary {
        count,
        average_rating,
    })
}

pub async fn list_for_product(
    state: &AppState,
    product_id: Uuid,
    pagination: Pagination,
) -> AppResult<ApiResponse<ReviewList>> {
    let product = find_product(&state.orm, product_id).await?;
    if !product.active {
        return Err(AppError::NotFound);
    }
    list(state, Some(product_id), pagination).await
}

/// Reviews are immutable once submitted. The 12h-per-product limit lives in
/// the client (`client::session::ReviewThrottle`), not here.
pub async fn create_review(
    state: &AppState,
    product_id: Uuid,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    payload.validate()?;

    let product = find_product(&state.orm, product_id).await?;
    if !product.active {
        return Err(AppError::NotFound);
    }

    let review = ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        author_name: Set(payload.author_name.trim().to_string()),
        comment: Set(payload.comment.trim().to_string()),
        rating: Set(payload.rating),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(review_id = %review.id, %product_id, rating = review.rating, "review submitted");

    Ok(ApiResponse::success(
        "Thanks for your review",
        review_from_entity(review),
        Some(Meta::empty()),
    ))
}

pub async fn moderation_list(
    state: &AppState,
    user: &AuthUser,
    query: ReviewQuery,
) -> AppResult<ApiResponse<ReviewList>> {
    ensure_admin(user)?;
    list(state, query.product_id, query.pagination()).await
}

pub async fn delete_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Reviews::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        user.user_id,
        "review_delete",
        "reviews",
        serde_json::json!({ "review_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Review removed",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn list(
    state: &AppState,
    product_id: Option<Uuid>,
    pagination: Pagination,
) -> AppResult<ApiResponse<ReviewList>> {
    let (page, limit, offset) = pagination.normalize();
    let mut condition = Condition::all();
    if let Some(product_id) = product_id {
        condition = condition.add(Column::ProductId.eq(product_id));
    }

    let finder = Reviews::find()
        .filter(condition)
        .order_by_desc(Column::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(review_from_entity)
        .collect();

    Ok(ApiResponse::paged("Reviews", ReviewList { items }, page, limit, total))
}

fn review_from_entity(model: ReviewModel) -> Review {
    Review {
        id: model.id,
        product_id: model.product_id,
        author_name: model.author_name,
        comment: model.comment,
        rating: model.rating,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
