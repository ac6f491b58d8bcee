use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::products::{
        CreateProductRequest, ImageUploaded, ProductDetail, ProductList, UpdateProductRequest,
    },
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    integrations::storage::StorageError,
    middleware::auth::{AuthUser, ensure_admin},
    models::{Availability, Product},
    response::{ApiResponse, Meta},
    routes::params::{InventoryQuery, MenuQuery, ProductSortBy, SortOrder},
    services::review_service,
    state::AppState,
};

fn search_condition(q: Option<&String>) -> Option<Condition> {
    let search = q.map(|s| s.trim()).filter(|s| !s.is_empty())?;
    let pattern = format!("%{}%", escape_like(search));
    Some(
        Condition::any()
            .add(Expr::col(Column::Name).ilike(pattern.clone()))
            .add(Expr::col(Column::Description).ilike(pattern)),
    )
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub async fn list_menu(state: &AppState, query: MenuQuery) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(Column::Active.eq(true));

    if let Some(search) = search_condition(query.q.as_ref()) {
        condition = condition.add(search);
    }
    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(Column::Category.eq(category.clone()));
    }

    let finder = Products::find()
        .filter(condition)
        .order_by_desc(Column::Featured)
        .order_by_asc(Column::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    Ok(ApiResponse::paged("Menu", ProductList { items }, page, limit, total))
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<Vec<String>>> {
    let categories: Vec<String> = Products::find()
        .select_only()
        .column(Column::Category)
        .filter(Column::Active.eq(true))
        .distinct()
        .order_by_asc(Column::Category)
        .into_tuple()
        .all(&state.orm)
        .await?;
    Ok(ApiResponse::success("Categories", categories, None))
}

pub async fn get_menu_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ProductDetail>> {
    let product = find_product(&state.orm, id).await?;
    if !product.active {
        return Err(AppError::NotFound);
    }
    let reviews = review_service::summary(state, id).await?;
    Ok(ApiResponse::success(
        "Product",
        ProductDetail { product, reviews },
        None,
    ))
}

/// Active products that are not sold out.
pub async fn orderable_products(orm: &DatabaseConnection) -> AppResult<Vec<Product>> {
    let items = Products::find()
        .filter(Column::Active.eq(true))
        .filter(Column::Availability.eq(Availability::Available.as_str()))
        .order_by_asc(Column::Name)
        .all(orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();
    Ok(items)
}

pub async fn find_product(orm: &DatabaseConnection, id: Uuid) -> AppResult<Product> {
    Products::find_by_id(id)
        .one(orm)
        .await?
        .map(product_from_entity)
        .ok_or(AppError::NotFound)
}

pub async fn list_inventory(
    state: &AppState,
    user: &AuthUser,
    query: InventoryQuery,
) -> AppResult<ApiResponse<ProductList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if !query.include_inactive.unwrap_or(true) {
        condition = condition.add(Column::Active.eq(true));
    }
    if let Some(search) = search_condition(query.q.as_ref()) {
        condition = condition.add(search);
    }
    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(Column::Category.eq(category.clone()));
    }

    let sort_col = match query.sort_by.unwrap_or(ProductSortBy::CreatedAt) {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
        ProductSortBy::Category => Column::Category,
    };

    let mut finder = Products::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    Ok(ApiResponse::paged("Inventory", ProductList { items }, page, limit, total))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    payload.validate()?;

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        price: Set(payload.price),
        category: Set(payload.category.trim().to_string()),
        active: Set(true),
        availability: Set(payload
            .availability
            .unwrap_or(Availability::Available)
            .as_str()
            .to_string()),
        featured: Set(payload.featured),
        image_url: Set(None),
        trivia: Set(payload.trivia),
        created_at: NotSet,
    };
    let product = active.insert(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    payload.validate()?;

    let product = patch_product(state, user, id, "product_update", |active| {
        if let Some(name) = payload.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(description) = payload.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = payload.price {
            active.price = Set(price);
        }
        if let Some(category) = payload.category {
            active.category = Set(category.trim().to_string());
        }
        if let Some(trivia) = payload.trivia {
            active.trivia = Set(Some(trivia));
        }
    })
    .await?;

    Ok(ApiResponse::success("Updated", product, Some(Meta::empty())))
}

/// Products are never hard-deleted; deleting clears the active flag.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let product = patch_product(state, user, id, "product_delete", |active| {
        active.active = Set(false);
    })
    .await?;
    Ok(ApiResponse::success("Deleted", product, Some(Meta::empty())))
}

pub async fn set_availability(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    availability: Availability,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let product = patch_product(state, user, id, "product_availability", |active| {
        active.availability = Set(availability.as_str().to_string());
    })
    .await?;
    Ok(ApiResponse::success("Availability updated", product, None))
}

pub async fn set_featured(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    featured: bool,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let product = patch_product(state, user, id, "product_featured", |active| {
        active.featured = Set(featured);
    })
    .await?;
    Ok(ApiResponse::success("Featured updated", product, None))
}

pub async fn set_active(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    value: bool,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let product = patch_product(state, user, id, "product_active", |active| {
        active.active = Set(value);
    })
    .await?;
    Ok(ApiResponse::success("Active updated", product, None))
}

pub async fn generate_trivia(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let product = find_product(&state.orm, id).await?;

    let trivia = state
        .ai
        .generate_trivia(&product.name, product.description.as_deref().unwrap_or_default())
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, product_id = %id, "trivia generation failed");
            AppError::Upstream("trivia generation is unavailable right now".into())
        })?;

    let product = patch_product(state, user, id, "product_trivia", |active| {
        active.trivia = Set(Some(trivia));
    })
    .await?;
    Ok(ApiResponse::success("Trivia generated", product, None))
}

pub async fn upload_image(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    content_type: &str,
    bytes: &[u8],
) -> AppResult<ApiResponse<ImageUploaded>> {
    ensure_admin(user)?;
    find_product(&state.orm, id).await?;

    let url = state
        .bucket
        .put_product_image(id, content_type, bytes)
        .await
        .map_err(|err| match err {
            StorageError::Io(io) => AppError::Internal(io.into()),
            other => AppError::BadRequest(other.to_string()),
        })?;

    let stored_url = url.clone();
    patch_product(state, user, id, "product_image", |active| {
        active.image_url = Set(Some(stored_url));
    })
    .await?;

    Ok(ApiResponse::success("Image uploaded", ImageUploaded { url }, None))
}

async fn patch_product<F>(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    action: &str,
    apply: F,
) -> AppResult<Product>
where
    F: FnOnce(&mut ActiveModel),
{
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    apply(&mut active);
    let product = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        action,
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(product_from_entity(product))
}

pub fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        category: model.category,
        active: model.active,
        availability: Availability::from_column(&model.availability),
        featured: model.featured,
        image_url: model.image_url,
        trivia: model.trivia,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
