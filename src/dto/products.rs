use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Availability, Product, ReviewSummary};

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: i64,
    #[validate(length(min = 1, max = 60, message = "category is required"))]
    pub category: String,
    #[serde(default)]
    pub featured: bool,
    pub availability: Option<Availability>,
    #[validate(length(max = 2000))]
    pub trivia: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 120, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: Option<i64>,
    #[validate(length(min = 1, max = 60, message = "category must not be empty"))]
    pub category: Option<String>,
    #[validate(length(max = 2000))]
    pub trivia: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SetAvailabilityRequest {
    pub availability: Availability,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SetFlagRequest {
    pub value: bool,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductDetail {
    pub product: Product,
    pub reviews: ReviewSummary,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImageUploaded {
    pub url: String,
}
