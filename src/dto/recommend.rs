use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    models::{Product, WeatherContext},
    mood::{Atmosphere, MoodTag},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct HeroBanner {
    pub weather: WeatherContext,
    pub mood: MoodTag,
    pub phrase: String,
    pub product: Option<Product>,
    pub atmosphere: Atmosphere,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct ShakerRequest {
    /// Flavors or free-text cravings picked in the shaker widget.
    #[validate(length(min = 1, max = 8, message = "pick between 1 and 8 flavors"))]
    pub cravings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    /// The AI returned an identifier of a menu product.
    Ai,
    /// The AI answer was resolved by the local matcher.
    Matched,
    /// Local pick among featured products.
    Fallback,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShakerResponse {
    pub product: Product,
    pub reason: Option<String>,
    pub source: RecommendationSource,
}
