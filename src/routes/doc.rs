use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse},
        metrics::{DashboardCounts, TopClient, TopClientList},
        products::{
            CreateProductRequest, ImageUploaded, ProductDetail, ProductList,
            SetAvailabilityRequest, SetFlagRequest, UpdateProductRequest,
        },
        recommend::{HeroBanner, RecommendationSource, ShakerRequest, ShakerResponse},
        reviews::{CreateReviewRequest, ReviewList},
        visits::{DeviceTraits, RecordVisitRequest, VisitRecorded},
    },
    models::{AdminProfile, Availability, Product, Review, ReviewSummary, WeatherContext},
    mood::{Atmosphere, Effect, MoodTag},
    response::{ApiResponse, Meta},
    routes::{admin, auth, health, menu, params, recommend, visits},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        auth::login,
        auth::me,
        menu::list_menu,
        menu::list_categories,
        menu::get_product,
        menu::list_reviews,
        menu::create_review,
        visits::record_visit,
        recommend::hero,
        recommend::preview,
        recommend::shaker,
        admin::list_inventory,
        admin::create_product,
        admin::update_product,
        admin::delete_product,
        admin::set_availability,
        admin::set_featured,
        admin::set_active,
        admin::generate_trivia,
        admin::upload_image,
        admin::metrics_summary,
        admin::top_clients,
        admin::list_reviews,
        admin::delete_review
    ),
    components(
        schemas(
            AdminProfile,
            Availability,
            Product,
            Review,
            ReviewSummary,
            WeatherContext,
            MoodTag,
            Atmosphere,
            Effect,
            LoginRequest,
            LoginResponse,
            CreateProductRequest,
            UpdateProductRequest,
            SetAvailabilityRequest,
            SetFlagRequest,
            ProductList,
            ProductDetail,
            ImageUploaded,
            CreateReviewRequest,
            ReviewList,
            DeviceTraits,
            RecordVisitRequest,
            VisitRecorded,
            HeroBanner,
            ShakerRequest,
            ShakerResponse,
            RecommendationSource,
            DashboardCounts,
            TopClient,
            TopClientList,
            recommend::PhrasePreview,
            health::HealthData,
            params::Pagination,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<ProductDetail>,
            ApiResponse<ReviewList>,
            ApiResponse<HeroBanner>,
            ApiResponse<ShakerResponse>,
            ApiResponse<DashboardCounts>,
            ApiResponse<TopClientList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Menu", description = "Customer menu, product detail and reviews"),
        (name = "Visits", description = "Client identity and visit tracking"),
        (name = "Recommendations", description = "Hero banner and flavor shaker"),
        (name = "Admin", description = "Inventory, metrics and review moderation"),
        (name = "Auth", description = "Admin session"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
