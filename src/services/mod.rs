pub mod auth_service;
pub mod metrics_service;
pub mod product_service;
pub mod recommend_service;
pub mod review_service;
pub mod visit_service;
