pub mod auth;
pub mod metrics;
pub mod products;
pub mod recommend;
pub mod reviews;
pub mod visits;
