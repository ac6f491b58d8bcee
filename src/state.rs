use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn},
    integrations::{ai::AiClient, storage::ImageBucket, weather::WeatherClient},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub ai: AiClient,
    pub weather: WeatherClient,
    pub bucket: ImageBucket,
}
