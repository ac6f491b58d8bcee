use std::{env, path::PathBuf, str::FromStr, time::Duration};

use chrono::FixedOffset;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub ai: AiConfig,
    pub weather: WeatherConfig,
    pub storage: StorageConfig,
    pub http_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub endpoint_url: String,
    /// Static shared secret sent in every request body.
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub utc_offset: FixedOffset,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub root: PathBuf,
    pub public_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_or("APP_PORT", 3000u16);

        let ai = AiConfig {
            endpoint_url: env::var("AI_ENDPOINT_URL")?,
            token: env::var("AI_TOKEN")?,
        };

        let offset_minutes = parse_or("LOCAL_UTC_OFFSET_MINUTES", 0i32);
        let utc_offset = FixedOffset::east_opt(offset_minutes * 60)
            .ok_or_else(|| anyhow::anyhow!("LOCAL_UTC_OFFSET_MINUTES out of range"))?;
        let weather = WeatherConfig {
            url: env::var("WEATHER_URL")
                .unwrap_or_else(|_| "https://api.open-meteo.com/v1/forecast".to_string()),
            latitude: parse_or("WEATHER_LATITUDE", 0.0f64),
            longitude: parse_or("WEATHER_LONGITUDE", 0.0f64),
            utc_offset,
        };

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://{host}:{port}"));
        let storage = StorageConfig {
            root: env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("storage")),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        };

        let http_timeout = Duration::from_secs(parse_or("HTTP_TIMEOUT_SECS", 8u64));

        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            ai,
            weather,
            storage,
            http_timeout,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or(default)
}
