use std::{sync::Arc, time::Duration};

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::{config::WeatherConfig, models::WeatherContext};

pub const DEFAULT_TEMPERATURE: f64 = 25.0;
pub const UNAVAILABLE: &str = "unavailable";

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: u16,
}

/// Reading from the provider before it is combined with the local clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub temperature: f64,
    pub code: u16,
}

#[derive(Clone)]
pub struct WeatherClient {
    inner: Arc<WeatherClientInner>,
}

struct WeatherClientInner {
    client: reqwest::Client,
    config: WeatherConfig,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig, timeout: Duration) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            inner: Arc::new(WeatherClientInner {
                client,
                config: config.clone(),
            }),
        })
    }

    pub async fn fetch(&self) -> Result<Reading, WeatherError> {
        let config = &self.inner.config;
        let response: ForecastResponse = self
            .inner
            .client
            .get(&config.url)
            .query(&[
                ("latitude", config.latitude.to_string()),
                ("longitude", config.longitude.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(Reading {
            temperature: response.current_weather.temperature,
            code: response.current_weather.weathercode,
        })
    }

    /// Weather for "now", never failing: provider errors fall back to
    /// defaults and the local clock.
    pub async fn current(&self, now: DateTime<Utc>) -> WeatherContext {
        let reading = match self.fetch().await {
            Ok(reading) => Some(reading),
            Err(err) => {
                tracing::warn!(error = %err, "weather lookup failed, using defaults");
                None
            }
        };
        context_at(now, self.inner.config.utc_offset, reading)
    }
}

pub fn context_at(
    now: DateTime<Utc>,
    offset: FixedOffset,
    reading: Option<Reading>,
) -> WeatherContext {
    let local = now.with_timezone(&offset);
    match reading {
        Some(reading) => WeatherContext {
            hour: local.hour(),
            minute: local.minute(),
            temperature: reading.temperature,
            is_raining: is_rain_code(reading.code),
            description: describe(reading.code).to_string(),
        },
        None => WeatherContext {
            hour: local.hour(),
            minute: local.minute(),
            temperature: DEFAULT_TEMPERATURE,
            is_raining: false,
            description: UNAVAILABLE.to_string(),
        },
    }
}

/// WMO weather interpretation codes for drizzle, rain, showers and storms.
pub fn is_rain_code(code: u16) -> bool {
    matches!(code, 51..=67 | 80..=82 | 95..=99)
}

pub fn describe(code: u16) -> &'static str {
    match code {
        0 => "clear sky",
        1..=3 => "partly cloudy",
        45 | 48 => "fog",
        51..=57 => "drizzle",
        61..=67 => "rain",
        71..=77 => "snow",
        80..=82 => "rain showers",
        85 | 86 => "snow showers",
        95..=99 => "thunderstorm",
        _ => "unknown",
    }
}
