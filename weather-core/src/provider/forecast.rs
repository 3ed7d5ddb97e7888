use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    config::Config,
    context::RunContext,
    error::{Operation, ProviderError},
    model::{Quantity, WeatherMeasurement},
    provider::{
        WeatherProvider, get_json, http_client,
        normalize::{Rules, normalize},
    },
};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
precipitation,cloud_cover,surface_pressure,wind_speed_10m,wind_direction_10m,wind_gusts_10m";

/// Current conditions from the Open-Meteo forecast API (metric units).
#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    http: Client,
    base_url: String,
}

impl OpenMeteoForecast {
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: http_client(request_timeout)?,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(&config.forecast_url, config.request_timeout())
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_units: CurrentUnits,
    current: Current,
}

#[derive(Debug, Deserialize)]
struct CurrentUnits {
    temperature_2m: String,
    relative_humidity_2m: String,
    apparent_temperature: String,
    precipitation: String,
    cloud_cover: String,
    surface_pressure: String,
    wind_speed_10m: String,
    wind_direction_10m: String,
    wind_gusts_10m: String,
}

#[derive(Debug, Deserialize)]
struct Current {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    precipitation: f64,
    cloud_cover: f64,
    surface_pressure: f64,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
    wind_gusts_10m: f64,
}

impl From<ForecastResponse> for WeatherMeasurement {
    fn from(r: ForecastResponse) -> Self {
        let (c, u) = (r.current, r.current_units);
        WeatherMeasurement {
            temperature: Quantity::new(c.temperature_2m, u.temperature_2m),
            relative_humidity: Quantity::new(c.relative_humidity_2m, u.relative_humidity_2m),
            apparent_temperature: Quantity::new(c.apparent_temperature, u.apparent_temperature),
            precipitation: Quantity::new(c.precipitation, u.precipitation),
            cloud_cover: Quantity::new(c.cloud_cover, u.cloud_cover),
            surface_pressure: Quantity::new(c.surface_pressure, u.surface_pressure),
            wind_speed: Quantity::new(c.wind_speed_10m, u.wind_speed_10m),
            wind_direction: Quantity::new(c.wind_direction_10m, u.wind_direction_10m),
            wind_gusts: Quantity::new(c.wind_gusts_10m, u.wind_gusts_10m),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoForecast {
    async fn current_weather(
        &self,
        ctx: &RunContext,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherMeasurement, ProviderError> {
        let url = format!("{}/forecast", self.base_url.trim_end_matches('/'));
        let (lat, lon) = (latitude.to_string(), longitude.to_string());

        debug!(
            latitude,
            longitude,
            remaining_ms = ctx.remaining().as_millis() as u64,
            "fetching current weather"
        );

        let parsed: ForecastResponse = get_json(
            &self.http,
            ctx,
            url,
            &[
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                ("current", CURRENT_FIELDS),
            ],
        )
        .await
        .map_err(|f| normalize(Operation::Weather, f, &Rules::WEATHER))?;

        info!(latitude, longitude, "current weather fetched");
        Ok(parsed.into())
    }
}
