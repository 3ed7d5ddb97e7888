use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, IntoUrl};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    context::RunContext,
    error::ProviderError,
    model::{Location, WeatherMeasurement},
    provider::normalize::Failure,
};

pub mod forecast;
pub mod geocoding;
pub mod normalize;

pub use forecast::OpenMeteoForecast;
pub use geocoding::OpenMeteoGeocoding;

/// Resolves a place name to candidate locations, most relevant first.
///
/// Implementations make one outbound call per invocation, never retry, and
/// return an empty vector (not an error) when nothing matches.
#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn search(&self, ctx: &RunContext, query: &str) -> Result<Vec<Location>, ProviderError>;
}

/// Fetches current conditions for a coordinate pair.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(
        &self,
        ctx: &RunContext,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherMeasurement, ProviderError>;
}

pub(crate) fn http_client(request_timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(request_timeout).build()
}

/// One GET under the run context, decoded as JSON. Non-2xx is a failure.
pub(crate) async fn get_json<T, Q>(
    http: &Client,
    ctx: &RunContext,
    url: impl IntoUrl,
    query: &Q,
) -> Result<T, Failure>
where
    T: DeserializeOwned,
    Q: Serialize + ?Sized,
{
    let request = http.get(url).query(query);

    let body = ctx
        .guard(async {
            let res = request.send().await?;
            let status = res.status();
            let body = res.text().await?;
            if status.is_success() {
                Ok::<_, Failure>(body)
            } else {
                Err(Failure::Status { status, body })
            }
        })
        .await??;

    Ok(serde_json::from_str(&body)?)
}
