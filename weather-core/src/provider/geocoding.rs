use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    config::Config,
    context::RunContext,
    error::{Operation, ProviderError},
    model::Location,
    provider::{
        LocationProvider, get_json, http_client,
        normalize::{Rules, normalize},
    },
};

pub const DEFAULT_BASE_URL: &str = "https://geocoding-api.open-meteo.com/v1";

/// Result names are always requested in English.
const LANGUAGE: &str = "en";

/// Place-name search against the Open-Meteo geocoding API.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoding {
    http: Client,
    base_url: String,
    count: usize,
}

impl OpenMeteoGeocoding {
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: http_client(request_timeout)?,
            base_url: base_url.into(),
            count: 10,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let geocoding = Self::new(&config.geocoding_url, config.request_timeout())?;
        Ok(geocoding.with_count(config.max_results))
    }

    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

#[derive(Debug, Deserialize)]
struct GeoSearchResponse {
    #[serde(default)]
    results: Vec<GeoResult>,
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    id: i64,
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: String,
    admin1: Option<String>,
}

impl From<GeoResult> for Location {
    fn from(r: GeoResult) -> Self {
        Location {
            id: r.id,
            name: r.name,
            latitude: r.latitude,
            longitude: r.longitude,
            country: r.country,
            region: r.admin1.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl LocationProvider for OpenMeteoGeocoding {
    async fn search(&self, ctx: &RunContext, query: &str) -> Result<Vec<Location>, ProviderError> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let count = self.count.to_string();

        debug!(
            query,
            remaining_ms = ctx.remaining().as_millis() as u64,
            "searching locations"
        );

        let parsed: GeoSearchResponse = get_json(
            &self.http,
            ctx,
            url,
            &[
                ("name", query),
                ("count", count.as_str()),
                ("language", LANGUAGE),
                ("format", "json"),
            ],
        )
        .await
        .map_err(|f| normalize(Operation::Search, f, &Rules::SEARCH))?;

        let locations: Vec<Location> = parsed.results.into_iter().map(Location::from).collect();
        info!(
            query,
            candidates = locations.len(),
            "location search finished"
        );

        Ok(locations)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, net::SocketAddr};

    use axum::{Router, extract::Query, http::StatusCode, routing::get};

    use super::*;
    use crate::error::ErrorKind;

    async fn serve(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn client(addr: SocketAddr) -> OpenMeteoGeocoding {
        let base_url = format!("http://{addr}");
        let timeout = Duration::from_secs(5);
        OpenMeteoGeocoding::new(base_url, timeout).unwrap()
    }

    fn ctx() -> RunContext {
        RunContext::with_timeout(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn search_maps_results_in_order() {
        let app = Router::new().route(
            "/search",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("name").map(String::as_str), Some("London"));
                assert_eq!(params.get("count").map(String::as_str), Some("10"));
                assert_eq!(params.get("language").map(String::as_str), Some("en"));
                r#"{"results": [
                    {"id": 2643743, "name": "London", "latitude": 51.50853, "longitude": -0.12574,
                     "country": "United Kingdom", "admin1": "England"},
                    {"id": 6058560, "name": "London", "latitude": 42.98339, "longitude": -81.23304,
                     "country": "Canada"}
                ], "generationtime_ms": 0.5}"#
            }),
        );
        let addr = serve(app).await;

        let locations = client(addr).search(&ctx(), "London").await.unwrap();

        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].id, 2643743);
        assert_eq!(locations[0].region, "England");
        assert_eq!(locations[0].latitude, 51.50853);
        assert_eq!(locations[1].country, "Canada");
        assert_eq!(locations[1].region, "");
    }

    #[tokio::test]
    async fn missing_results_is_empty_not_error() {
        let app = Router::new().route(
            "/search",
            get(|| async { r#"{"generationtime_ms": 0.3}"# }),
        );
        let addr = serve(app).await;

        let locations = client(addr).search(&ctx(), "Nowhere").await.unwrap();
        assert!(locations.is_empty());
    }

    #[tokio::test]
    async fn server_error_is_unavailable() {
        let app = Router::new().route(
            "/search",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "db down") }),
        );
        let addr = serve(app).await;

        let err = client(addr).search(&ctx(), "Error").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unavailable);
        assert_eq!(
            err.to_string(),
            "Unable to search locations. Please try again."
        );
    }

    #[tokio::test]
    async fn bad_request_is_invalid_query() {
        const REASON: &str = r#"{"error": true, "reason": "bad name"}"#;
        let app = Router::new().route(
            "/search",
            get(|| async { (StatusCode::BAD_REQUEST, REASON) }),
        );
        let addr = serve(app).await;

        let err = client(addr).search(&ctx(), "?").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidQuery);
    }

    #[tokio::test]
    async fn malformed_payload_is_unavailable() {
        const BODY: &str = r#"{"results": [{"id": 1, "name": "London", "latitude": "invalid"}]}"#;
        let app = Router::new().route("/search", get(|| async { BODY }));
        let addr = serve(app).await;

        let err = client(addr).search(&ctx(), "BadJSON").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn slow_upstream_hits_run_deadline() {
        let app = Router::new().route(
            "/search",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                r#"{"results": []}"#
            }),
        );
        let addr = serve(app).await;
        let ctx = RunContext::with_timeout(Duration::from_millis(50));

        let err = client(addr).search(&ctx, "Timeout").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Timeout);
        assert_eq!(err.to_string(), "Search took too long. Please try again.");
    }

    #[tokio::test]
    async fn canceled_run_never_reaches_upstream() {
        // Nothing listens on this address; a real request would fail as Unavailable.
        let (dead, timeout) = ("http://127.0.0.1:9", Duration::from_secs(1));
        let geo = OpenMeteoGeocoding::new(dead, timeout).unwrap();
        let ctx = ctx();
        ctx.cancel();

        let err = geo.search(&ctx, "London").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Canceled);
    }
}
