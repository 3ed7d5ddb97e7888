//! Core library for the `weather-reporter` CLI.
//!
//! This crate defines:
//! - The location and weather data model
//! - Provider contracts and their Open-Meteo implementations
//! - A single error-normalization boundary shared by both providers
//! - Candidate disambiguation, report rendering and the run pipeline
//!
//! It is used by `weather-reporter-cli`, but the pipeline takes its providers
//! and streams as parameters so other front ends can drive it too.

pub mod config;
pub mod context;
pub mod disambiguate;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod render;

pub use config::{Config, ConfigError};
pub use context::{Interrupt, RunContext};
pub use disambiguate::{MAX_CANDIDATES, Resolution, decide};
pub use error::{ErrorKind, Operation, ProviderError, RunError, SelectionError};
pub use model::{Location, Quantity, WeatherMeasurement};
pub use pipeline::{EXIT_FAILURE, EXIT_SUCCESS, Outcome, Pipeline};
pub use provider::{LocationProvider, OpenMeteoForecast, OpenMeteoGeocoding, WeatherProvider};
pub use render::{render, write_report};
