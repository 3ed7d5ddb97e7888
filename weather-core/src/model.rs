use std::fmt;

use serde::{Deserialize, Serialize};

/// A place returned by a geocoding search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    /// Administrative area; empty when the provider does not supply one.
    pub region: String,
}

impl Location {
    /// `"<name>, <country> (<region>)"`, as shown in listings and report headers.
    pub fn label(&self) -> String {
        format!("{}, {} ({})", self.name, self.country, self.region)
    }
}

/// A single reading paired with its display unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
}

impl Quantity {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Degree and percent signs hug the number; everything else is spaced.
        match self.unit.chars().next() {
            None => write!(f, "{}", self.value),
            Some('°' | '%') => write!(f, "{}{}", self.value, self.unit),
            Some(_) => write!(f, "{} {}", self.value, self.unit),
        }
    }
}

/// Current conditions at a location, metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherMeasurement {
    pub temperature: Quantity,
    pub relative_humidity: Quantity,
    pub apparent_temperature: Quantity,
    pub precipitation: Quantity,
    pub cloud_cover: Quantity,
    pub surface_pressure: Quantity,
    pub wind_speed: Quantity,
    pub wind_direction: Quantity,
    pub wind_gusts: Quantity,
}
