use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::error::DispatchError;

/// Failure modes of the external weather provider. Returned as values by the
/// provider port; the dispatcher boundary folds them into
/// `DispatchError::Provider` so provider-internal identity never escapes.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("unknown location: {0}")]
    UnknownLocation(String),
    #[error("provider unreachable: {0}")]
    Unreachable(String),
    #[error("provider returned status {0}")]
    Status(u16),
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl From<ProviderError> for DispatchError {
    fn from(e: ProviderError) -> Self {
        DispatchError::Provider(e.to_string())
    }
}

/// Measurement system, fixed per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Imperial,
    Metric,
}

impl Units {
    pub fn temperature_param(self) -> &'static str {
        match self {
            Units::Imperial => "fahrenheit",
            Units::Metric => "celsius",
        }
    }

    pub fn wind_speed_param(self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            Units::Metric => "kmh",
        }
    }

    /// Providers report visibility in meters regardless of the unit system.
    pub fn visibility_from_meters(self, meters: f64) -> f64 {
        let v = match self {
            Units::Imperial => meters / 1609.344,
            Units::Metric => meters / 1000.0,
        };
        (v * 10.0).round() / 10.0
    }
}

/// Compass label plus directional arrow glyph, derived from wind bearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindDirection {
    pub compass: String,
    pub glyph: String,
}

impl WindDirection {
    pub fn from_degrees(degrees: f64) -> Self {
        // Arrows point where the wind blows toward, not where it comes from.
        const POINTS: [(&str, &str); 8] = [
            ("N", "↓"),
            ("NE", "↙"),
            ("E", "←"),
            ("SE", "↖"),
            ("S", "↑"),
            ("SW", "↗"),
            ("W", "→"),
            ("NW", "↘"),
        ];
        let idx = ((degrees.rem_euclid(360.0) + 22.5) / 45.0) as usize % 8;
        let (compass, glyph) = POINTS[idx];
        Self {
            compass: compass.to_string(),
            glyph: glyph.to_string(),
        }
    }

    /// Value concatenated with its glyph, e.g. `NW↘`.
    pub fn label(&self) -> String {
        format!("{}{}", self.compass, self.glyph)
    }
}

/// Sky state as a glyph plus a short human description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyCondition {
    pub glyph: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub high_temperature: f64,
    pub low_temperature: f64,
}

/// Current conditions plus the daily outlook for one location. Built fresh
/// per request, serialized immediately, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_direction: WindDirection,
    pub visibility: f64,
    pub uv_index: f64,
    pub sky: SkyCondition,
    pub daily_forecasts: Vec<DailyForecast>,
}

/// Port to the external weather data source. Implementations resolve the
/// location name, query the provider and map its response field-by-field.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, location: &str) -> Result<WeatherSnapshot, ProviderError>;
}
