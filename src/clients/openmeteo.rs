use std::time::Instant;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::{
    DailyForecast, ProviderError, SkyCondition, Units, WeatherProvider, WeatherSnapshot,
    WindDirection,
};
use crate::infra::config::ProviderConfig;
use crate::infra::http::headers::add_standard_headers;
use crate::infra::runtime::limits::make_http_client;

const DEFAULT_GEOCODING_BASE: &str = "https://geocoding-api.open-meteo.com";
const DEFAULT_FORECAST_BASE: &str = "https://api.open-meteo.com";

const CURRENT_FIELDS: &str = "temperature_2m,apparent_temperature,relative_humidity_2m,\
wind_speed_10m,wind_direction_10m,visibility,uv_index,weather_code";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min";

/// Open-Meteo client: resolves a location name via the geocoding endpoint,
/// then queries the forecast endpoint for current conditions and the daily
/// outlook. One attempt per request; failures are returned as values.
#[derive(Clone)]
pub struct OpenMeteoClient {
    geocoding_base: String,
    forecast_base: String,
    http: Client,
    locale: String,
    units: Units,
}

impl OpenMeteoClient {
    pub fn new(locale: impl Into<String>, units: Units) -> Self {
        Self::with_endpoints(DEFAULT_GEOCODING_BASE, DEFAULT_FORECAST_BASE, locale, units)
    }

    pub fn with_endpoints(
        geocoding_base: impl Into<String>,
        forecast_base: impl Into<String>,
        locale: impl Into<String>,
        units: Units,
    ) -> Self {
        Self {
            geocoding_base: geocoding_base.into(),
            forecast_base: forecast_base.into(),
            http: make_http_client(),
            locale: locale.into(),
            units,
        }
    }

    pub fn from_config(cfg: &ProviderConfig) -> Self {
        Self::with_endpoints(
            cfg.geocoding_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_GEOCODING_BASE.to_string()),
            cfg.forecast_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_FORECAST_BASE.to_string()),
            cfg.locale.clone(),
            cfg.units,
        )
    }

    async fn geocode(&self, location: &str) -> Result<GeocodeHit, ProviderError> {
        let url = format!("{}/v1/search", self.geocoding_base.trim_end_matches('/'));
        tracing::debug!(endpoint = %url, location, "openmeteo.geocode request");
        let (builder, _rid) = add_standard_headers(self.http.get(url), None);
        let resp = builder
            .query(&[
                ("name", location),
                ("count", "1"),
                ("language", self.locale.as_str()),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Unreachable(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ProviderError::Status(resp.status().as_u16()));
        }
        let wire: GeocodeWire = resp
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        wire.results
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| ProviderError::UnknownLocation(location.to_string()))
    }

    async fn forecast(&self, hit: &GeocodeHit) -> Result<ForecastWire, ProviderError> {
        let url = format!("{}/v1/forecast", self.forecast_base.trim_end_matches('/'));
        tracing::debug!(endpoint = %url, latitude = hit.latitude, longitude = hit.longitude, "openmeteo.forecast request");
        let (builder, _rid) = add_standard_headers(self.http.get(url), None);
        let resp = builder
            .query(&[
                ("latitude", hit.latitude.to_string()),
                ("longitude", hit.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
                ("temperature_unit", self.units.temperature_param().to_string()),
                ("wind_speed_unit", self.units.wind_speed_param().to_string()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Unreachable(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ProviderError::Status(resp.status().as_u16()));
        }
        resp.json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))
    }

    async fn fetch(&self, location: &str) -> Result<WeatherSnapshot, ProviderError> {
        let hit = self.geocode(location).await?;
        tracing::debug!(location, latitude = hit.latitude, longitude = hit.longitude, "location resolved");
        let wire = self.forecast(&hit).await?;
        Ok(snapshot_from_wire(wire, self.units))
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn current(&self, location: &str) -> Result<WeatherSnapshot, ProviderError> {
        metrics::counter!("weather_provider_requests_total").increment(1);
        let start = Instant::now();
        let out = self.fetch(location).await;
        metrics::histogram!("weather_provider_latency_ms")
            .record(start.elapsed().as_millis() as f64);
        if out.is_err() {
            metrics::counter!("weather_provider_errors_total").increment(1);
        }
        out
    }
}

fn snapshot_from_wire(wire: ForecastWire, units: Units) -> WeatherSnapshot {
    let current = wire.current;
    let daily_forecasts = wire
        .daily
        .time
        .into_iter()
        .zip(wire.daily.temperature_2m_max)
        .zip(wire.daily.temperature_2m_min)
        .map(|((date, high), low)| DailyForecast {
            date,
            high_temperature: high,
            low_temperature: low,
        })
        .collect();
    WeatherSnapshot {
        temperature: current.temperature_2m,
        feels_like: current.apparent_temperature,
        humidity: current.relative_humidity_2m,
        wind_speed: current.wind_speed_10m,
        wind_direction: WindDirection::from_degrees(current.wind_direction_10m),
        visibility: units.visibility_from_meters(current.visibility),
        uv_index: current.uv_index,
        sky: sky_for_code(current.weather_code),
        daily_forecasts,
    }
}

/// WMO weather interpretation codes as published by Open-Meteo.
fn sky_for_code(code: u16) -> SkyCondition {
    let (glyph, description) = match code {
        0 => ("☀️", "Clear sky"),
        1 => ("🌤️", "Mainly clear"),
        2 => ("⛅", "Partly cloudy"),
        3 => ("☁️", "Overcast"),
        45 | 48 => ("🌫️", "Fog"),
        51 | 53 | 55 => ("🌦️", "Drizzle"),
        56 | 57 => ("🌧️", "Freezing drizzle"),
        61 | 63 | 65 => ("🌧️", "Rain"),
        66 | 67 => ("🌧️", "Freezing rain"),
        71 | 73 | 75 => ("🌨️", "Snowfall"),
        77 => ("🌨️", "Snow grains"),
        80 | 81 | 82 => ("🌧️", "Rain showers"),
        85 | 86 => ("🌨️", "Snow showers"),
        95 => ("⛈️", "Thunderstorm"),
        96 | 99 => ("⛈️", "Thunderstorm with hail"),
        _ => ("🌡️", "Unknown conditions"),
    };
    SkyCondition {
        glyph: glyph.to_string(),
        description: description.to_string(),
    }
}

#[derive(Deserialize)]
struct GeocodeWire {
    results: Option<Vec<GeocodeHit>>,
}

#[derive(Deserialize)]
struct GeocodeHit {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct ForecastWire {
    current: CurrentWire,
    daily: DailyWire,
}

#[derive(Deserialize)]
struct CurrentWire {
    temperature_2m: f64,
    apparent_temperature: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
    visibility: f64,
    uv_index: f64,
    weather_code: u16,
}

#[derive(Deserialize)]
struct DailyWire {
    time: Vec<NaiveDate>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
}
