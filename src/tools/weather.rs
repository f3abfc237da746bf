use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::core::content::ContentEnvelope;
use crate::core::error::DispatchError;
use crate::core::tool::Tool;
use crate::domain::{WeatherProvider, WeatherSnapshot};

/// The `get_current_weather` handler: resolves the requested location
/// through the provider port and renders the snapshot as one indented-JSON
/// text envelope for human/LLM readability.
pub struct WeatherTool {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherTool {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &'static str {
        "get_current_weather"
    }

    fn description(&self) -> &'static str {
        "Get current weather and forecast for a location"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "location_name": {
                    "type": "string",
                    "description": "The location to get the weather for"
                }
            },
            "required": ["location_name"]
        })
    }

    async fn call(&self, arguments: &Value) -> Result<Vec<ContentEnvelope>, DispatchError> {
        let location = arguments
            .get("location_name")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                DispatchError::InvalidArguments("location_name must be a string".into())
            })?;
        tracing::debug!(location, "weather request received");
        let snapshot = self.provider.current(location).await?;
        tracing::debug!(location, "weather data received");
        let text = serde_json::to_string_pretty(&currently_payload(&snapshot))
            .map_err(|e| DispatchError::Provider(e.to_string()))?;
        Ok(vec![ContentEnvelope::Text { text }])
    }
}

/// Flatten a snapshot into the wire document, under the fixed `"currently"`
/// top-level key.
fn currently_payload(w: &WeatherSnapshot) -> Value {
    let forecasts: Vec<Value> = w
        .daily_forecasts
        .iter()
        .map(|f| {
            json!({
                "date": f.date.format("%Y-%m-%d").to_string(),
                "high_temperature": f.high_temperature,
                "low_temperature": f.low_temperature,
            })
        })
        .collect();
    json!({
        "currently": {
            "current_temperature": w.temperature,
            "sky": w.sky.glyph,
            "feels_like": w.feels_like,
            "humidity": w.humidity,
            "wind_speed": w.wind_speed,
            "wind_direction": w.wind_direction.label(),
            "visibility": w.visibility,
            "uv_index": w.uv_index,
            "description": w.sky.description,
            "forecasts": forecasts,
        }
    })
}
