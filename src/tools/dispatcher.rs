use serde_json::Value;

use crate::core::content::ContentEnvelope;
use crate::core::error::DispatchError;
use crate::tools::registry::Registry;

/// Validate and route one invocation. Checks run in a fixed order: the tool
/// must be registered, the arguments must be a key-value mapping, and every
/// key the descriptor's schema marks required must be present. A missing
/// field and a non-mapping shape are the same failure kind.
pub async fn dispatch(
    registry: &Registry,
    name: &str,
    arguments: &Value,
) -> Result<Vec<ContentEnvelope>, DispatchError> {
    let Some(tool) = registry.find(name) else {
        tracing::error!(tool = name, "unknown tool requested");
        return Err(DispatchError::UnknownTool(name.to_string()));
    };
    let Some(args) = arguments.as_object() else {
        tracing::error!(tool = name, "arguments are not a key-value mapping");
        return Err(DispatchError::InvalidArguments(format!(
            "expected an object, got: {arguments}"
        )));
    };
    for key in required_keys(&tool.input_schema()) {
        if !args.contains_key(&key) {
            tracing::error!(tool = name, field = %key, "missing required field");
            return Err(DispatchError::InvalidArguments(format!(
                "missing required field: {key}"
            )));
        }
    }
    tool.call(arguments).await
}

fn required_keys(schema: &Value) -> Vec<String> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|keys| {
            keys.iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DailyForecast, ProviderError, SkyCondition, Units, WeatherProvider, WeatherSnapshot,
        WindDirection,
    };
    use crate::tools::registry::build_registry;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    /// Provider whose response is derived from the requested location, with
    /// a location-dependent delay to interleave concurrent calls.
    struct LocationEchoProvider;

    #[async_trait]
    impl WeatherProvider for LocationEchoProvider {
        async fn current(&self, location: &str) -> Result<WeatherSnapshot, ProviderError> {
            if location == "Atlantis" {
                return Err(ProviderError::UnknownLocation(location.to_string()));
            }
            let delay = if location == "Seattle" { 50 } else { 5 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(WeatherSnapshot {
                temperature: location.len() as f64,
                feels_like: 60.0,
                humidity: 50.0,
                wind_speed: 5.0,
                wind_direction: WindDirection::from_degrees(90.0),
                visibility: 10.0,
                uv_index: 3.0,
                sky: SkyCondition {
                    glyph: "☀️".into(),
                    description: location.to_string(),
                },
                daily_forecasts: vec![DailyForecast {
                    date: NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
                    high_temperature: 70.0,
                    low_temperature: 50.0,
                }],
            })
        }
    }

    fn registry() -> Registry {
        build_registry(Arc::new(LocationEchoProvider))
    }

    fn body_of(envelopes: &[ContentEnvelope]) -> Value {
        let ContentEnvelope::Text { text } = &envelopes[0] else {
            panic!("expected a text envelope");
        };
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn unknown_tool_fails_regardless_of_arguments() {
        let reg = registry();
        let err = dispatch(&reg, "unknown_tool", &json!({"location_name": "Seattle"}))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::UnknownTool(ref n) if n == "unknown_tool"));
    }

    #[tokio::test]
    async fn non_mapping_arguments_are_invalid() {
        let reg = registry();
        for args in [json!("not-a-mapping"), json!(["x"]), Value::Null] {
            let err = dispatch(&reg, "get_current_weather", &args)
                .await
                .unwrap_err();
            assert!(matches!(err, DispatchError::InvalidArguments(_)), "args: {args}");
        }
    }

    #[tokio::test]
    async fn missing_required_field_is_invalid() {
        let reg = registry();
        let err = dispatch(&reg, "get_current_weather", &json!({}))
            .await
            .unwrap_err();
        match err {
            DispatchError::InvalidArguments(msg) => {
                assert!(msg.contains("location_name"));
            }
            other => panic!("expected InvalidArguments, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn provider_failure_is_normalized_at_the_boundary() {
        let reg = registry();
        let err = dispatch(&reg, "get_current_weather", &json!({"location_name": "Atlantis"}))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Provider(_)));
    }

    #[tokio::test]
    async fn valid_invocation_yields_one_text_envelope() {
        let reg = registry();
        let out = dispatch(&reg, "get_current_weather", &json!({"location_name": "Seattle"}))
            .await
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(body_of(&out)["currently"]["description"], "Seattle");
    }

    #[tokio::test]
    async fn concurrent_invocations_do_not_share_state() {
        let reg = registry();
        let slow_args = json!({"location_name": "Seattle"});
        let fast_args = json!({"location_name": "Oslo"});
        let slow = dispatch(&reg, "get_current_weather", &slow_args);
        let fast = dispatch(&reg, "get_current_weather", &fast_args);
        let (slow_out, fast_out) = tokio::join!(slow, fast);

        let slow_body = body_of(&slow_out.unwrap());
        let fast_body = body_of(&fast_out.unwrap());
        assert_eq!(slow_body["currently"]["description"], "Seattle");
        assert_eq!(slow_body["currently"]["current_temperature"], 7.0);
        assert_eq!(fast_body["currently"]["description"], "Oslo");
        assert_eq!(fast_body["currently"]["current_temperature"], 4.0);
    }
}
