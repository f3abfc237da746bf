use std::sync::Arc;

use crate::core::tool::Tool;
use crate::domain::WeatherProvider;

use super::weather::WeatherTool;

/// Immutable, ordered set of invocable tools. Built once at startup and
/// shared across sessions; listing order is insertion order.
#[derive(Clone)]
pub struct Registry(Arc<Vec<Arc<dyn Tool>>>);

impl Registry {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self(Arc::new(tools))
    }

    pub fn list(&self) -> &[Arc<dyn Tool>] {
        &self.0
    }

    pub fn find(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.0.iter().find(|t| t.name() == name)
    }
}

pub fn build_registry(provider: Arc<dyn WeatherProvider>) -> Registry {
    Registry::new(vec![Arc::new(WeatherTool::new(provider))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::openmeteo::OpenMeteoClient;
    use crate::domain::Units;

    fn registry() -> Registry {
        build_registry(Arc::new(OpenMeteoClient::new("en", Units::Imperial)))
    }

    #[test]
    fn it_lists_exactly_one_weather_tool() {
        let reg = registry();
        assert_eq!(reg.list().len(), 1);
        assert_eq!(reg.list()[0].name(), "get_current_weather");
    }

    #[test]
    fn descriptor_marks_location_name_required() {
        let reg = registry();
        let schema = reg.list()[0].input_schema();
        let required = schema["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "location_name"));
    }

    #[test]
    fn listing_is_stable_across_calls() {
        let reg = registry();
        let first: Vec<_> = reg.list().iter().map(|t| t.name()).collect();
        let second: Vec<_> = reg.list().iter().map(|t| t.name()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn find_is_exact_match_only() {
        let reg = registry();
        assert!(reg.find("get_current_weather").is_some());
        assert!(reg.find("get_current_weathe").is_none());
        assert!(reg.find("GET_CURRENT_WEATHER").is_none());
    }
}
