use std::net::SocketAddr;

use crate::domain::Units;

/// Weather provider settings. Locale and unit system are deployment-fixed,
/// not request parameters; the base URLs are overridable for ops and tests.
pub struct ProviderConfig {
    pub geocoding_base_url: Option<String>,
    pub forecast_base_url: Option<String>,
    pub locale: String,
    pub units: Units,
}

pub struct Config {
    pub mode: String, // "server" or "stdio"
    pub host: String,
    pub port: u16,
    pub provider: ProviderConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let mode = std::env::var("MODE").unwrap_or_else(|_| "server".into());
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3001);
        let provider = ProviderConfig {
            geocoding_base_url: non_empty_var("GEOCODING_BASE_URL"),
            forecast_base_url: non_empty_var("FORECAST_BASE_URL"),
            locale: "en".into(),
            units: Units::Imperial,
        };

        Self {
            mode,
            host,
            port,
            provider,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], self.port)))
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
