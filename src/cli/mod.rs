use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::clients::openmeteo::OpenMeteoClient;
use crate::domain::WeatherProvider;
use crate::infra::config::Config;

#[derive(Parser)]
#[command(name = "weather-mcp-service")]
#[command(about = "Weather MCP service - SSE tool server and admin commands")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Health check a running service
    Health {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:3001")]
        url: String,
    },
    /// Validate configuration without starting the service
    Config,
    /// Query the weather provider directly
    TestWeather {
        /// Location to look up
        #[arg(short, long, default_value = "Seattle")]
        location: String,
    },
}

/// No subcommand runs the server; subcommands are admin one-shots.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        None => match crate::infra::boot::run_server().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("❌ Server error: {e}");
                ExitCode::FAILURE
            }
        },
        Some(command) => run_commands(command).await,
    }
}

pub async fn run_commands(command: Commands) -> ExitCode {
    match command {
        Commands::Health { url } => match health_check(&url).await {
            Ok(_) => {
                println!("✅ Service is healthy");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Health check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Config => match validate_config() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::TestWeather { location } => match test_weather(&location).await {
            Ok(_) => {
                println!("✅ Weather provider test passed");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Weather provider test failed: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn health_check(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/healthz", url))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(format!("HTTP {}", response.status()).into())
    }
}

fn validate_config() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::from_env();

    if !matches!(cfg.mode.as_str(), "server" | "stdio") {
        return Err(format!("Invalid MODE: {}. Must be 'server' or 'stdio'", cfg.mode).into());
    }

    if cfg.mode == "server" && cfg.port == 0 {
        return Err("PORT cannot be 0".into());
    }

    Ok(())
}

async fn test_weather(location: &str) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::from_env();
    let client = OpenMeteoClient::from_config(&cfg.provider);
    let snapshot = client.current(location).await?;

    println!("🌤️ Weather for {location}:");
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    async fn health_check_fails_without_a_service() {
        let result = health_check("http://localhost:9999").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn health_check_returns_ok_on_200() {
        use httpmock::prelude::*;
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/healthz");
            then.status(200).body("ok");
        });
        let ok = health_check(&server.base_url()).await;
        assert!(ok.is_ok());
    }

    #[test]
    #[serial]
    fn validate_config_accepts_defaults() {
        std::env::remove_var("MODE");
        std::env::remove_var("PORT");
        assert!(validate_config().is_ok());
    }

    #[test]
    #[serial]
    fn validate_config_rejects_unknown_mode() {
        std::env::set_var("MODE", "carrier-pigeon");
        assert!(validate_config().is_err());
        std::env::remove_var("MODE");
    }
}
