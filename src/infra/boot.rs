use std::sync::Arc;
use std::time::Duration;

use crate::clients::openmeteo::OpenMeteoClient;
use crate::infra::config::Config;
use crate::tools::registry::build_registry;

pub async fn run_server() -> anyhow::Result<()> {
    let cfg = Config::from_env();
    tracing::info!(
        mode = %cfg.mode,
        host = %cfg.host,
        port = cfg.port,
        "BOOT weather-mcp-service"
    );

    let provider = Arc::new(OpenMeteoClient::from_config(&cfg.provider));
    let registry = build_registry(provider);

    // Stdio mode: run MCP over stdio ONLY (no HTTP).
    if cfg.mode == "stdio" {
        crate::infra::mcp::serve_stdio(registry)
            .await
            .map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    }

    let addr = cfg.bind_addr();
    let (app, ct) = crate::infra::http_app::build_app(registry, addr, Some(Duration::from_secs(15)));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            ct.cancel();
        })
        .await?;
    Ok(())
}
