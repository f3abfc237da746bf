use std::net::SocketAddr;
use std::time::Duration;

use axum::{routing::get, Router};
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use tokio_util::sync::CancellationToken;

use crate::infra::mcp::WeatherSvc;
use crate::tools::registry::Registry;

pub const SSE_PATH: &str = "/sse";
pub const POST_PATH: &str = "/weather";

/// Build the axum app: `/healthz` plus the MCP SSE transport (`GET /sse`
/// push stream, `POST /weather` message side-channel). Each SSE connection
/// gets its own handler instance from the service factory; the returned
/// token cancels the transport's session loop on shutdown.
pub fn build_app(
    registry: Registry,
    bind: SocketAddr,
    keep_alive: Option<Duration>,
) -> (Router, CancellationToken) {
    let config = SseServerConfig {
        bind,
        sse_path: SSE_PATH.to_string(),
        post_path: POST_PATH.to_string(),
        ct: CancellationToken::new(),
        sse_keep_alive: keep_alive,
    };
    let (sse_server, sse_router) = SseServer::new(config);
    let ct = sse_server.with_service(move || WeatherSvc::new(registry.clone()));

    let app = Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .merge(sse_router);
    (app, ct)
}
