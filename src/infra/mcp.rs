//! MCP server integration (SSE + stdio) for weather-mcp-service.
//!
//! Bridges the registry/dispatcher to the rmcp protocol machinery: tool
//! descriptors become `rmcp::model::Tool`, content envelopes become protocol
//! content, and the dispatcher's typed failures become JSON-RPC errors. The
//! handler is the single routing authority; rmcp only carries frames.

use std::sync::Arc;

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParam, ResourceContents, ServerCapabilities, ServerInfo,
        Tool as ToolModel,
    },
    serve_server,
    service::{RequestContext, RoleServer},
    ErrorData as McpError, ServerHandler,
};
use serde_json::Value;

use crate::core::content::ContentEnvelope;
use crate::core::error::DispatchError;
use crate::core::tool::Tool;
use crate::tools::dispatcher::dispatch;
use crate::tools::registry::Registry;

pub const SERVER_NAME: &str = "weather-mcp-server";

/// One instance per transport session; holds the shared, immutable registry
/// and no other state.
#[derive(Clone)]
pub struct WeatherSvc {
    registry: Registry,
}

impl WeatherSvc {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }
}

impl ServerHandler for WeatherSvc {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::default()
            },
            instructions: Some(
                "Exposes get_current_weather: current conditions and daily forecast \
                 for a named location."
                    .into(),
            ),
            ..ServerInfo::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = self
            .registry
            .list()
            .iter()
            .map(|t| descriptor(t.as_ref()))
            .collect();
        Ok(ListToolsResult {
            tools,
            ..ListToolsResult::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = %request.name, "call_tool invoked");
        let arguments = request.arguments.map(Value::Object).unwrap_or(Value::Null);
        let envelopes = dispatch(&self.registry, &request.name, &arguments)
            .await
            .map_err(protocol_error)?;
        Ok(CallToolResult::success(
            envelopes.into_iter().map(content).collect(),
        ))
    }
}

fn descriptor(tool: &dyn Tool) -> ToolModel {
    let schema = tool
        .input_schema()
        .as_object()
        .cloned()
        .unwrap_or_default();
    ToolModel::new(tool.name(), tool.description(), Arc::new(schema))
}

fn content(envelope: ContentEnvelope) -> Content {
    match envelope {
        ContentEnvelope::Text { text } => Content::text(text),
        ContentEnvelope::Image { data, mime_type } => Content::image(data, mime_type),
        ContentEnvelope::EmbeddedResource {
            uri,
            mime_type,
            text,
        } => Content::resource(ResourceContents::TextResourceContents {
            uri,
            mime_type,
            text,
        }),
    }
}

fn protocol_error(err: DispatchError) -> McpError {
    match err {
        DispatchError::UnknownTool(_) | DispatchError::InvalidArguments(_) => {
            McpError::invalid_params(err.to_string(), None)
        }
        DispatchError::Provider(_) => McpError::internal_error(err.to_string(), None),
    }
}

/// Run the MCP server over stdin/stdout when `MODE=stdio`.
pub async fn serve_stdio(
    registry: Registry,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let service = WeatherSvc::new(registry);
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    let running = serve_server(service, (stdin, stdout)).await?;
    let _ = running.waiting().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::openmeteo::OpenMeteoClient;
    use crate::domain::Units;
    use crate::tools::registry::build_registry;

    fn svc() -> WeatherSvc {
        WeatherSvc::new(build_registry(Arc::new(OpenMeteoClient::new(
            "en",
            Units::Imperial,
        ))))
    }

    #[test]
    fn get_info_advertises_tools_capability_and_server_name() {
        let info = svc().get_info();
        assert_eq!(info.server_info.name, SERVER_NAME);
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn descriptor_keeps_name_and_required_fields() {
        let reg = svc().registry;
        let model = descriptor(reg.list()[0].as_ref());
        assert_eq!(model.name, "get_current_weather");
        let required = model.input_schema["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "location_name"));
    }

    #[test]
    fn text_envelope_becomes_protocol_text_content() {
        let c = content(ContentEnvelope::text("hi"));
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["type"], "text");
        assert_eq!(v["text"], "hi");
    }

    #[test]
    fn dispatch_errors_map_to_protocol_codes() {
        // JSON-RPC: invalid params is -32602, internal error is -32603.
        let e = protocol_error(DispatchError::UnknownTool("x".into()));
        assert_eq!(e.code.0, -32602);
        let e = protocol_error(DispatchError::InvalidArguments("x".into()));
        assert_eq!(e.code.0, -32602);
        let e = protocol_error(DispatchError::Provider("x".into()));
        assert_eq!(e.code.0, -32603);
        assert!(e.message.contains("weather provider error"));
    }
}
