//! Tool output payloads, one unit of content per value.

use serde::{Deserialize, Serialize};

/// One item of tool output. The serde representation mirrors the MCP wire
/// shape (`type` discriminator with `text` / `image` / `resource` kinds);
/// conversion to the transport's own content type happens at the protocol
/// edge so tools never depend on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentEnvelope {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        data: String,
        mime_type: String,
    },
    #[serde(rename = "resource", rename_all = "camelCase")]
    EmbeddedResource {
        uri: String,
        mime_type: Option<String>,
        text: String,
    },
}

impl ContentEnvelope {
    pub fn text(body: impl Into<String>) -> Self {
        ContentEnvelope::Text { text: body.into() }
    }
}
