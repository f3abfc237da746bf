use async_trait::async_trait;

use crate::core::content::ContentEnvelope;
use crate::core::error::DispatchError;

/// A named, schema-described capability. Implementations carry their own
/// descriptor (name / description / input schema) and handle a validated
/// argument bag, producing an ordered sequence of content envelopes.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> serde_json::Value;
    async fn call(
        &self,
        arguments: &serde_json::Value,
    ) -> Result<Vec<ContentEnvelope>, DispatchError>;
}
