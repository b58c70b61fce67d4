use async_trait::async_trait;
use serde_json::Value;
use ticketsense_core::AppResult;

/// One structured completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Model identifier.
    pub model: String,
    /// Free-text instruction including the dialogue.
    pub instruction: String,
    /// JSON schema the response must follow.
    pub response_schema: Value,
}

/// Generative model returning JSON documents.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    /// Generates one JSON document for the request.
    async fn generate(&self, request: GenerationRequest) -> AppResult<Value>;
}
