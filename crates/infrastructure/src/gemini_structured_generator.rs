//! Gemini `generateContent` adapter for the structured generator port.

use async_trait::async_trait;
use serde_json::{Value, json};
use ticketsense_application::{GenerationRequest, StructuredGenerator};
use ticketsense_core::{AppError, AppResult};
use tracing::{debug, error};

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini client requesting JSON-only responses.
#[derive(Clone)]
pub struct GeminiStructuredGenerator {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiStructuredGenerator {
    /// Creates a generator against the public Gemini endpoint.
    #[must_use]
    pub fn new(http_client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self::with_endpoint(http_client, DEFAULT_ENDPOINT, api_key)
    }

    /// Creates a generator against an explicit API root.
    #[must_use]
    pub fn with_endpoint(
        http_client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
        }
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.endpoint)
    }
}

#[async_trait]
impl StructuredGenerator for GeminiStructuredGenerator {
    async fn generate(&self, request: GenerationRequest) -> AppResult<Value> {
        let url = self.generate_url(request.model.as_str());
        debug!(model = %request.model, "requesting structured generation");

        let response = self
            .http_client
            .post(url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&request_body(&request))
            .send()
            .await
            .map_err(|error| AppError::Upstream(format!("generator request failed: {error}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response body unavailable>".to_owned());
            error!(status = %status, body = %body, "generator returned an error status");
            return Err(AppError::Upstream(format!(
                "generator returned status {status}"
            )));
        }

        let payload = response.json::<Value>().await.map_err(|error| {
            AppError::Upstream(format!("generator returned an unreadable body: {error}"))
        })?;

        parse_candidate(&payload)
    }
}

fn request_body(request: &GenerationRequest) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{"text": request.instruction}]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": request.response_schema
        }
    })
}

/// Parses the text of the first candidate as a JSON document.
fn parse_candidate(payload: &Value) -> AppResult<Value> {
    let text = payload
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            let reason = payload
                .pointer("/promptFeedback/blockReason")
                .and_then(Value::as_str)
                .unwrap_or("no candidate text");
            AppError::Upstream(format!("generator returned no content: {reason}"))
        })?;

    serde_json::from_str::<Value>(strip_code_fence(text)).map_err(|error| {
        AppError::Upstream(format!("generator returned invalid JSON: {error}"))
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = rest
        .split_once('\n')
        .map_or("", |(_language, body)| body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use ticketsense_application::GenerationRequest;
    use ticketsense_core::AppError;

    use super::{GeminiStructuredGenerator, parse_candidate, request_body, strip_code_fence};

    fn payload_with_text(text: &str) -> serde_json::Value {
        json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
    }

    #[test]
    fn builds_model_url() {
        let generator = GeminiStructuredGenerator::new(reqwest::Client::new(), "key");
        assert_eq!(
            generator.generate_url("gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_body_asks_for_json_with_schema() {
        let body = request_body(&GenerationRequest {
            model: "m".to_owned(),
            instruction: "Summarize".to_owned(),
            response_schema: json!({"type": "OBJECT"}),
        });

        assert_eq!(body["contents"][0]["parts"][0]["text"], "Summarize");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn parses_plain_json_candidate() {
        let parsed = parse_candidate(&payload_with_text(r#"{"issue": "late delivery"}"#));
        assert!(parsed.is_ok_and(|value| value["issue"] == "late delivery"));
    }

    #[test]
    fn tolerates_markdown_fences() {
        let parsed = parse_candidate(&payload_with_text("```json\n{\"tov_score\": 4}\n```"));
        assert!(parsed.is_ok_and(|value| value["tov_score"] == 4));

        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("  {}  "), "{}");
    }

    #[test]
    fn reports_missing_candidates_and_invalid_json() {
        let blocked = parse_candidate(&json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        assert!(matches!(blocked, Err(AppError::Upstream(message)) if message.contains("SAFETY")));

        let invalid = parse_candidate(&payload_with_text("The issue was a refund."));
        assert!(matches!(invalid, Err(AppError::Upstream(_))));
    }
}
