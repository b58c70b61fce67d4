use serde::{Deserialize, Serialize};
use ticketsense_core::{AppResult, TicketId};
use ticketsense_domain::EvaluationRecord;

/// Ticket identifier as sent by helpdesk apps, either a string or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TicketIdInput {
    Text(String),
    Number(u64),
}

/// Body of `/summary` and `/evaluate`.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketRequest {
    pub ticket_id: TicketIdInput,
}

impl TicketRequest {
    pub fn ticket_id(&self) -> AppResult<TicketId> {
        match &self.ticket_id {
            TicketIdInput::Text(value) => TicketId::new(value.as_str()),
            TicketIdInput::Number(value) => TicketId::new(value.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FlaggedEvaluationsResponse {
    pub status: &'static str,
    pub count: usize,
    pub items: Vec<EvaluationRecord>,
}

impl FlaggedEvaluationsResponse {
    pub fn available(items: Vec<EvaluationRecord>) -> Self {
        Self {
            status: "ok",
            count: items.len(),
            items,
        }
    }

    pub fn cache_unavailable() -> Self {
        Self {
            status: "cache_unavailable",
            count: 0,
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache: HealthDependencyStatus,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::TicketRequest;

    #[test]
    fn accepts_string_and_numeric_ticket_ids() {
        let text: Result<TicketRequest, _> = serde_json::from_value(json!({"ticket_id": " 48211 "}));
        let number: Result<TicketRequest, _> = serde_json::from_value(json!({"ticket_id": 48211}));

        let (Ok(text), Ok(number)) = (text, number) else {
            panic!("both forms should deserialize");
        };
        assert_eq!(text.ticket_id().ok().map(String::from).as_deref(), Some("48211"));
        assert_eq!(number.ticket_id().ok().map(String::from).as_deref(), Some("48211"));
    }

    #[test]
    fn rejects_invalid_ticket_ids() {
        let request: Result<TicketRequest, _> = serde_json::from_value(json!({"ticket_id": "../1"}));
        assert!(request.is_ok_and(|request| request.ticket_id().is_err()));

        let missing: Result<TicketRequest, _> = serde_json::from_value(json!({}));
        assert!(missing.is_err());
    }
}
