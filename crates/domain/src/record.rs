use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ticketsense_core::TicketId;

use crate::agent::AgentIdentity;

/// Scores below this value flag an evaluation for review.
pub const QUALITY_THRESHOLD: u8 = 4;
/// Upper bound of every evaluation score.
pub const MAX_SCORE: u8 = 5;

const EMPTY_DIALOGUE_TEXT: &str = "No dialogue found for this ticket.";
const UNAVAILABLE_MARKER: &str = "[AI unavailable]";

/// How a returned record was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Generated during this request.
    GeneratedNew,
    /// Read back from the cache.
    FromCache,
    /// The ticket has no dialogue to analyze.
    Empty,
}

/// Three-sentence ticket summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Ticket the summary belongs to.
    pub ticket_id: TicketId,
    /// What the client asked about.
    pub issue: String,
    /// What the agent did.
    pub action: String,
    /// Current outcome.
    pub result: String,
    /// Resolved agent name.
    pub agent_name: String,
    /// Resolved assignee identifier.
    pub assignee_id: Option<String>,
    /// Rendered dialogue, kept only when transcript retention is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<String>,
    /// Production status.
    pub status: RecordStatus,
}

impl SummaryRecord {
    /// Placeholder for a ticket without dialogue.
    #[must_use]
    pub fn empty(ticket_id: TicketId, agent: AgentIdentity) -> Self {
        Self {
            ticket_id,
            issue: EMPTY_DIALOGUE_TEXT.to_owned(),
            action: EMPTY_DIALOGUE_TEXT.to_owned(),
            result: EMPTY_DIALOGUE_TEXT.to_owned(),
            agent_name: agent.agent_name,
            assignee_id: agent.assignee_id,
            dialogue: None,
            status: RecordStatus::Empty,
        }
    }

    /// Fallback used when the generator failed.
    #[must_use]
    pub fn unavailable(ticket_id: TicketId, agent: AgentIdentity, reason: &str) -> Self {
        let marker = format!("{UNAVAILABLE_MARKER} {reason}");
        Self {
            ticket_id,
            issue: marker.clone(),
            action: marker.clone(),
            result: marker,
            agent_name: agent.agent_name,
            assignee_id: agent.assignee_id,
            dialogue: None,
            status: RecordStatus::GeneratedNew,
        }
    }
}

/// Quality-of-service assessment of one ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Ticket the evaluation belongs to.
    pub ticket_id: TicketId,
    /// Detected dialogue language tag.
    pub language: String,
    /// Tone-of-voice score in `0..=5`.
    pub tov_score: u8,
    /// Solution quality score in `0..=5`.
    pub solution_score: u8,
    /// Policy violations found; empty when none.
    pub errors: Vec<String>,
    /// Recommended follow-up.
    pub next_action: String,
    /// When the evaluation was produced.
    pub analyzed_at: DateTime<Utc>,
    /// Resolved agent name.
    pub agent_name: String,
    /// Resolved assignee identifier.
    pub assignee_id: Option<String>,
    /// Rendered dialogue, kept only when transcript retention is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<String>,
    /// Production status.
    pub status: RecordStatus,
}

impl EvaluationRecord {
    /// Placeholder for a ticket without dialogue.
    #[must_use]
    pub fn empty(ticket_id: TicketId, agent: AgentIdentity, analyzed_at: DateTime<Utc>) -> Self {
        Self {
            ticket_id,
            language: "unknown".to_owned(),
            tov_score: 0,
            solution_score: 0,
            errors: Vec::new(),
            next_action: EMPTY_DIALOGUE_TEXT.to_owned(),
            analyzed_at,
            agent_name: agent.agent_name,
            assignee_id: agent.assignee_id,
            dialogue: None,
            status: RecordStatus::Empty,
        }
    }

    /// Fallback used when the generator failed.
    #[must_use]
    pub fn unavailable(
        ticket_id: TicketId,
        agent: AgentIdentity,
        analyzed_at: DateTime<Utc>,
        reason: &str,
    ) -> Self {
        Self {
            ticket_id,
            language: "unknown".to_owned(),
            tov_score: 0,
            solution_score: 0,
            errors: vec![format!("{UNAVAILABLE_MARKER} {reason}")],
            next_action: "Retry the evaluation later.".to_owned(),
            analyzed_at,
            agent_name: agent.agent_name,
            assignee_id: agent.assignee_id,
            dialogue: None,
            status: RecordStatus::GeneratedNew,
        }
    }

    /// Returns whether the evaluation needs review.
    #[must_use]
    pub fn is_flagged(&self) -> bool {
        !self.errors.is_empty()
            || self.tov_score < QUALITY_THRESHOLD
            || self.solution_score < QUALITY_THRESHOLD
    }
}

/// Clamps a generated score into `0..=5`.
#[must_use]
pub fn clamp_score(value: i64) -> u8 {
    u8::try_from(value.clamp(0, i64::from(MAX_SCORE))).unwrap_or(0)
}
