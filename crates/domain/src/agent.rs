use serde::{Deserialize, Serialize};

use crate::audit::{AuditEvent, AuditLog};
use crate::ticket::{TicketMetadata, UserDirectory};

/// Agent name used when no assignee can be resolved to a user.
pub const UNKNOWN_AGENT_NAME: &str = "Unknown Agent";

const ASSIGNEE_FIELDS: [&str; 2] = ["assignee", "assignee_id"];

/// Best-effort identity of the agent responsible for a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentIdentity {
    /// Assignee identifier, absent when the ticket was never assigned.
    pub assignee_id: Option<String>,
    /// Display name of the assignee.
    pub agent_name: String,
}

impl Default for AgentIdentity {
    fn default() -> Self {
        Self {
            assignee_id: None,
            agent_name: UNKNOWN_AGENT_NAME.to_owned(),
        }
    }
}

/// Resolves the responsible agent.
///
/// Ticket-level assignee fields win. Otherwise the audit log is walked from
/// the most recent audit backwards and the first assignment found is used.
#[must_use]
pub fn resolve_agent(
    ticket: &TicketMetadata,
    audit_log: &AuditLog,
    directory: &UserDirectory,
) -> AgentIdentity {
    let assignee_id = ticket
        .assignee
        .clone()
        .or_else(|| ticket.assignee_id.clone())
        .or_else(|| latest_assignment(audit_log));

    let Some(assignee_id) = assignee_id else {
        return AgentIdentity::default();
    };

    let agent_name = directory
        .display_name(assignee_id.as_str())
        .unwrap_or(UNKNOWN_AGENT_NAME)
        .to_owned();

    AgentIdentity {
        assignee_id: Some(assignee_id),
        agent_name,
    }
}

fn latest_assignment(audit_log: &AuditLog) -> Option<String> {
    audit_log.audits().iter().rev().find_map(|audit| {
        audit
            .assignee
            .clone()
            .or_else(|| audit.assignee_id.clone())
            .or_else(|| {
                audit.events.iter().rev().find_map(|event| match event {
                    AuditEvent::Change { field_name, value }
                        if ASSIGNEE_FIELDS.contains(&field_name.as_str()) =>
                    {
                        value.clone()
                    }
                    _ => None,
                })
            })
    })
}
