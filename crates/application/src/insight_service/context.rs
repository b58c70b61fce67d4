use ticketsense_core::{AppResult, TicketId};
use ticketsense_domain::{AgentIdentity, AuditLog, Transcript, resolve_agent};
use tracing::warn;

use super::InsightService;

/// Dialogue and agent of one ticket.
pub(super) struct TicketContext {
    pub(super) transcript: Transcript,
    pub(super) agent: AgentIdentity,
}

impl InsightService {
    /// Loads the ticket context.
    ///
    /// Metadata failures abort the request. Audit failures degrade to an
    /// empty log, which yields an empty transcript.
    pub(super) async fn load_context(&self, ticket_id: &TicketId) -> AppResult<TicketContext> {
        let snapshot = self.ticketing.fetch_ticket(ticket_id).await?;

        let audit_log = match self.ticketing.fetch_audit_log(ticket_id).await {
            Ok(audit_log) => audit_log,
            Err(error) => {
                warn!(
                    ticket_id = %ticket_id,
                    error = %error,
                    "audit log unavailable, continuing without dialogue"
                );
                AuditLog::default()
            }
        };

        let transcript = self.extractor.extract(&audit_log, &snapshot.directory);
        let agent = resolve_agent(&snapshot.metadata, &audit_log, &snapshot.directory);

        Ok(TicketContext { transcript, agent })
    }
}
