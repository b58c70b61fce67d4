use async_trait::async_trait;
use ticketsense_core::{AppResult, TicketId};
use ticketsense_domain::{AuditLog, TicketSnapshot};

/// Read-only access to the helpdesk platform.
#[async_trait]
pub trait TicketingPlatform: Send + Sync {
    /// Fetches ticket metadata with its linked users.
    ///
    /// Unknown tickets must yield `AppError::NotFound`; every other failure
    /// yields `AppError::Upstream`.
    async fn fetch_ticket(&self, ticket_id: &TicketId) -> AppResult<TicketSnapshot>;

    /// Fetches the full audit log of a ticket.
    async fn fetch_audit_log(&self, ticket_id: &TicketId) -> AppResult<AuditLog>;
}
