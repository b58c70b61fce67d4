//! Zendesk REST adapter for the ticketing port.

use async_trait::async_trait;
use serde_json::{Value, json};
use ticketsense_application::TicketingPlatform;
use ticketsense_core::{AppError, AppResult, TicketId};
use ticketsense_domain::{AuditLog, TicketMetadata, TicketSnapshot, UserDirectory};
use tracing::{debug, error, warn};

const AUDIT_PAGE_SIZE: usize = 100;
const MAX_AUDIT_PAGES: usize = 50;

/// Read-only Zendesk client authenticating with an API token.
#[derive(Clone)]
pub struct ZendeskTicketingClient {
    http_client: reqwest::Client,
    base_url: String,
    email: String,
    api_token: String,
}

impl ZendeskTicketingClient {
    /// Creates a client for `https://{subdomain}.zendesk.com`.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        subdomain: &str,
        email: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self::with_base_url(
            http_client,
            format!("https://{}.zendesk.com", subdomain.trim()),
            email,
            api_token,
        )
    }

    /// Creates a client against an explicit base URL.
    #[must_use]
    pub fn with_base_url(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        email: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            email: email.into(),
            api_token: api_token.into(),
        }
    }

    fn ticket_url(&self, ticket_id: &TicketId) -> String {
        format!("{}/api/v2/tickets/{ticket_id}.json?include=users", self.base_url)
    }

    fn audits_url(&self, ticket_id: &TicketId) -> String {
        format!(
            "{}/api/v2/tickets/{ticket_id}/audits.json?page[size]={AUDIT_PAGE_SIZE}",
            self.base_url
        )
    }

    /// Only follows pagination links that stay on the configured helpdesk.
    fn is_own_url(&self, url: &str) -> bool {
        url.strip_prefix(self.base_url.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }

    async fn get_json(&self, ticket_id: &TicketId, url: String) -> AppResult<Value> {
        debug!(ticket_id = %ticket_id, url = %url, "requesting helpdesk resource");
        let response = self
            .http_client
            .get(url.as_str())
            .basic_auth(format!("{}/token", self.email), Some(&self.api_token))
            .send()
            .await
            .map_err(|error| {
                AppError::Upstream(format!(
                    "helpdesk request for ticket '{ticket_id}' failed: {error}"
                ))
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "ticket '{ticket_id}' does not exist"
            )));
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response body unavailable>".to_owned());
            error!(
                ticket_id = %ticket_id,
                status = %status,
                body = %body,
                "helpdesk returned an error status"
            );
            return Err(AppError::Upstream(format!(
                "helpdesk returned status {status} for ticket '{ticket_id}'"
            )));
        }

        response.json::<Value>().await.map_err(|error| {
            AppError::Upstream(format!(
                "helpdesk returned an unreadable body for ticket '{ticket_id}': {error}"
            ))
        })
    }
}

#[async_trait]
impl TicketingPlatform for ZendeskTicketingClient {
    async fn fetch_ticket(&self, ticket_id: &TicketId) -> AppResult<TicketSnapshot> {
        let payload = self.get_json(ticket_id, self.ticket_url(ticket_id)).await?;
        snapshot_from_payload(ticket_id, &payload)
    }

    async fn fetch_audit_log(&self, ticket_id: &TicketId) -> AppResult<AuditLog> {
        let mut pages = AuditPages::default();
        let mut url = self.audits_url(ticket_id);

        for _ in 0..MAX_AUDIT_PAGES {
            let payload = self.get_json(ticket_id, url).await?;
            match pages.push_page(&payload) {
                None => return Ok(pages.into_audit_log()),
                Some(next) if self.is_own_url(next.as_str()) => url = next,
                Some(next) => {
                    warn!(
                        ticket_id = %ticket_id,
                        next = %next,
                        "ignoring audit page link outside the helpdesk"
                    );
                    return Ok(pages.into_audit_log());
                }
            }
        }

        warn!(
            ticket_id = %ticket_id,
            pages = MAX_AUDIT_PAGES,
            "audit log truncated at page limit"
        );
        Ok(pages.into_audit_log())
    }
}

/// Audits collected across pages, oldest first.
#[derive(Debug, Default)]
struct AuditPages {
    audits: Vec<Value>,
}

impl AuditPages {
    /// Appends one page and returns the link to the next one, if any.
    fn push_page(&mut self, page: &Value) -> Option<String> {
        if let Some(audits) = page.get("audits").and_then(Value::as_array) {
            self.audits.extend(audits.iter().cloned());
        }

        next_page_url(page)
    }

    fn into_audit_log(self) -> AuditLog {
        AuditLog::from_json(&json!({ "audits": self.audits }))
    }
}

/// Reads cursor (`meta.has_more` + `links.next`) or offset (`next_page`) links.
fn next_page_url(page: &Value) -> Option<String> {
    let next = match page.pointer("/meta/has_more").and_then(Value::as_bool) {
        Some(false) => None,
        Some(true) => page.pointer("/links/next"),
        None => page.get("next_page"),
    };

    next.and_then(Value::as_str)
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_owned)
}

/// Reads the `{ticket, users}` envelope of a ticket request.
fn snapshot_from_payload(ticket_id: &TicketId, payload: &Value) -> AppResult<TicketSnapshot> {
    let ticket = payload
        .get("ticket")
        .filter(|ticket| ticket.is_object())
        .ok_or_else(|| {
            AppError::Upstream(format!(
                "helpdesk response for ticket '{ticket_id}' has no ticket object"
            ))
        })?;

    Ok(TicketSnapshot {
        metadata: TicketMetadata::from_json(ticket),
        directory: payload
            .get("users")
            .map(UserDirectory::from_json)
            .unwrap_or_default(),
    })
}
