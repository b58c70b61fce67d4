use std::collections::HashMap;

use serde_json::Value;

use crate::audit::external_id;

/// Ticket fields the pipeline reads from the helpdesk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketMetadata {
    /// Ticket subject line.
    pub subject: Option<String>,
    /// Helpdesk status such as `open` or `solved`.
    pub status: Option<String>,
    /// Identifier from the structured `assignee` reference.
    pub assignee: Option<String>,
    /// Bare `assignee_id` field.
    pub assignee_id: Option<String>,
}

impl TicketMetadata {
    /// Reads metadata from a raw `ticket` object.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        Self {
            subject: value
                .get("subject")
                .and_then(Value::as_str)
                .map(str::to_owned),
            status: value
                .get("status")
                .and_then(Value::as_str)
                .map(str::to_owned),
            assignee: value
                .get("assignee")
                .and_then(|assignee| assignee.get("id"))
                .and_then(external_id),
            assignee_id: value.get("assignee_id").and_then(external_id),
        }
    }
}

/// Display names of users linked to a ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    names: HashMap<i64, String>,
}

impl UserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a raw `users` sideload array; entries without id or name are skipped.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let names = value
            .as_array()
            .map(|users| {
                users
                    .iter()
                    .filter_map(|user| {
                        let id = user.get("id").and_then(external_id)?;
                        let id = parse_user_id(id.as_str())?;
                        let name = user
                            .get("name")
                            .and_then(Value::as_str)
                            .map(str::trim)
                            .filter(|name| !name.is_empty())?;
                        Some((id, name.to_owned()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { names }
    }

    /// Adds or replaces one user.
    pub fn insert(&mut self, user_id: i64, name: impl Into<String>) {
        self.names.insert(user_id, name.into());
    }

    /// Looks a user up by an identifier in its textual form.
    #[must_use]
    pub fn display_name(&self, user_id: &str) -> Option<&str> {
        parse_user_id(user_id)
            .and_then(|id| self.names.get(&id))
            .map(String::as_str)
    }

    /// Returns the number of known users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns whether no users are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Ticket metadata together with its user directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketSnapshot {
    /// Ticket metadata.
    pub metadata: TicketMetadata,
    /// Linked users.
    pub directory: UserDirectory,
}

/// Coerces a textual user identifier to the helpdesk's integer form.
#[must_use]
pub fn parse_user_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}
