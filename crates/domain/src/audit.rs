use serde_json::Value;

/// Event kind carrying an embedded chat history.
pub const CHAT_STARTED_EVENT_KIND: &str = "ChatStartedEvent";
/// Event kind for a ticket comment.
pub const COMMENT_EVENT_KIND: &str = "Comment";
/// Event kind for a ticket field change.
pub const CHANGE_EVENT_KIND: &str = "Change";
/// History item kind for a chat message.
pub const CHAT_MESSAGE_KIND: &str = "ChatMessage";
/// Actor role of the requester inside a chat history.
pub const END_USER_ACTOR: &str = "end-user";
/// Actor role of a support agent inside a chat history.
pub const AGENT_ACTOR: &str = "agent";

/// Ordered sequence of audits for one ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLog {
    audits: Vec<Audit>,
}

impl AuditLog {
    /// Creates an audit log from already classified audits.
    #[must_use]
    pub fn new(audits: Vec<Audit>) -> Self {
        Self { audits }
    }

    /// Classifies a raw audit payload.
    ///
    /// Accepts either the `{"audits": [...]}` envelope or a bare array.
    /// Anything else yields an empty log.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let audits = value
            .get("audits")
            .and_then(Value::as_array)
            .or_else(|| value.as_array())
            .map(|audits| audits.iter().map(Audit::from_json).collect())
            .unwrap_or_default();

        Self { audits }
    }

    /// Returns audits in chronological order.
    #[must_use]
    pub fn audits(&self) -> &[Audit] {
        self.audits.as_slice()
    }

    /// Returns whether the log holds no audits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.audits.is_empty()
    }
}

/// One historical record block with its events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Audit {
    /// Identifier from the structured `assignee` reference, when present.
    pub assignee: Option<String>,
    /// Bare `assignee_id` field, when present.
    pub assignee_id: Option<String>,
    /// Events in source order.
    pub events: Vec<AuditEvent>,
}

impl Audit {
    fn from_json(value: &Value) -> Self {
        Self {
            assignee: value
                .get("assignee")
                .and_then(|assignee| assignee.get("id"))
                .and_then(external_id),
            assignee_id: value.get("assignee_id").and_then(external_id),
            events: value
                .get("events")
                .and_then(Value::as_array)
                .map(|events| events.iter().map(AuditEvent::from_json).collect())
                .unwrap_or_default(),
        }
    }
}

/// Audit event kinds the dialogue pipeline understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    /// Chat session with its embedded message history.
    ChatStarted {
        /// History items in source order.
        history: Vec<HistoryItem>,
    },
    /// Ticket comment.
    Comment(CommentEvent),
    /// Ticket field change.
    Change {
        /// Changed field name.
        field_name: String,
        /// New value rendered as text, when non-empty.
        value: Option<String>,
    },
    /// Any other event kind.
    Other,
}

impl AuditEvent {
    /// Classifies one raw event by its `type` tag.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value.get("type").and_then(Value::as_str) {
            Some(CHAT_STARTED_EVENT_KIND) => {
                let history = value
                    .get("value")
                    .and_then(|inner| inner.get("history"))
                    .and_then(Value::as_array)
                    .or_else(|| value.get("history").and_then(Value::as_array))
                    .map(|items| items.iter().map(HistoryItem::from_json).collect())
                    .unwrap_or_default();

                Self::ChatStarted { history }
            }
            Some(COMMENT_EVENT_KIND) => Self::Comment(CommentEvent {
                public: value.get("public").and_then(Value::as_bool).unwrap_or(false),
                plain_body: value.get("plain_body").and_then(text),
                body: value.get("body").and_then(text),
                author_id: value.get("author_id").and_then(external_id),
            }),
            Some(CHANGE_EVENT_KIND) => Self::Change {
                field_name: value
                    .get("field_name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_owned(),
                value: value.get("value").and_then(external_id),
            },
            _ => Self::Other,
        }
    }
}

/// Public or internal ticket comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentEvent {
    /// Whether the requester can see the comment.
    pub public: bool,
    /// Plain-text body.
    pub plain_body: Option<String>,
    /// Rich body.
    pub body: Option<String>,
    /// Author user identifier.
    pub author_id: Option<String>,
}

impl CommentEvent {
    /// Returns the preferred body, plain text first.
    #[must_use]
    pub fn preferred_body(&self) -> Option<&str> {
        self.plain_body
            .as_deref()
            .filter(|body| !body.trim().is_empty())
            .or_else(|| self.body.as_deref().filter(|body| !body.trim().is_empty()))
    }
}

/// Kind tag of a chat history item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryItemKind {
    /// A message typed by a participant.
    ChatMessage,
    /// Joins, leaves, file uploads and other chat noise.
    Other,
}

/// Role of the participant behind a chat history item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    /// The requester.
    EndUser,
    /// A support agent.
    Agent,
    /// Bots, triggers and unknown roles.
    Other,
}

/// One entry of an embedded chat history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    /// Item kind.
    pub kind: HistoryItemKind,
    /// Participant role.
    pub actor_role: ActorRole,
    /// Message body; absent or null bodies become empty.
    pub message: String,
    /// Author user identifier.
    pub author_id: Option<String>,
    /// Inline author display name.
    pub author_name: Option<String>,
}

impl HistoryItem {
    fn from_json(value: &Value) -> Self {
        let kind = match value.get("type").and_then(Value::as_str) {
            Some(CHAT_MESSAGE_KIND) => HistoryItemKind::ChatMessage,
            _ => HistoryItemKind::Other,
        };
        let actor_role = match value.get("actor_type").and_then(Value::as_str) {
            Some(END_USER_ACTOR) => ActorRole::EndUser,
            Some(AGENT_ACTOR) => ActorRole::Agent,
            _ => ActorRole::Other,
        };

        Self {
            kind,
            actor_role,
            message: value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            author_id: value.get("actor_id").and_then(external_id),
            author_name: value
                .get("actor_name")
                .and_then(text)
                .filter(|name| !name.trim().is_empty()),
        }
    }
}

/// Renders an identifier that may arrive as a JSON number or string.
pub(crate) fn external_id(value: &Value) -> Option<String> {
    match value {
        Value::Number(number) => Some(number.to_string()),
        Value::String(raw) => {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        _ => None,
    }
}

fn text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}
