use std::fmt::{Display, Formatter};

use crate::audit::{ActorRole, AuditEvent, AuditLog, CommentEvent, HistoryItem, HistoryItemKind};
use crate::ticket::UserDirectory;

/// Bot menu phrases dropped from chat histories by default.
pub const DEFAULT_IGNORE_PHRASES: [&str; 2] = ["Main Menu", "Start Chat"];
/// Default cap on comments used when a ticket has no chat history.
pub const DEFAULT_MAX_FALLBACK_COMMENTS: usize = 50;
/// Name used for chat participants that cannot be resolved.
pub const UNRESOLVED_CHAT_NAME: &str = "User";
/// Name used for comment authors that cannot be resolved.
pub const UNRESOLVED_COMMENT_AUTHOR: &str = "AGENT";

/// Speaker label attached to chat utterances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakerRole {
    /// The requester.
    Client,
    /// A support agent.
    Agent,
}

impl SpeakerRole {
    /// Returns the transcript label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Client => "CLIENT",
            Self::Agent => "AGENT",
        }
    }
}

/// One line of the reconstructed dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    role: Option<SpeakerRole>,
    name: Option<String>,
    text: String,
}

impl Utterance {
    /// Speaker role; comments are unlabeled.
    #[must_use]
    pub fn role(&self) -> Option<SpeakerRole> {
        self.role
    }

    /// Resolved display name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Trimmed, non-empty text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }
}

impl Display for Utterance {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.role, self.name.as_deref()) {
            (Some(role), Some(name)) => write!(formatter, "{} ({name}): {}", role.label(), self.text),
            (Some(role), None) => write!(formatter, "{}: {}", role.label(), self.text),
            (None, Some(name)) => write!(formatter, "{name}: {}", self.text),
            (None, None) => formatter.write_str(self.text.as_str()),
        }
    }
}

/// Ordered dialogue reconstructed from an audit log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    utterances: Vec<Utterance>,
}

impl Transcript {
    /// Utterances in chronological order.
    #[must_use]
    pub fn utterances(&self) -> &[Utterance] {
        self.utterances.as_slice()
    }

    /// Returns whether no dialogue was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    /// Returns the number of utterances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    /// Renders utterances as newline-delimited text.
    #[must_use]
    pub fn render(&self) -> String {
        self.utterances
            .iter()
            .map(Utterance::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Tuning knobs for transcript extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptOptions {
    /// Phrases whose presence drops a chat message.
    pub ignore_phrases: Vec<String>,
    /// Maximum number of comments used by the fallback pass.
    pub max_fallback_comments: usize,
}

impl Default for TranscriptOptions {
    fn default() -> Self {
        Self {
            ignore_phrases: DEFAULT_IGNORE_PHRASES
                .iter()
                .map(|phrase| (*phrase).to_owned())
                .collect(),
            max_fallback_comments: DEFAULT_MAX_FALLBACK_COMMENTS,
        }
    }
}

/// Rebuilds the human dialogue from an audit log.
///
/// Chat histories take strict precedence. Public comments are only read when
/// the whole log yields no chat utterance.
#[derive(Debug, Clone, Default)]
pub struct TranscriptExtractor {
    options: TranscriptOptions,
}

impl TranscriptExtractor {
    /// Creates an extractor with the given options.
    #[must_use]
    pub fn new(options: TranscriptOptions) -> Self {
        Self { options }
    }

    /// Extracts the transcript.
    #[must_use]
    pub fn extract(&self, audit_log: &AuditLog, directory: &UserDirectory) -> Transcript {
        let utterances = self.chat_utterances(audit_log, directory);
        if !utterances.is_empty() {
            return Transcript { utterances };
        }

        Transcript {
            utterances: self.comment_utterances(audit_log, directory),
        }
    }

    fn chat_utterances(&self, audit_log: &AuditLog, directory: &UserDirectory) -> Vec<Utterance> {
        audit_log
            .audits()
            .iter()
            .flat_map(|audit| audit.events.iter())
            .filter_map(|event| match event {
                AuditEvent::ChatStarted { history } => Some(history),
                _ => None,
            })
            .flatten()
            .filter_map(|item| self.chat_utterance(item, directory))
            .collect()
    }

    fn chat_utterance(&self, item: &HistoryItem, directory: &UserDirectory) -> Option<Utterance> {
        if item.kind != HistoryItemKind::ChatMessage {
            return None;
        }

        let text = item.message.trim();
        if text.is_empty() || self.is_ignored(text) {
            return None;
        }

        let role = match item.actor_role {
            ActorRole::EndUser => SpeakerRole::Client,
            ActorRole::Agent => SpeakerRole::Agent,
            ActorRole::Other => return None,
        };

        let name = item
            .author_id
            .as_deref()
            .and_then(|author_id| directory.display_name(author_id))
            .or(item.author_name.as_deref())
            .unwrap_or(UNRESOLVED_CHAT_NAME);

        Some(Utterance {
            role: Some(role),
            name: Some(name.to_owned()),
            text: text.to_owned(),
        })
    }

    fn comment_utterances(
        &self,
        audit_log: &AuditLog,
        directory: &UserDirectory,
    ) -> Vec<Utterance> {
        audit_log
            .audits()
            .iter()
            .flat_map(|audit| audit.events.iter())
            .filter_map(|event| match event {
                AuditEvent::Comment(comment) => comment_utterance(comment, directory),
                _ => None,
            })
            .take(self.options.max_fallback_comments)
            .collect()
    }

    fn is_ignored(&self, text: &str) -> bool {
        self.options
            .ignore_phrases
            .iter()
            .filter(|phrase| !phrase.is_empty())
            .any(|phrase| text.contains(phrase.as_str()))
    }
}

fn comment_utterance(comment: &CommentEvent, directory: &UserDirectory) -> Option<Utterance> {
    if !comment.public {
        return None;
    }

    let text = comment.preferred_body()?.trim();
    let name = comment
        .author_id
        .as_deref()
        .and_then(|author_id| directory.display_name(author_id))
        .unwrap_or(UNRESOLVED_COMMENT_AUTHOR);

    Some(Utterance {
        role: None,
        name: Some(name.to_owned()),
        text: text.to_owned(),
    })
}

#[cfg(test)]
mod tests;
