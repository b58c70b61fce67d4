//! Domain model of ticket dialogues and their generated assessments.

#![forbid(unsafe_code)]

mod agent;
mod audit;
mod record;
mod ticket;
mod transcript;

pub use agent::{AgentIdentity, UNKNOWN_AGENT_NAME, resolve_agent};
pub use audit::{
    ActorRole, Audit, AuditEvent, AuditLog, CommentEvent, HistoryItem, HistoryItemKind,
};
pub use record::{
    EvaluationRecord, MAX_SCORE, QUALITY_THRESHOLD, RecordStatus, SummaryRecord, clamp_score,
};
pub use ticket::{TicketMetadata, TicketSnapshot, UserDirectory, parse_user_id};
pub use transcript::{
    DEFAULT_IGNORE_PHRASES, DEFAULT_MAX_FALLBACK_COMMENTS, SpeakerRole, Transcript,
    TranscriptExtractor, TranscriptOptions, Utterance,
};
