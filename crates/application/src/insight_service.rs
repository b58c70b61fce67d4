//! Ticket insight orchestration.
//!
//! Each feature (summary, evaluation) follows the same sequence: cache lookup,
//! ticket and audit retrieval, transcript extraction, agent resolution,
//! generation, persistence. Features share extraction and resolution but
//! never a cache key.

use std::sync::Arc;

use ticketsense_core::{AppResult, TicketId};
use ticketsense_domain::{TranscriptExtractor, TranscriptOptions};

use crate::cache_gateway::{CacheGateway, RecordNamespace};
use crate::insight_ports::{StructuredGenerator, TicketingPlatform};

mod context;
mod evaluation;
mod prompts;
mod summary;


/// Behavior switches of the insight pipeline.
#[derive(Debug, Clone)]
pub struct InsightSettings {
    /// Generator model identifier.
    pub model: String,
    /// Tone-of-voice policy document embedded verbatim in evaluation prompts.
    pub tov_rules: String,
    /// Whether empty-dialogue placeholders are cached.
    pub cache_empty_dialogue: bool,
    /// Whether generated records keep the rendered dialogue.
    pub retain_transcript: bool,
    /// Transcript extraction options.
    pub transcript: TranscriptOptions,
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_owned(),
            tov_rules: String::new(),
            cache_empty_dialogue: false,
            retain_transcript: false,
            transcript: TranscriptOptions::default(),
        }
    }
}

/// Application service producing cached ticket summaries and evaluations.
#[derive(Clone)]
pub struct InsightService {
    ticketing: Arc<dyn TicketingPlatform>,
    generator: Arc<dyn StructuredGenerator>,
    cache: CacheGateway,
    extractor: TranscriptExtractor,
    settings: Arc<InsightSettings>,
}

impl InsightService {
    /// Creates the insight service.
    #[must_use]
    pub fn new(
        ticketing: Arc<dyn TicketingPlatform>,
        generator: Arc<dyn StructuredGenerator>,
        cache: CacheGateway,
        settings: InsightSettings,
    ) -> Self {
        Self {
            ticketing,
            generator,
            cache,
            extractor: TranscriptExtractor::new(settings.transcript.clone()),
            settings: Arc::new(settings),
        }
    }

    /// Drops one cached record so the next request regenerates it.
    pub async fn evict(&self, namespace: RecordNamespace, ticket_id: &TicketId) -> AppResult<bool> {
        self.cache.evict(namespace, ticket_id).await
    }
}
