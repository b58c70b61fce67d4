use serde::Deserialize;
use serde_json::Value;
use ticketsense_core::{AppError, AppResult, TicketId};
use ticketsense_domain::{RecordStatus, SummaryRecord};
use tracing::{info, warn};

use super::{InsightService, prompts};
use crate::cache_gateway::RecordNamespace;
use crate::insight_ports::GenerationRequest;

#[derive(Debug, Deserialize)]
struct GeneratedSummary {
    issue: String,
    action: String,
    result: String,
}

impl InsightService {
    /// Returns the summary of one ticket, generating it on a cache miss.
    pub async fn summarize(&self, ticket_id: &TicketId) -> AppResult<SummaryRecord> {
        if let Some(mut cached) = self
            .cache
            .get::<SummaryRecord>(RecordNamespace::Summary, ticket_id)
            .await
        {
            info!(ticket_id = %ticket_id, "summary served from cache");
            cached.status = RecordStatus::FromCache;
            return Ok(cached);
        }

        let context = self.load_context(ticket_id).await?;
        if context.transcript.is_empty() {
            info!(ticket_id = %ticket_id, "ticket has no dialogue to summarize");
            let record = SummaryRecord::empty(ticket_id.clone(), context.agent);
            if self.settings.cache_empty_dialogue {
                self.cache
                    .put(RecordNamespace::Summary, ticket_id, &record)
                    .await;
            }
            return Ok(record);
        }

        let dialogue = context.transcript.render();
        let request = GenerationRequest {
            model: self.settings.model.clone(),
            instruction: prompts::summary_instruction(dialogue.as_str()),
            response_schema: prompts::summary_schema(),
        };

        let generated = match self
            .generator
            .generate(request)
            .await
            .and_then(parse_summary)
        {
            Ok(generated) => generated,
            Err(error) => {
                warn!(ticket_id = %ticket_id, error = %error, "summary generation failed");
                return Ok(SummaryRecord::unavailable(
                    ticket_id.clone(),
                    context.agent,
                    "summary could not be generated",
                ));
            }
        };

        let record = SummaryRecord {
            ticket_id: ticket_id.clone(),
            issue: generated.issue,
            action: generated.action,
            result: generated.result,
            agent_name: context.agent.agent_name,
            assignee_id: context.agent.assignee_id,
            dialogue: self.settings.retain_transcript.then_some(dialogue),
            status: RecordStatus::GeneratedNew,
        };
        self.cache
            .put(RecordNamespace::Summary, ticket_id, &record)
            .await;

        info!(
            ticket_id = %ticket_id,
            utterances = context.transcript.len(),
            "summary generated"
        );
        Ok(record)
    }
}

fn parse_summary(value: Value) -> AppResult<GeneratedSummary> {
    let generated = serde_json::from_value::<GeneratedSummary>(value).map_err(|error| {
        AppError::Upstream(format!("generator returned a malformed summary: {error}"))
    })?;

    let summary = GeneratedSummary {
        issue: generated.issue.trim().to_owned(),
        action: generated.action.trim().to_owned(),
        result: generated.result.trim().to_owned(),
    };
    if summary.issue.is_empty() || summary.action.is_empty() || summary.result.is_empty() {
        return Err(AppError::Upstream(
            "generator returned an empty summary field".to_owned(),
        ));
    }

    Ok(summary)
}
