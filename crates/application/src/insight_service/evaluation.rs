use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use ticketsense_core::{AppError, AppResult, TicketId};
use ticketsense_domain::{EvaluationRecord, RecordStatus, clamp_score};
use tracing::{info, warn};

use super::{InsightService, prompts};
use crate::cache_gateway::RecordNamespace;
use crate::insight_ports::GenerationRequest;

#[derive(Debug, Deserialize)]
struct GeneratedEvaluation {
    #[serde(default)]
    language: String,
    tov_score: f64,
    solution_score: f64,
    #[serde(default)]
    errors: Vec<String>,
    next_action: String,
}

impl InsightService {
    /// Returns the quality evaluation of one ticket, generating it on a cache miss.
    pub async fn evaluate(&self, ticket_id: &TicketId) -> AppResult<EvaluationRecord> {
        if let Some(mut cached) = self
            .cache
            .get::<EvaluationRecord>(RecordNamespace::Evaluation, ticket_id)
            .await
        {
            info!(ticket_id = %ticket_id, "evaluation served from cache");
            cached.status = RecordStatus::FromCache;
            return Ok(cached);
        }

        let context = self.load_context(ticket_id).await?;
        if context.transcript.is_empty() {
            info!(ticket_id = %ticket_id, "ticket has no dialogue to evaluate");
            let record = EvaluationRecord::empty(ticket_id.clone(), context.agent, Utc::now());
            if self.settings.cache_empty_dialogue {
                self.cache
                    .put(RecordNamespace::Evaluation, ticket_id, &record)
                    .await;
            }
            return Ok(record);
        }

        let dialogue = context.transcript.render();
        let request = GenerationRequest {
            model: self.settings.model.clone(),
            instruction: prompts::evaluation_instruction(
                dialogue.as_str(),
                self.settings.tov_rules.as_str(),
            ),
            response_schema: prompts::evaluation_schema(),
        };

        let generated = match self
            .generator
            .generate(request)
            .await
            .and_then(parse_evaluation)
        {
            Ok(generated) => generated,
            Err(error) => {
                warn!(ticket_id = %ticket_id, error = %error, "evaluation generation failed");
                return Ok(EvaluationRecord::unavailable(
                    ticket_id.clone(),
                    context.agent,
                    Utc::now(),
                    "evaluation could not be generated",
                ));
            }
        };

        let record = EvaluationRecord {
            ticket_id: ticket_id.clone(),
            language: generated.language,
            tov_score: clamp_generated_score(generated.tov_score),
            solution_score: clamp_generated_score(generated.solution_score),
            errors: generated.errors,
            next_action: generated.next_action,
            analyzed_at: Utc::now(),
            agent_name: context.agent.agent_name,
            assignee_id: context.agent.assignee_id,
            dialogue: self.settings.retain_transcript.then_some(dialogue),
            status: RecordStatus::GeneratedNew,
        };
        self.cache
            .put(RecordNamespace::Evaluation, ticket_id, &record)
            .await;

        info!(
            ticket_id = %ticket_id,
            tov_score = record.tov_score,
            solution_score = record.solution_score,
            errors = record.errors.len(),
            "evaluation generated"
        );
        Ok(record)
    }
}

fn parse_evaluation(value: Value) -> AppResult<GeneratedEvaluation> {
    let generated = serde_json::from_value::<GeneratedEvaluation>(value).map_err(|error| {
        AppError::Upstream(format!("generator returned a malformed evaluation: {error}"))
    })?;

    if !generated.tov_score.is_finite() || !generated.solution_score.is_finite() {
        return Err(AppError::Upstream(
            "generator returned a non-numeric score".to_owned(),
        ));
    }

    let next_action = generated.next_action.trim().to_owned();
    if next_action.is_empty() {
        return Err(AppError::Upstream(
            "generator returned an empty next_action".to_owned(),
        ));
    }

    let language = match generated.language.trim() {
        "" => "unknown".to_owned(),
        language => language.to_owned(),
    };
    Ok(GeneratedEvaluation {
        language,
        tov_score: generated.tov_score,
        solution_score: generated.solution_score,
        errors: generated
            .errors
            .into_iter()
            .map(|error| error.trim().to_owned())
            .filter(|error| !error.is_empty())
            .collect(),
        next_action,
    })
}

fn clamp_generated_score(score: f64) -> u8 {
    clamp_score(score.round() as i64)
}
