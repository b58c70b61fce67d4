use std::sync::Arc;

use ticketsense_application::{AnalyticsService, InsightService, InsightSettings};
use ticketsense_core::{AppError, BasicCredentials};
use ticketsense_domain::TranscriptOptions;
use ticketsense_infrastructure::{GeminiStructuredGenerator, ZendeskTicketingClient};
use tracing::info;

use crate::api_config::ApiConfig;
use crate::origin_policy::OriginPolicy;
use crate::state::AppState;

use super::http::build_http_client;

mod caches;

pub async fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let tov_rules = load_tov_rules(config)?;

    let ticketing = ZendeskTicketingClient::new(
        build_http_client(config.zendesk_timeout_seconds, "helpdesk")?,
        config.zendesk_subdomain.as_str(),
        config.zendesk_email.as_str(),
        config.zendesk_api_token.as_str(),
    );
    let generator = GeminiStructuredGenerator::new(
        build_http_client(config.gemini_timeout_seconds, "generator")?,
        config.gemini_api_key.as_str(),
    );
    let (cache, cache_probe) = caches::build_record_cache(config).await?;

    let settings = InsightSettings {
        model: config.gemini_model.clone(),
        tov_rules,
        cache_empty_dialogue: config.cache_empty_dialogue,
        retain_transcript: config.cache_retain_transcript,
        transcript: TranscriptOptions {
            ignore_phrases: config.transcript_ignore_phrases.clone(),
            max_fallback_comments: config.transcript_max_fallback_comments,
        },
    };

    Ok(AppState {
        insight_service: InsightService::new(
            Arc::new(ticketing),
            Arc::new(generator),
            cache.clone(),
            settings,
        ),
        analytics_service: AnalyticsService::new(cache),
        credentials: Arc::new(BasicCredentials::new(
            config.basic_auth_login.as_str(),
            config.basic_auth_password.as_str(),
        )),
        origin_policy: OriginPolicy::new(&config.cors_allowed_origin_suffixes),
        cache_probe,
    })
}

fn load_tov_rules(config: &ApiConfig) -> Result<String, AppError> {
    let path = config.tov_rules_path.as_path();
    let rules = std::fs::read_to_string(path).map_err(|error| {
        AppError::Validation(format!(
            "failed to read TOV_RULES_PATH '{}': {error}",
            path.display()
        ))
    })?;
    if rules.trim().is_empty() {
        return Err(AppError::Validation(format!(
            "TOV_RULES_PATH '{}' is empty",
            path.display()
        )));
    }

    info!(path = %path.display(), bytes = rules.len(), "loaded tone of voice rules");
    Ok(rules)
}
