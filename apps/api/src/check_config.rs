//! `check-config` diagnostics: which settings are present, values masked.

use std::env;

use tracing::{info, warn};

use crate::api_config::ApiConfig;

const REQUIRED_KEYS: [&str; 6] = [
    "BASIC_AUTH_LOGIN",
    "BASIC_AUTH_PASSWORD",
    "ZENDESK_SUBDOMAIN",
    "ZENDESK_EMAIL",
    "ZENDESK_API_TOKEN",
    "GEMINI_API_KEY",
];

const OPTIONAL_KEYS: [&str; 15] = [
    "API_HOST",
    "API_PORT",
    "ZENDESK_TIMEOUT_SECONDS",
    "GEMINI_MODEL",
    "GEMINI_TIMEOUT_SECONDS",
    "CACHE_BACKEND",
    "REDIS_URL",
    "CACHE_KEY_PREFIX",
    "CACHE_TTL_SECONDS",
    "CACHE_EMPTY_DIALOGUE",
    "CACHE_RETAIN_TRANSCRIPT",
    "TOV_RULES_PATH",
    "TRANSCRIPT_IGNORE_PHRASES",
    "TRANSCRIPT_MAX_FALLBACK_COMMENTS",
    "CORS_ALLOWED_ORIGIN_SUFFIXES",
];

#[derive(Debug, PartialEq, Eq)]
pub struct KeyReport {
    pub name: &'static str,
    pub required: bool,
    pub masked_value: Option<String>,
}

/// Logs one line per known key and whether the full configuration loads.
pub fn run() {
    let reports = collect(|name| env::var(name).ok());
    for report in &reports {
        match (&report.masked_value, report.required) {
            (Some(value), _) => info!(key = report.name, value = %value, "set"),
            (None, true) => warn!(key = report.name, "missing required key"),
            (None, false) => info!(key = report.name, "unset, using default"),
        }
    }

    match ApiConfig::load() {
        Ok(config) => info!(
            cache_backend = ?config.cache_backend,
            tov_rules_path = %config.tov_rules_path.display(),
            "configuration is valid"
        ),
        Err(error) => warn!(error = %error, "configuration is invalid"),
    }
}

pub fn collect<F>(lookup: F) -> Vec<KeyReport>
where
    F: Fn(&str) -> Option<String>,
{
    let required = REQUIRED_KEYS.iter().map(|name| (*name, true));
    let optional = OPTIONAL_KEYS.iter().map(|name| (*name, false));

    required
        .chain(optional)
        .map(|(name, required)| KeyReport {
            name,
            required,
            masked_value: lookup(name)
                .filter(|value| !value.trim().is_empty())
                .map(|value| mask(value.as_str())),
        })
        .collect()
}

fn mask(value: &str) -> String {
    let visible: String = value.chars().take(2).collect();
    if value.chars().count() <= 4 {
        "***".to_owned()
    } else {
        format!("{visible}***")
    }
}

#[cfg(test)]
mod tests {
    use super::{collect, mask};

    #[test]
    fn masks_values() {
        assert_eq!(mask("abc"), "***");
        assert_eq!(mask("supersecret"), "su***");
    }

    #[test]
    fn reports_missing_and_present_keys() {
        let reports = collect(|name| match name {
            "GEMINI_API_KEY" => Some("AIzaSyExample".to_owned()),
            "ZENDESK_EMAIL" => Some("  ".to_owned()),
            _ => None,
        });

        let gemini = reports.iter().find(|report| report.name == "GEMINI_API_KEY");
        assert!(gemini.is_some_and(|report| report.required
            && report.masked_value.as_deref() == Some("AI***")));

        let email = reports.iter().find(|report| report.name == "ZENDESK_EMAIL");
        assert!(email.is_some_and(|report| report.masked_value.is_none()));

        let redis = reports.iter().find(|report| report.name == "REDIS_URL");
        assert!(redis.is_some_and(|report| !report.required));
    }
}
