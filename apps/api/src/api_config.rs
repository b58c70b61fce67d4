use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use ticketsense_core::AppError;
use ticketsense_domain::{DEFAULT_IGNORE_PHRASES, DEFAULT_MAX_FALLBACK_COMMENTS};
use tracing_subscriber::EnvFilter;

const DEFAULT_ORIGIN_SUFFIXES: [&str; 2] = [".zendesk.com", ".apps.zdusercontent.com"];

/// Backing store selected for the record cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackendConfig {
    /// No cache; every request regenerates.
    Disabled,
    /// Process-local store.
    Memory,
    /// Redis at the given URL.
    Redis(String),
}

#[derive(Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub basic_auth_login: String,
    pub basic_auth_password: String,
    pub zendesk_subdomain: String,
    pub zendesk_email: String,
    pub zendesk_api_token: String,
    pub zendesk_timeout_seconds: u64,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_timeout_seconds: u64,
    pub cache_backend: CacheBackendConfig,
    pub cache_key_prefix: String,
    pub cache_ttl_seconds: u64,
    pub cache_empty_dialogue: bool,
    pub cache_retain_transcript: bool,
    pub tov_rules_path: PathBuf,
    pub transcript_ignore_phrases: Vec<String>,
    pub transcript_max_fallback_comments: usize,
    pub cors_allowed_origin_suffixes: Vec<String>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };

        let api_host = env.or_default("API_HOST", "127.0.0.1");
        let api_port = env.parse_or("API_PORT", 8000_u16)?;

        let basic_auth_login = env.required_non_empty("BASIC_AUTH_LOGIN")?;
        let basic_auth_password = env.required_non_empty("BASIC_AUTH_PASSWORD")?;

        let zendesk_subdomain = env.required_non_empty("ZENDESK_SUBDOMAIN")?;
        let zendesk_email = env.required_non_empty("ZENDESK_EMAIL")?;
        let zendesk_api_token = env.required_non_empty("ZENDESK_API_TOKEN")?;
        let zendesk_timeout_seconds = env.parse_or("ZENDESK_TIMEOUT_SECONDS", 15_u64)?;

        let gemini_api_key = env.required_non_empty("GEMINI_API_KEY")?;
        let gemini_model = env.or_default("GEMINI_MODEL", "gemini-2.5-flash");
        let gemini_timeout_seconds = env.parse_or("GEMINI_TIMEOUT_SECONDS", 60_u64)?;

        let redis_url = env.optional_non_empty("REDIS_URL");
        let cache_backend = match env
            .or_default("CACHE_BACKEND", "redis")
            .to_ascii_lowercase()
            .as_str()
        {
            "redis" => redis_url.map_or(CacheBackendConfig::Disabled, CacheBackendConfig::Redis),
            "memory" => CacheBackendConfig::Memory,
            "disabled" | "none" => CacheBackendConfig::Disabled,
            other => {
                return Err(AppError::Validation(format!(
                    "CACHE_BACKEND must be one of 'redis', 'memory' or 'disabled', got '{other}'"
                )));
            }
        };

        let cache_key_prefix = env.or_default("CACHE_KEY_PREFIX", "ticketsense");
        let cache_ttl_seconds = env.parse_or("CACHE_TTL_SECONDS", 0_u64)?;
        let cache_empty_dialogue = env.flag("CACHE_EMPTY_DIALOGUE")?;
        let cache_retain_transcript = env.flag("CACHE_RETAIN_TRANSCRIPT")?;

        let tov_rules_path = PathBuf::from(env.or_default("TOV_RULES_PATH", "config/tov_rules.md"));
        let transcript_ignore_phrases = env
            .lookup("TRANSCRIPT_IGNORE_PHRASES")
            .map(|value| split_list(value.as_str()))
            .unwrap_or_else(|| to_owned_list(&DEFAULT_IGNORE_PHRASES));
        let transcript_max_fallback_comments = env.parse_or(
            "TRANSCRIPT_MAX_FALLBACK_COMMENTS",
            DEFAULT_MAX_FALLBACK_COMMENTS,
        )?;

        let cors_allowed_origin_suffixes = env
            .optional_non_empty("CORS_ALLOWED_ORIGIN_SUFFIXES")
            .map(|value| split_list(value.as_str()))
            .unwrap_or_else(|| to_owned_list(&DEFAULT_ORIGIN_SUFFIXES));

        Ok(Self {
            api_host,
            api_port,
            basic_auth_login,
            basic_auth_password,
            zendesk_subdomain,
            zendesk_email,
            zendesk_api_token,
            zendesk_timeout_seconds,
            gemini_api_key,
            gemini_model,
            gemini_timeout_seconds,
            cache_backend,
            cache_key_prefix,
            cache_ttl_seconds,
            cache_empty_dialogue,
            cache_retain_transcript,
            tov_rules_path,
            transcript_ignore_phrases,
            transcript_max_fallback_comments,
            cors_allowed_origin_suffixes,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
    }

    fn optional_non_empty(&self, name: &str) -> Option<String> {
        self.lookup(name)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    }

    fn or_default(&self, name: &str, default: &str) -> String {
        self.optional_non_empty(name)
            .unwrap_or_else(|| default.to_owned())
    }

    fn required_non_empty(&self, name: &str) -> Result<String, AppError> {
        let value = self
            .lookup(name)
            .ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{name} must not be empty")));
        }

        Ok(value)
    }

    fn parse_or<T>(&self, name: &str, default: T) -> Result<T, AppError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional_non_empty(name) {
            Some(value) => value
                .parse::<T>()
                .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}"))),
            None => Ok(default),
        }
    }

    fn flag(&self, name: &str) -> Result<bool, AppError> {
        match self.optional_non_empty(name) {
            None => Ok(false),
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(AppError::Validation(format!(
                    "{name} must be a boolean, got '{value}'"
                ))),
            },
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}
