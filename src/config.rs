//! Configuration management for hive-agent.
//!
//! Configuration can be set via environment variables:
//! - `GOOGLE_API_KEY` - Required. API key for the Gemini API.
//! - `DEFAULT_MODEL` - Optional. The Gemini model to use. Defaults to `gemini-2.5-flash`.
//! - `GEMINI_BASE_URL` - Optional. Base URL of the Gemini REST API.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `MAX_ITERATIONS` - Optional. Maximum model calls per chat request. Defaults to `10`.
//! - `REQUEST_TIMEOUT_SECS` - Optional. Wall-clock budget for one chat request. Defaults to `120`.
//! - `LLM_TIMEOUT_SECS` - Optional. Timeout for a single model call. Defaults to `60`.
//! - `ALLOWED_ORIGINS` - Optional. Comma-separated CORS allow-list.
//! - `SYSTEM_PROMPT` - Optional. Prepend the farm-assistant system prompt. Defaults to `false`.
//!
//! For local development the variables may also live in a `.env` file, see [`load_dotenv`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::http::HeaderValue;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Production site plus the usual local frontend dev servers.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://drhoneypalani.com",
    "https://www.drhoneypalani.com",
    "http://localhost:3000",
    "http://localhost:5173",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to load .env file: {0}")]
    DotEnv(String),
}

/// Load a `.env` file from the working directory or one of its parents.
///
/// Variables already set in the process environment are not overridden.
/// Returns the path of the file that was loaded, if any.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::DotEnv(e.to_string())),
    }
}

/// Load a specific env file. Returns `false` if it does not exist.
pub fn load_dotenv_from(path: &Path) -> Result<bool, ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(ConfigError::DotEnv(format!("{}: {}", path.display(), e))),
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key
    pub api_key: String,

    /// Gemini model identifier
    pub default_model: String,

    /// Base URL of the Gemini REST API (no trailing slash)
    pub gemini_base_url: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum model calls for a single chat request
    pub max_iterations: usize,

    /// Wall-clock budget for a single chat request
    pub request_timeout: Duration,

    /// Timeout applied to each model HTTP call
    pub llm_timeout: Duration,

    /// Origins allowed to read responses cross-origin
    pub allowed_origins: Vec<String>,

    /// Seed conversations with the farm-assistant system prompt
    pub system_prompt: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `GOOGLE_API_KEY` is not set or empty,
    /// and `ConfigError::InvalidValue` if any optional variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GOOGLE_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("GOOGLE_API_KEY".to_string()))?;

        let default_model = lookup("DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let gemini_base_url = lookup("GEMINI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = parse_var(&lookup, "PORT", 3000u16)?;

        let max_iterations = parse_var(&lookup, "MAX_ITERATIONS", 10usize)?;
        if max_iterations == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_ITERATIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let request_timeout = parse_timeout(&lookup, "REQUEST_TIMEOUT_SECS", 120)?;
        let llm_timeout = parse_timeout(&lookup, "LLM_TIMEOUT_SECS", 60)?;

        let system_prompt = lookup("SYSTEM_PROMPT")
            .map(|v| parse_bool(&v).map_err(|e| ConfigError::InvalidValue("SYSTEM_PROMPT".to_string(), e)))
            .transpose()?
            .unwrap_or(false);

        let allowed_origins = match lookup("ALLOWED_ORIGINS") {
            Some(raw) => parse_origins(&raw)?,
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            api_key,
            default_model,
            gemini_base_url,
            host,
            port,
            max_iterations,
            request_timeout,
            llm_timeout,
            allowed_origins,
            system_prompt,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, default_model: String) -> Self {
        Self {
            api_key,
            default_model,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_iterations: 10,
            request_timeout: Duration::from_secs(120),
            llm_timeout: Duration::from_secs(60),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
            system_prompt: false,
        }
    }

    /// Allow-list as header values for the CORS layer.
    pub fn origin_header_values(&self) -> Result<Vec<HeaderValue>, ConfigError> {
        self.allowed_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).map_err(|e| {
                    ConfigError::InvalidValue("ALLOWED_ORIGINS".to_string(), format!("{}: {}", o, e))
                })
            })
            .collect()
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(key.to_string(), format!("{}", e))),
        None => Ok(default),
    }
}

fn parse_timeout<F>(lookup: &F, key: &str, default_secs: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = parse_var(lookup, key, default_secs)?;
    if secs == 0 {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "must be at least 1 second".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        other => Err(format!("expected boolean-like value, got: {}", other)),
    }
}

fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect();

    if origins.is_empty() {
        return Err(ConfigError::InvalidValue(
            "ALLOWED_ORIGINS".to_string(),
            "expected at least one origin".to_string(),
        ));
    }

    for origin in &origins {
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(
                "ALLOWED_ORIGINS".to_string(),
                format!("origin must start with http:// or https://, got: {}", origin),
            ));
        }
    }

    Ok(origins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "GOOGLE_API_KEY"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "k")])).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.default_model, DEFAULT_MODEL);
        assert_eq!(config.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.llm_timeout, Duration::from_secs(60));
        assert_eq!(config.allowed_origins.len(), 4);
        assert!(!config.system_prompt);
        assert!(config
            .allowed_origins
            .contains(&"https://drhoneypalani.com".to_string()));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "k"),
            ("PORT", "8080"),
            ("MAX_ITERATIONS", "3"),
            ("GEMINI_BASE_URL", "http://127.0.0.1:9999/v1beta/"),
            ("ALLOWED_ORIGINS", "https://a.example, http://localhost:4000/ ,"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.gemini_base_url, "http://127.0.0.1:9999/v1beta");
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example".to_string(), "http://localhost:4000".to_string()]
        );
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "k"), ("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref v, _) if v == "PORT"));

        let err = Config::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "k"),
            ("MAX_ITERATIONS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref v, _) if v == "MAX_ITERATIONS"));
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        for key in ["REQUEST_TIMEOUT_SECS", "LLM_TIMEOUT_SECS"] {
            let err = Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "k"), (key, "0")]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(ref v, _) if v == key));
        }

        let config = Config::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "k"),
            ("REQUEST_TIMEOUT_SECS", "1"),
            ("LLM_TIMEOUT_SECS", "1"),
        ]))
        .unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(1));
        assert_eq!(config.llm_timeout, Duration::from_secs(1));
    }

    #[test]
    fn system_prompt_is_opt_in() {
        let config = Config::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "k"),
            ("SYSTEM_PROMPT", "yes"),
        ]))
        .unwrap();
        assert!(config.system_prompt);

        let err = Config::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "k"),
            ("SYSTEM_PROMPT", "sometimes"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref v, _) if v == "SYSTEM_PROMPT"));
    }

    #[test]
    fn dotenv_file_fills_gaps_without_overriding_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "HIVE_AGENT_DOTENV_ONLY=from-file\nHIVE_AGENT_DOTENV_BOTH=from-file\n",
        )
        .unwrap();
        std::env::set_var("HIVE_AGENT_DOTENV_BOTH", "from-env");

        assert!(load_dotenv_from(&path).unwrap());
        assert_eq!(std::env::var("HIVE_AGENT_DOTENV_ONLY").unwrap(), "from-file");
        assert_eq!(std::env::var("HIVE_AGENT_DOTENV_BOTH").unwrap(), "from-env");
    }

    #[test]
    fn missing_dotenv_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!load_dotenv_from(&dir.path().join(".env")).unwrap());
    }

    #[test]
    fn origins_without_scheme_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "k"),
            ("ALLOWED_ORIGINS", "drhoneypalani.com"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref v, _) if v == "ALLOWED_ORIGINS"));
    }
}
