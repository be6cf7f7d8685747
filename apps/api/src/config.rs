use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite:events_database.db?mode=ro";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.1-70b-versatile";

/// Application configuration loaded from environment variables.
/// Startup fails if `GROQ_API_KEY` is missing or a numeric variable is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub groq_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_max_tokens: u32,
    pub sql_temperature: f32,
    pub summary_temperature: f32,
    pub pipeline_timeout: Duration,
    pub result_store_capacity: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            groq_api_key: require_env("GROQ_API_KEY")?,
            llm_base_url: env_or("LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
            llm_model: env_or("LLM_MODEL", DEFAULT_LLM_MODEL),
            llm_max_tokens: parse_env("LLM_MAX_TOKENS", 300)?,
            sql_temperature: parse_env("SQL_TEMPERATURE", 0.1)?,
            summary_temperature: parse_env("SUMMARY_TEMPERATURE", 0.3)?,
            pipeline_timeout: Duration::from_secs(parse_env("PIPELINE_TIMEOUT_SECS", 60)?),
            result_store_capacity: parse_env("RESULT_STORE_CAPACITY", 256)?,
            port: parse_env("PORT", 6001)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_value(key, std::env::var(key).ok(), default)
}

fn parse_value<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_env_fails_when_unset() {
        let err = require_env("SQLRAG_TEST_UNSET_API_KEY").unwrap_err();
        assert!(err.to_string().contains("SQLRAG_TEST_UNSET_API_KEY"));
        assert!(err.to_string().contains("not set"));
    }

    #[test]
    fn test_require_env_reads_value() {
        std::env::set_var("SQLRAG_TEST_SET_API_KEY", "gsk_test");
        assert_eq!(require_env("SQLRAG_TEST_SET_API_KEY").unwrap(), "gsk_test");
    }

    #[test]
    fn test_parse_value_falls_back_to_default() {
        let port: u16 = parse_value("PORT", None, 6001).unwrap();
        assert_eq!(port, 6001);
    }

    #[test]
    fn test_parse_value_reads_override() {
        let temp: f32 = parse_value("SQL_TEMPERATURE", Some(" 0.25 ".to_string()), 0.1).unwrap();
        assert!((temp - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        let err = parse_value::<u16>("PORT", Some("eighty".to_string()), 6001).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
