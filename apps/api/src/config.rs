use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_API_URL;

/// Key shipped in sample env files. Treated exactly like a missing key.
pub const PLACEHOLDER_API_KEY: &str = "sk-proj-your-openai-api-key-here";
const DEFAULT_SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Application configuration loaded from environment variables.
/// Fails at startup if a set variable is malformed or `REDIS_URL` is missing
/// while `DATABASE_URL` is set.
#[derive(Debug, Clone)]
pub struct Config {
    /// `None` runs the service on in-memory stores (demo mode).
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    /// `None` when unset, blank, or the placeholder: generation uses the local template.
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub session_ttl_secs: u64,
    pub bcrypt_cost: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let database_url = optional_env("DATABASE_URL");
        let redis_url = optional_env("REDIS_URL");
        if database_url.is_some() && redis_url.is_none() {
            anyhow::bail!("REDIS_URL must be set when DATABASE_URL is set");
        }

        Ok(Config {
            database_url,
            redis_url,
            openai_api_key: usable_api_key(optional_env("OPENAI_API_KEY")),
            openai_api_url: optional_env("OPENAI_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            session_ttl_secs: parse_env("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?,
            bcrypt_cost: parse_env("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Filters out blank and placeholder API keys.
pub fn usable_api_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY)
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_key_is_unusable() {
        assert_eq!(usable_api_key(Some(PLACEHOLDER_API_KEY.to_string())), None);
    }

    #[test]
    fn test_blank_key_is_unusable() {
        assert_eq!(usable_api_key(Some("   ".to_string())), None);
        assert_eq!(usable_api_key(None), None);
    }

    #[test]
    fn test_real_key_is_trimmed() {
        assert_eq!(
            usable_api_key(Some(" sk-live-123 \n".to_string())),
            Some("sk-live-123".to_string())
        );
    }
}
