use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 60 * 60;
const DEFAULT_MAX_SESSIONS: usize = 1000;

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is set but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// AI features (enhance, PDF extraction) are disabled when absent.
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Request body limit, covers image and PDF uploads.
    pub max_upload_bytes: usize,
    /// Preview sessions untouched for this long are dropped.
    pub session_idle_ttl_secs: u64,
    pub max_sessions: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: match optional_env("MAX_UPLOAD_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
            session_idle_ttl_secs: match optional_env("SESSION_IDLE_TTL_SECS") {
                Some(raw) => raw
                    .parse::<u64>()
                    .context("SESSION_IDLE_TTL_SECS must be a number of seconds")?,
                None => DEFAULT_SESSION_IDLE_TTL_SECS,
            },
            max_sessions: match optional_env("MAX_SESSIONS") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_SESSIONS must be a positive count")?,
                None => DEFAULT_MAX_SESSIONS,
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            session_idle_ttl_secs: DEFAULT_SESSION_IDLE_TTL_SECS,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

/// Unset and blank variables are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
