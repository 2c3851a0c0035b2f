use std::{net::SocketAddr, str::FromStr, time::Duration};

use stockfeed_core::constants::DEFAULT_SYMBOLS;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("text") {
            Ok(LogFormat::Text)
        } else if s.eq_ignore_ascii_case("json") {
            Ok(LogFormat::Json)
        } else {
            Err("expected 'text' or 'json'".to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// `None` disables ingestion.
    pub alpha_vantage_api_key: Option<String>,
    pub symbols: Vec<String>,
    /// `None` disables the background scheduler.
    pub ingest_interval: Option<Duration>,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            db_path: "./db/stockfeed.db".to_string(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30_000),
            alpha_vantage_api_key: None,
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            ingest_interval: Some(Duration::from_secs(86_400)),
            log_format: LogFormat::Text,
        }
    }
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(raw) = lookup("STOCKFEED_LISTEN_ADDR") {
            config.listen_addr = parse_value("STOCKFEED_LISTEN_ADDR", &raw)?;
        }
        if let Some(raw) = lookup("STOCKFEED_DB_PATH").filter(|v| !v.trim().is_empty()) {
            config.db_path = raw;
        }
        if let Some(raw) = lookup("STOCKFEED_CORS_ALLOW_ORIGINS") {
            config.cors_allow = split_list(&raw);
        }
        if let Some(raw) = lookup("STOCKFEED_REQUEST_TIMEOUT_MS") {
            let ms: u64 = parse_value("STOCKFEED_REQUEST_TIMEOUT_MS", &raw)?;
            config.request_timeout = Duration::from_millis(ms);
        }
        config.alpha_vantage_api_key = lookup("ALPHAVANTAGE_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        if let Some(raw) = lookup("STOCKFEED_SYMBOLS") {
            let symbols: Vec<String> = split_list(&raw)
                .into_iter()
                .map(|s| s.to_ascii_uppercase())
                .collect();
            if !symbols.is_empty() {
                config.symbols = symbols;
            }
        }
        if let Some(raw) = lookup("STOCKFEED_INGEST_INTERVAL_SECS") {
            let secs: u64 = parse_value("STOCKFEED_INGEST_INTERVAL_SECS", &raw)?;
            config.ingest_interval = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(raw) = lookup("STOCKFEED_LOG_FORMAT") {
            config.log_format = parse_value("STOCKFEED_LOG_FORMAT", &raw)?;
        }

        Ok(config)
    }
}
