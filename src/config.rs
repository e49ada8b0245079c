/*
 * Responsibility
 * - 環境変数の読み込み (PORT, GUARD_*, SESSION_TOKEN_OPTIONS など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::services::guard::SessionTokenConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub body_limit_bytes: usize,
    pub request_timeout_seconds: u64,

    /// Protected prefixes; `/` when unset.
    pub guard_paths: Vec<String>,
    /// Ignore globs relative to each protected prefix.
    pub guard_ignore: Vec<String>,
    pub session_token: SessionTokenConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = split_list(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let body_limit_bytes = std::env::var("BODY_LIMIT_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        let request_timeout_seconds = std::env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let guard_paths = match std::env::var("GUARD_PATHS") {
            Ok(raw) => split_list(&raw),
            Err(_) => vec!["/".to_string()],
        };

        let guard_ignore = split_list(&std::env::var("GUARD_IGNORE").unwrap_or_default());

        let session_token = parse_session_token(
            &std::env::var("SESSION_TOKEN_OPTIONS")
                .map_err(|_| ConfigError::Missing("SESSION_TOKEN_OPTIONS"))?,
        )?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            body_limit_bytes,
            request_timeout_seconds,
            guard_paths,
            guard_ignore,
            session_token,
        })
    }
}

/// Comma separated, trimmed, empties dropped.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_session_token(raw: &str) -> Result<SessionTokenConfig, ConfigError> {
    Ok(serde_json::from_str(raw)?)
}
