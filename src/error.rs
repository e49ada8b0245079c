/*
 * Responsibility
 * - 構築時エラー (ConfigError): gate / authenticator / 環境変数の設定不備
 * - クライアント向け JSON エラー (ErrorResponse) の定義と IntoResponse
 *
 * Notes
 * - 認証拒否はエラーではない (gate が 401 レスポンス値として返す)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::guard::{HookOutcome, Rejection};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// Fatal configuration failures. Raised while building a gate, an
/// authenticator or the process config; never at request time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("authenticator must be supplied")]
    MissingAuthenticator,

    #[error("invalid ignore pattern {pattern:?}: {source}")]
    InvalidIgnorePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("invalid session token options: {0}")]
    InvalidSessionOptions(#[from] serde_json::Error),

    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    #[error("missing configuration: {0}")]
    Missing(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Client-facing error, rendered as `{"error": {"code", "message"}}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },
}

impl AppError {
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Unauthorized { reason } => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", reason)
            }
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

/// Error hook: replaces the bare 401 with the JSON envelope carrying the
/// authenticator's reason.
pub fn render_rejection(_response: &Response, rejection: &Rejection) -> HookOutcome<Response> {
    HookOutcome::Replace(AppError::unauthorized(rejection.authenticator_error.clone()).into_response())
}
