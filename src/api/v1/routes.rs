/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 認証の要否は guard (GUARD_PATHS / GUARD_IGNORE) 側で決める
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, ping::ping};

pub fn routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ping", get(ping))
}
