/*
 * Responsibility
 * - Config読み込み → Authenticator / Gate 生成 → Router 組み立て
 * - Middleware の適用順: http (外側) → cors → security headers → guard (内側)
 * - axum::serve() で起動
 */
use std::sync::Arc;

use anyhow::Result;
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::error::{ConfigError, render_rejection};
use crate::middleware;
use crate::services::guard::{Gate, SessionTokenAuthenticator};

fn init_tracing() {
    // RUST_LOG=info,route_guard=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    tracing::info!(
        paths = ?config.guard_paths,
        ignore = ?config.guard_ignore,
        "starting in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let gate = Arc::new(build_gate(&config)?);
    let app = build_router(&config, gate);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Session-token gate over the configured paths; rejections render as JSON.
pub fn build_gate(config: &Config) -> Result<Gate, ConfigError> {
    let authenticator = SessionTokenAuthenticator::new(config.session_token.clone())?;

    Gate::builder()
        .authenticator(authenticator)
        .paths(config.guard_paths.clone())
        .ignore(config.guard_ignore.clone())
        .error(render_rejection)
        .build()
}

pub fn build_router(config: &Config, gate: Arc<Gate>) -> Router {
    let router = Router::new()
        .route("/health", get(api::v1::handlers::health::health))
        .nest("/api/v1", api::v1::routes());

    let router = middleware::guard::apply(router, gate);
    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}
