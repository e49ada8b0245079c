/*
 * Responsibility
 * - Rule: (path, host) から「このリクエストを認証するか」を判定
 * - RuleChain: Rule を順に評価 (AND, 最初の false で打ち切り)
 * - axum の Request から path / host を取り出す (プロセス全体のグローバルは読まない)
 */
use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Request},
    http::header,
};

mod path;

pub use path::PathRule;

/// A single authentication-scope rule.
///
/// Returning `false` means "do not authenticate this request".
pub trait Rule: Send + Sync {
    fn evaluate(&self, path: &str, host: &str) -> bool;
}

impl<F> Rule for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn evaluate(&self, path: &str, host: &str) -> bool {
        self(path, host)
    }
}

#[derive(Clone, Default)]
pub struct RuleChain {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: impl Rule + 'static) {
        self.rules.push(Arc::new(rule));
    }

    /// All rules must pass; the first `false` stops evaluation.
    pub fn should_authenticate(&self, request: &Request) -> bool {
        let path = request_path(request);
        let host = request_host(request);
        self.evaluate(path, host)
    }

    pub fn evaluate(&self, path: &str, host: &str) -> bool {
        self.rules.iter().all(|rule| rule.evaluate(path, host))
    }
}

impl std::fmt::Debug for RuleChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleChain")
            .field("rules", &self.rules.len())
            .finish()
    }
}

/// Path as the client sent it. Inside `Router::nest` the request URI has the
/// prefix stripped, so prefer the `OriginalUri` extension when present.
pub fn request_path(request: &Request) -> &str {
    request
        .extensions()
        .get::<OriginalUri>()
        .map(|OriginalUri(uri)| uri.path())
        .unwrap_or_else(|| request.uri().path())
}

/// `Host` header, then the URI authority, then empty.
pub fn request_host(request: &Request) -> &str {
    request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| request.uri().authority().map(|a| a.as_str()))
        .unwrap_or("")
}
