/*
 * Responsibility
 * - Gate: rules → authenticator → hooks → downstream を 1 リクエストにつき 1 回
 * - GateBuilder: gate の設定 (再設定) はここからのみ
 *
 * Notes
 * - 拒否は 401 レスポンス値であり Err ではない
 * - gate は可変状態を持たない (Arc<Gate> で共有する)
 */
use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ConfigError;

use super::authenticator::Authenticator;
use super::hooks::{AfterHook, BeforeHook, ErrorHook, HookOutcome, Rejection};
use super::rules::{PathRule, RuleChain, request_path};

#[derive(Clone)]
pub struct GateBuilder {
    authenticator: Option<Arc<dyn Authenticator>>,
    paths: Vec<String>,
    ignore: Vec<String>,
    before: Option<BeforeHook>,
    after: Option<AfterHook>,
    error: Option<ErrorHook>,
}

impl Default for GateBuilder {
    fn default() -> Self {
        Self {
            authenticator: None,
            paths: vec!["/".to_string()],
            ignore: Vec::new(),
            before: None,
            after: None,
            error: None,
        }
    }
}

impl GateBuilder {
    pub fn authenticator(mut self, authenticator: impl Authenticator + 'static) -> Self {
        self.authenticator = Some(Arc::new(authenticator));
        self
    }

    /// Single protected prefix.
    pub fn path(self, path: impl Into<String>) -> Self {
        self.paths([path])
    }

    /// Protected prefixes, in order. An empty list protects nothing.
    pub fn paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Globs relative to each protected prefix that skip authentication.
    pub fn ignore<I, P>(mut self, ignore: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.ignore = ignore.into_iter().map(Into::into).collect();
        self
    }

    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Request) -> HookOutcome<Request> + Send + Sync + 'static,
    {
        self.before = Some(Arc::new(hook));
        self
    }

    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Response) -> HookOutcome<Response> + Send + Sync + 'static,
    {
        self.after = Some(Arc::new(hook));
        self
    }

    pub fn error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Response, &Rejection) -> HookOutcome<Response> + Send + Sync + 'static,
    {
        self.error = Some(Arc::new(hook));
        self
    }

    pub fn build(self) -> Result<Gate, ConfigError> {
        let authenticator = self
            .authenticator
            .clone()
            .ok_or(ConfigError::MissingAuthenticator)?;

        let mut rules = RuleChain::new();
        rules.push(PathRule::new(self.paths.clone(), self.ignore.clone())?);

        Ok(Gate {
            authenticator,
            rules,
            config: self,
        })
    }
}

pub struct Gate {
    authenticator: Arc<dyn Authenticator>,
    rules: RuleChain,
    config: GateBuilder,
}

impl Gate {
    pub fn builder() -> GateBuilder {
        GateBuilder::default()
    }

    /// Current configuration as a builder; build it again to get a new gate.
    pub fn to_builder(&self) -> GateBuilder {
        self.config.clone()
    }

    pub async fn handle<F, Fut>(&self, request: Request, downstream: F) -> Response
    where
        F: FnOnce(Request) -> Fut,
        Fut: Future<Output = Response>,
    {
        if !self.rules.should_authenticate(&request) {
            tracing::debug!(path = %request_path(&request), "outside protected scope");
            return downstream(request).await;
        }

        let result = self.authenticator.check(&request);
        if !result.is_accepted() {
            tracing::warn!(
                path = %request_path(&request),
                reason = %result.last_error(),
                "authenticator rejected request"
            );
            return self.reject(Rejection::new(result.last_error()));
        }

        tracing::debug!(path = %request_path(&request), "request authenticated");

        let request = match &self.config.before {
            Some(before) => before(&request).apply(request),
            None => request,
        };

        let response = downstream(request).await;

        match &self.config.after {
            Some(after) => after(&response).apply(response),
            None => response,
        }
    }

    fn reject(&self, rejection: Rejection) -> Response {
        let response = StatusCode::UNAUTHORIZED.into_response();
        match &self.config.error {
            Some(error) => error(&response, &rejection).apply(response),
            None => response,
        }
    }
}

impl std::fmt::Debug for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gate")
            .field("paths", &self.config.paths)
            .field("ignore", &self.config.ignore)
            .field("rules", &self.rules)
            .field("before", &self.config.before.is_some())
            .field("after", &self.config.after.is_some())
            .field("error", &self.config.error.is_some())
            .finish()
    }
}
