//! Hook types invoked by the gate around the authentication decision.
//!
//! A hook either keeps the in-flight value or replaces it. Replacement values
//! are used as-is, so a replacement request/response carries its own body.

use std::sync::Arc;

use axum::{extract::Request, response::Response};
use serde::Serialize;

/// What a hook wants done with the in-flight value.
#[derive(Debug)]
pub enum HookOutcome<T> {
    Keep,
    Replace(T),
}

impl<T> HookOutcome<T> {
    /// Returns the replacement, or `current` when the hook kept it.
    pub fn apply(self, current: T) -> T {
        match self {
            HookOutcome::Keep => current,
            HookOutcome::Replace(next) => next,
        }
    }
}

impl<T> From<Option<T>> for HookOutcome<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(HookOutcome::Keep, HookOutcome::Replace)
    }
}

/// Arguments handed to the error hook when the authenticator rejects a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    pub message: String,
    pub authenticator_error: String,
}

impl Rejection {
    pub const MESSAGE: &'static str = "Authenticator rejected this request";

    pub fn new(authenticator_error: impl Into<String>) -> Self {
        Self {
            message: Self::MESSAGE.to_string(),
            authenticator_error: authenticator_error.into(),
        }
    }
}

pub type BeforeHook = Arc<dyn Fn(&Request) -> HookOutcome<Request> + Send + Sync>;
pub type AfterHook = Arc<dyn Fn(&Response) -> HookOutcome<Response> + Send + Sync>;
pub type ErrorHook = Arc<dyn Fn(&Response, &Rejection) -> HookOutcome<Response> + Send + Sync>;
