//! Authenticator capability used by the gate.
//!
//! The gate only sees this trait. The failure reason is part of the returned
//! [`AuthResult`], so implementations keep no per-call state.

use axum::extract::Request;

mod session_token;

pub use session_token::{SessionTokenAuthenticator, SessionTokenConfig, TokenRejection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    accepted: bool,
    reason: String,
}

impl AuthResult {
    pub fn accept() -> Self {
        Self {
            accepted: true,
            reason: String::new(),
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason: reason.into(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Failure reason; empty when accepted.
    pub fn last_error(&self) -> &str {
        &self.reason
    }
}

pub trait Authenticator: Send + Sync {
    fn check(&self, request: &Request) -> AuthResult;
}

impl<F> Authenticator for F
where
    F: Fn(&Request) -> AuthResult + Send + Sync,
{
    fn check(&self, request: &Request) -> AuthResult {
        self(request)
    }
}
