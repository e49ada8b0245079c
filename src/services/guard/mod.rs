//! Request gating: decide whether a request needs authentication, run the
//! authenticator and apply the configured hooks.

pub mod authenticator;
pub mod gate;
pub mod hooks;
pub mod rules;
pub mod session;

pub use authenticator::{
    AuthResult, Authenticator, SessionTokenAuthenticator, SessionTokenConfig, TokenRejection,
};
pub use gate::{Gate, GateBuilder};
pub use hooks::{HookOutcome, Rejection};
pub use rules::{PathRule, Rule, RuleChain};
pub use session::{Session, SessionStore};
