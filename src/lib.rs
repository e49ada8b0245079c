//! Request gating middleware for axum.
//!
//! A [`Gate`](services::guard::Gate) decides per request whether
//! authentication applies (protected prefixes minus ignore globs), asks an
//! [`Authenticator`](services::guard::Authenticator), and runs optional
//! before/after/error hooks around the downstream handler.
//!
//! ```ignore
//! use std::sync::Arc;
//! use route_guard::{middleware, services::guard::{Gate, HookOutcome}};
//!
//! let gate = Gate::builder()
//!     .authenticator(SessionTokenAuthenticator::from_json_str(&options)?)
//!     .paths(["/api", "/private"])
//!     .ignore(["/public/*"])
//!     .after(|_resp| HookOutcome::Keep)
//!     .build()?;
//! let app = middleware::guard::apply(router, Arc::new(gate));
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
