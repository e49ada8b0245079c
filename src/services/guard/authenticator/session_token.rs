//! Token-in-header vs token-in-session authenticator.
//!
//! The request carries a token in a configured header; the session (request
//! extension [`Session`]) carries the same token, a "last refreshed at" unix
//! timestamp and any number of extra values that must match exactly.
//!
//! Guards run in a fixed order and the first failure is reported:
//! header token, expiry present, not expired, session token present,
//! tokens equal, then each arbitrary value in configuration order.
//!
//! Expiry is `now - session[expire_key] > ttl`: the stored timestamp is the
//! moment the session was last refreshed, not an absolute deadline. A stored
//! timestamp in the future therefore never expires. Stored timestamps may be
//! fractional or numeric strings; a value present but not a finite number
//! reads as expired rather than missing.
//!
//! A header sent several times is read by its first value only.

use std::sync::Arc;

use axum::{extract::Request, http::HeaderName};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::ConfigError;
use crate::services::guard::session::Session;

use super::{AuthResult, Authenticator};

/// Exactly these five options; unknown or missing keys fail deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionTokenConfig {
    /// Request header holding the token.
    pub header_name: String,
    /// Session key holding the last-refreshed unix timestamp.
    pub expire_key: String,
    /// Session key holding the expected token.
    pub token_key: String,
    /// Maximum seconds since `expire_key`.
    pub ttl: u64,
    /// Session key -> exact value, checked in order.
    pub arbitrary_values: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenRejection {
    #[error("no token in request")]
    MissingRequestToken,
    #[error("no expiration on session")]
    MissingExpiration,
    #[error("session expired")]
    Expired,
    #[error("no token in session")]
    MissingSessionToken,
    #[error("token mismatch")]
    TokenMismatch,
    #[error("{0} not found")]
    MissingValue(String),
    #[error("expected value for {0} not found")]
    UnexpectedValue(String),
}

type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

#[derive(Clone)]
pub struct SessionTokenAuthenticator {
    header: HeaderName,
    config: SessionTokenConfig,
    clock: Clock,
}

impl SessionTokenAuthenticator {
    pub fn new(config: SessionTokenConfig) -> Result<Self, ConfigError> {
        let header = HeaderName::from_bytes(config.header_name.as_bytes())
            .map_err(|_| ConfigError::InvalidHeaderName(config.header_name.clone()))?;

        Ok(Self {
            header,
            config,
            clock: Arc::new(|| chrono::Utc::now().timestamp()),
        })
    }

    /// Builds from a loosely typed option object (e.g. parsed from env/JSON).
    pub fn from_value(options: Value) -> Result<Self, ConfigError> {
        let config: SessionTokenConfig = serde_json::from_value(options)?;
        Self::new(config)
    }

    pub fn from_json_str(options: &str) -> Result<Self, ConfigError> {
        let config: SessionTokenConfig = serde_json::from_str(options)?;
        Self::new(config)
    }

    /// Replace the unix-seconds clock.
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &SessionTokenConfig {
        &self.config
    }

    pub fn verify(&self, request: &Request) -> Result<(), TokenRejection> {
        let session = request.extensions().get::<Session>();
        let lookup = |key: &str| session.and_then(|s| s.get(key));

        let request_token = request
            .headers()
            .get(&self.header)
            .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
            .ok_or(TokenRejection::MissingRequestToken)?;

        let stored = lookup(&self.config.expire_key).ok_or(TokenRejection::MissingExpiration)?;
        let refreshed_at = unix_seconds(&stored).ok_or(TokenRejection::Expired)?;

        let elapsed = (self.clock)() as f64 - refreshed_at;
        if elapsed > self.config.ttl as f64 {
            return Err(TokenRejection::Expired);
        }

        let session_token =
            lookup(&self.config.token_key).ok_or(TokenRejection::MissingSessionToken)?;

        if session_token.as_str() != Some(request_token) {
            return Err(TokenRejection::TokenMismatch);
        }

        for (key, expected) in &self.config.arbitrary_values {
            let actual = lookup(key).ok_or_else(|| TokenRejection::MissingValue(key.clone()))?;
            if &actual != expected {
                return Err(TokenRejection::UnexpectedValue(key.clone()));
            }
        }

        Ok(())
    }
}

fn unix_seconds(value: &Value) -> Option<f64> {
    let seconds = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    seconds.filter(|t: &f64| t.is_finite())
}

impl Authenticator for SessionTokenAuthenticator {
    fn check(&self, request: &Request) -> AuthResult {
        match self.verify(request) {
            Ok(()) => AuthResult::accept(),
            Err(rejection) => AuthResult::reject(rejection.to_string()),
        }
    }
}

impl std::fmt::Debug for SessionTokenAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenAuthenticator")
            .field("header", &self.header)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::json;

    const HOUR: i64 = 60 * 60;
    const TOKEN: &str = "SessionTokenAuthenticatorTest";

    fn options() -> Value {
        json!({
            "header_name": "X-CustomToken",
            "arbitrary_values": {"value1": "expectedValue"},
            "ttl": HOUR,
            "expire_key": "expiration",
            "token_key": "token",
        })
    }

    fn authenticator() -> SessionTokenAuthenticator {
        SessionTokenAuthenticator::from_value(options()).unwrap()
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    fn request(token: Option<&str>, session: Option<Value>) -> Request {
        let mut builder = Request::builder().uri("https://example.com/randomRoute");
        if let Some(token) = token {
            builder = builder.header("X-CustomToken", token);
        }
        let mut req = builder.body(Body::empty()).unwrap();
        if let Some(Value::Object(map)) = session {
            req.extensions_mut().insert(Session::from(map));
        }
        req
    }

    fn valid_session() -> Value {
        json!({
            "expiration": now() + 2 * HOUR,
            "value1": "expectedValue",
            "token": TOKEN,
        })
    }

    fn assert_rejected(req: Request, expected: TokenRejection) {
        assert_eq!(authenticator().verify(&req), Err(expected));
    }

    #[test]
    fn valid_options_construct() {
        let auth = authenticator();
        assert_eq!(auth.config().ttl, 3600);
        assert_eq!(auth.config().header_name, "X-CustomToken");
    }

    #[test]
    fn string_ttl_is_rejected() {
        let mut opts = options();
        opts["ttl"] = json!("TESTSTRING");
        let err = SessionTokenAuthenticator::from_value(opts).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSessionOptions(_)));
    }

    #[test]
    fn fractional_or_negative_ttl_is_rejected() {
        for ttl in [json!(1.5), json!(-1)] {
            let mut opts = options();
            opts["ttl"] = ttl;
            assert!(SessionTokenAuthenticator::from_value(opts).is_err());
        }
    }

    #[test]
    fn missing_options_are_rejected() {
        let opts = json!({
            "header_name": "X-CustomToken",
            "arbitrary_values": {"value1": "expectedValue"},
            "token_key": "token",
        });
        assert!(SessionTokenAuthenticator::from_value(opts).is_err());
    }

    #[test]
    fn extra_option_is_rejected() {
        let mut opts = options();
        opts["ttl_grace"] = json!(10);
        assert!(SessionTokenAuthenticator::from_value(opts).is_err());
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let mut opts = options();
        opts["header_name"] = json!("X Custom Token");
        let err = SessionTokenAuthenticator::from_value(opts).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeaderName(_)));
    }

    #[test]
    fn from_json_str_accepts_same_shape() {
        let raw = options().to_string();
        assert!(SessionTokenAuthenticator::from_json_str(&raw).is_ok());
    }

    #[test]
    fn valid_session_is_accepted() {
        let req = request(Some(TOKEN), Some(valid_session()));
        let result = authenticator().check(&req);
        assert!(result.is_accepted());
        assert_eq!(result.last_error(), "");
    }

    #[test]
    fn missing_header_wins_over_session_state() {
        assert_rejected(
            request(None, Some(valid_session())),
            TokenRejection::MissingRequestToken,
        );
        assert_rejected(request(None, None), TokenRejection::MissingRequestToken);
    }

    #[test]
    fn missing_session_extension_reads_as_empty() {
        assert_rejected(request(Some(TOKEN), None), TokenRejection::MissingExpiration);
    }

    #[test]
    fn missing_expiration_is_rejected() {
        let session = json!({"value1": "expectedValue", "token": TOKEN});
        assert_rejected(
            request(Some(TOKEN), Some(session)),
            TokenRejection::MissingExpiration,
        );
    }

    #[test]
    fn unreadable_expiration_counts_as_expired() {
        for stored in [json!("tomorrow"), json!("NaN"), json!(null), json!([1])] {
            let mut session = valid_session();
            session["expiration"] = stored;
            assert_rejected(request(Some(TOKEN), Some(session)), TokenRejection::Expired);
        }
    }

    #[test]
    fn fractional_expiration_is_accepted() {
        let auth = authenticator().with_clock(|| 10_000);
        let mut session = valid_session();
        session["expiration"] = json!(9999.5);
        assert_eq!(auth.verify(&request(Some(TOKEN), Some(session))), Ok(()));
    }

    #[test]
    fn numeric_string_expiration_is_parsed() {
        let auth = authenticator().with_clock(|| 10_000);
        let at = |stored: Value| {
            let mut session = valid_session();
            session["expiration"] = stored;
            auth.verify(&request(Some(TOKEN), Some(session)))
        };

        assert_eq!(at(json!("9000")), Ok(()));
        assert_eq!(at(json!("1e3")), Err(TokenRejection::Expired));
    }

    #[test]
    fn expired_session_is_rejected() {
        let mut session = valid_session();
        session["expiration"] = json!(now() - 2 * HOUR);
        let result = authenticator().check(&request(Some(TOKEN), Some(session)));
        assert!(!result.is_accepted());
        assert_eq!(result.last_error(), "session expired");
    }

    #[test]
    fn expiry_measures_elapsed_time_since_stored_timestamp() {
        let auth = authenticator().with_clock(|| 10_000);
        let at = |refreshed: i64| {
            let mut session = valid_session();
            session["expiration"] = json!(refreshed);
            auth.verify(&request(Some(TOKEN), Some(session)))
        };

        assert_eq!(at(10_000 - 3600), Ok(()));
        assert_eq!(at(10_000 - 3601), Err(TokenRejection::Expired));
        assert_eq!(at(10_000 + 7200), Ok(()));
    }

    #[test]
    fn missing_session_token_is_rejected() {
        let session = json!({"expiration": now() + 2 * HOUR, "value1": "expectedValue"});
        assert_rejected(
            request(Some(TOKEN), Some(session)),
            TokenRejection::MissingSessionToken,
        );
    }

    #[test]
    fn different_token_is_rejected() {
        let mut session = valid_session();
        session["token"] = json!("hello");
        assert_rejected(
            request(Some(TOKEN), Some(session)),
            TokenRejection::TokenMismatch,
        );
    }

    fn repeated_header_request(session_token: &str) -> Request {
        let mut req = Request::builder()
            .uri("https://example.com/randomRoute")
            .header("X-CustomToken", "a")
            .header("X-CustomToken", "b")
            .body(Body::empty())
            .unwrap();
        let mut session = valid_session();
        session["token"] = json!(session_token);
        if let Value::Object(map) = session {
            req.extensions_mut().insert(Session::from(map));
        }
        req
    }

    #[test]
    fn repeated_header_uses_first_value() {
        let auth = authenticator();
        assert_eq!(auth.verify(&repeated_header_request("a")), Ok(()));
        assert_eq!(
            auth.verify(&repeated_header_request("b")),
            Err(TokenRejection::TokenMismatch)
        );
    }

    #[test]
    fn token_comparison_is_strict() {
        let mut session = valid_session();
        session["token"] = json!(42);
        assert_rejected(
            request(Some("42"), Some(session)),
            TokenRejection::TokenMismatch,
        );
    }

    #[test]
    fn missing_arbitrary_value_is_rejected() {
        let session = json!({"expiration": now() + 2 * HOUR, "token": TOKEN});
        let result = authenticator().check(&request(Some(TOKEN), Some(session)));
        assert_eq!(result.last_error(), "value1 not found");
    }

    #[test]
    fn wrong_arbitrary_value_is_rejected() {
        let mut session = valid_session();
        session["value1"] = json!("notTheGoodValue");
        let result = authenticator().check(&request(Some(TOKEN), Some(session)));
        assert_eq!(result.last_error(), "expected value for value1 not found");
    }

    #[test]
    fn arbitrary_values_are_checked_in_order() {
        let mut opts = options();
        opts["arbitrary_values"] = json!({"role": "admin", "tenant": 7});
        let auth = SessionTokenAuthenticator::from_value(opts).unwrap();

        let session = json!({
            "expiration": now(),
            "token": TOKEN,
            "tenant": 8,
        });
        assert_eq!(
            auth.verify(&request(Some(TOKEN), Some(session))),
            Err(TokenRejection::MissingValue("role".into()))
        );
    }
}
