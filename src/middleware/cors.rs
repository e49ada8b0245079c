//! CORS policy for browser clients.
//!
//! Browsers must be allowed to send the session token header, otherwise every
//! cross-origin preflight for a guarded route fails before the gate runs.
//!
//! Policy:
//! - Development: Allow-Origin `*`, without credentials.
//! - Production: exact-match allowlist from `CORS_ALLOWED_ORIGINS`; empty means none.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;
use crate::middleware::http::REQUEST_ID_HEADER;

pub fn apply(router: Router, config: &Config) -> Router {
    let cors = if config.app_env.is_production() {
        let allowed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        CorsLayer::new().allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _req| allowed.iter().any(|v| v == origin),
        ))
    } else {
        CorsLayer::new().allow_origin(Any)
    };

    let mut allow_headers = vec![
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static(REQUEST_ID_HEADER),
    ];
    // Validated when the authenticator was built; skip silently if not.
    if let Ok(token_header) = HeaderName::from_bytes(config.session_token.header_name.as_bytes())
    {
        allow_headers.push(token_header);
    }

    let cors = cors
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(allow_headers)
        .max_age(std::time::Duration::from_secs(60 * 10));

    router.layer(cors)
}
