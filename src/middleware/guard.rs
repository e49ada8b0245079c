//! Mounts a [`Gate`] in front of a Router.
//!
//! Apply it on the outermost router so the gate sees full request paths;
//! when applied inside `Router::nest`, the original URI is used for matching.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
};

use crate::services::guard::Gate;

/// ```ignore
/// let gate = Gate::builder().authenticator(auth).path("/api").build()?;
/// let app = middleware::guard::apply(router, Arc::new(gate));
/// ```
pub fn apply<S>(router: Router<S>, gate: Arc<Gate>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(gate, guard_middleware))
}

async fn guard_middleware(State(gate): State<Arc<Gate>>, req: Request, next: Next) -> Response {
    gate.handle(req, |req| next.run(req)).await
}
