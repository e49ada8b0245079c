/*
 * Responsibility
 * - GET /api/v1/ping: guard を通過したリクエストだけが届く
 */
use axum::{Json, extract::Request, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::middleware::http::REQUEST_ID_HEADER;

pub async fn ping(req: Request) -> impl IntoResponse {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    (
        StatusCode::OK,
        Json(json!({"status": "authenticated", "request_id": request_id})),
    )
}
