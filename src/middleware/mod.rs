/*
 * Responsibility
 * - middleware の公開インターフェース
 * - guard: 認証ゲート / http, cors, security_headers: 横断的な HTTP 設定
 */
pub mod cors;
pub mod guard;
pub mod http;
pub mod security_headers;
