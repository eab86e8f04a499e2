//! # リクエストログ
//!
//! ハンドラの応答後に 1 行のサマリログ（`リクエスト完了`）を出力する。
//! `TraceLayer` のリクエストスパン内で呼ばれるため、`request_id` はスパン側に載る。
//!
//! ハンドラがパニックした場合はこの関数の後半に到達しないため、完了ログは出ない。

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

/// ルートに一致しなかったリクエストの `http.route`
const UNMATCHED_ROUTE: &str = "-";

/// `axum::middleware::from_fn` 用のリクエストログ関数
///
/// 出力フィールド:
///
/// | フィールド | 内容 |
/// |------------|------|
/// | `http.method` | リクエストメソッド |
/// | `http.route` | 一致したルートのパターン（未一致は `-`） |
/// | `http.path` | 実際のパス |
/// | `http.status_code` | レスポンスステータス |
/// | `http.latency_ms` | ハンドラ応答までの経過時間 |
///
/// 5xx は WARN、それ以外は INFO で出力する。
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_ROUTE.to_owned(), |m| m.as_str().to_owned());
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    if status.is_server_error() {
        tracing::warn!(
            http.method = %method,
            http.route = %route,
            http.path = %path,
            http.status_code = status.as_u16(),
            http.latency_ms = latency_ms,
            "リクエスト完了"
        );
    } else {
        tracing::info!(
            http.method = %method,
            http.route = %route,
            http.path = %path,
            http.status_code = status.as_u16(),
            http.latency_ms = latency_ms,
            "リクエスト完了"
        );
    }

    response
}
