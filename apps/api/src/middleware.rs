//! # ミドルウェアスタック
//!
//! 全ルートに共通で適用する横断的処理を定義する。
//!
//! ## 適用順序
//!
//! [`DEFAULT_STACK`] の先頭が最も外側になる。
//!
//! ```text
//! RequestId（SetRequestIdLayer → PropagateRequestIdLayer）
//!   └─ Recovery（CatchPanicLayer）
//!        └─ RequestLog（TraceLayer → log_request）
//!             └─ ハンドラ
//! ```
//!
//! axum の `Router::layer` は後から追加したものが外側になるため、
//! [`apply_middleware`] はスタックを末尾から順に適用する。
//!
//! - リカバリはログ層とハンドラを包むので、そこでのパニックは 500 に変換される
//! - Request ID 層はリカバリの外側にあり、パニック由来の 500 にも `x-request-id` が付く

mod request_log;

use std::any::Any;

use authsvc_shared::observability::{MakeRequestUuidV7, make_request_span};
use axum::response::{IntoResponse, Response};
pub use request_log::log_request;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::error::ApiError;

/// 横断的処理の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Middleware {
    /// ハンドラのパニックを捕捉して 500 を返す
    Recovery,
    /// `x-request-id` の採番と応答ヘッダーへの伝播
    RequestId,
    /// リクエストスパンと完了サマリログ
    RequestLog,
}

/// ルーターに適用するミドルウェアの順序（先頭が最外周）
pub const DEFAULT_STACK: [Middleware; 3] = [
    Middleware::RequestId,
    Middleware::Recovery,
    Middleware::RequestLog,
];

impl Middleware {
    fn wrap(self, router: axum::Router) -> axum::Router {
        match self {
            Middleware::Recovery => router.layer(CatchPanicLayer::custom(handle_panic)),
            Middleware::RequestId => router
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7)),
            Middleware::RequestLog => router
                .layer(axum::middleware::from_fn(log_request))
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span)),
        }
    }
}

/// ルーターにミドルウェアスタックを適用する
///
/// `stack` の先頭が最も外側になる。ルート登録後に呼ぶこと
/// （axum のレイヤーは追加済みのルートにのみ適用される）。
pub fn apply_middleware(router: axum::Router, stack: &[Middleware]) -> axum::Router {
    stack
        .iter()
        .rev()
        .fold(router, |router, middleware| middleware.wrap(router))
}

/// パニックを汎用の 500 レスポンスに変換する
///
/// パニックの内容はログにのみ出力し、レスポンスボディには含めない。
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "不明なパニック".to_string()
    };

    ApiError::Internal(anyhow::anyhow!("ハンドラがパニックしました: {detail}")).into_response()
}
