//! # API エラーハンドリング
//!
//! ハンドラ層のエラー定義と、axum レスポンスへの変換を行う。
//!
//! ## 設計方針
//!
//! - **RFC 9457 準拠**: ボディは [`ErrorResponse`]（Problem Details）
//! - **thiserror + anyhow**: 型安全なエラー定義とエラーチェインの両立
//! - 内部エラーの詳細はログにのみ出力し、クライアントには固定文言を返す

use authsvc_shared::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// API 層で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// ルートが存在しない（404 Not Found）
    #[error("リソースが見つかりません")]
    NotFound,

    /// 予期しないエラー（500 Internal Server Error）
    ///
    /// ハンドラのパニックもここに変換される。
    #[error("内部サーバーエラー")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse::not_found("指定されたパスは存在しません"),
            ),
            ApiError::Internal(err) => {
                // 詳細はログにのみ出力する
                tracing::error!(error = ?err, "内部エラー");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::internal_error(),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
