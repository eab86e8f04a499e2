//! # authsvc 共有ユーティリティ
//!
//! サービス全体で使用されるレスポンス型と observability 基盤を提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum には依存しない（`IntoResponse` 変換は API クレートの責務）
//! - tracing / tower-http 依存は `observability` feature の背後に置く

pub mod error_response;
pub mod format;
pub mod health;
pub mod observability;

pub use error_response::ErrorResponse;
pub use health::{CheckStatus, HealthResponse, HealthStatus, PingResponse};
