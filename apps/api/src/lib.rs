//! # authsvc API サーバー
//!
//! 共有コンテキスト → コントローラコンテナ → ルーターの順に依存を組み立てる
//! HTTP サービスの骨格。
//!
//! ## 構成
//!
//! ```text
//! main（ブートストラップ）
//!   ├─ AppContext（RelationalStore + CacheStore）
//!   └─ Router
//!        ├─ Container（HealthController）
//!        ├─ RouteTable（/api/health, /api/ping）
//!        └─ Middleware（RequestId → Recovery → RequestLog）
//! ```
//!
//! ## モジュール構成
//!
//! - [`config`] - 環境変数からの設定読み込み
//! - [`context`] - 外部リソースのハンドルを束ねる共有コンテキスト
//! - [`controller`] - コントローラコンテナとハンドラ
//! - [`router`] - ルートテーブルとエンジン
//! - [`middleware`] - 横断的処理の適用順序
//! - [`error`] - API エラーと HTTP レスポンスへの変換

pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod middleware;
pub mod router;

pub use context::AppContext;
pub use router::Router;
