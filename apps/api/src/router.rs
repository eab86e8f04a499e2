//! # ルーター
//!
//! HTTP エンジン（`axum::Router`）、コントローラコンテナ、ルートテーブル、
//! ミドルウェアスタックを所有し、パスとハンドラの対応付けを行う。
//!
//! ## 状態遷移
//!
//! ```text
//! Constructed ──register_routes──▶ Registered ──(engine を bind して serve)──▶ Serving
//! ```
//!
//! 後戻りはない。`register_routes` の 2 回目の呼び出しと、
//! 登録前の `engine` 取得は実行時エラーとして拒否する。
//!
//! ## エンドポイント
//!
//! | メソッド | パス | ハンドラ |
//! |----------|------|----------|
//! | GET | `/api/health` | [`HealthController::check`](crate::controller::HealthController::check) |
//! | GET | `/api/ping` | インライン（`{"message": "pong"}`、コンテキスト非依存） |
//!
//! 未定義のパスはフォールバックで 404（Problem Details）を返す。

mod route_table;

use authsvc_shared::PingResponse;
use axum::{Json, http::Method};
pub use route_table::{RouteEntry, RouteGroup, RouteTable};
use thiserror::Error;

use crate::{
    context::AppContext,
    controller::{Container, ControllerConfig},
    error::ApiError,
    middleware::{DEFAULT_STACK, Middleware, apply_middleware},
};

/// 全ルートに共通のプレフィックス
pub const BASE_PATH: &str = "/api";

/// ルーター操作のエラー
#[derive(Debug, Error)]
pub enum RouterError {
    /// `register_routes` が 2 回呼ばれた
    #[error("ルートは登録済みです")]
    AlreadyRegistered,

    /// ルート登録前にエンジンを取得しようとした
    #[error("ルートが登録されていません")]
    NotRegistered,

    /// 同じメソッドとパスの組が既に登録されている
    #[error("ルートが重複しています: {method} {path}")]
    DuplicateRoute { method: Method, path: String },

    /// axum のメソッドフィルタで表現できないメソッド
    #[error("未対応の HTTP メソッドです: {0}")]
    UnsupportedMethod(Method),
}

/// ルーターのライフサイクル状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    Constructed,
    Registered,
}

/// ルーター本体
pub struct Router {
    engine:     axum::Router,
    container:  Container,
    routes:     RouteTable,
    middleware: Vec<Middleware>,
    state:      RouterState,
}

impl Router {
    /// デフォルトのコントローラ設定で構築する
    pub fn new(ctx: &AppContext) -> Self {
        Self::with_config(ctx, &ControllerConfig::default())
    }

    /// コンテキストからコントローラコンテナを構築し、ミドルウェアの順序を確定する
    pub fn with_config(ctx: &AppContext, config: &ControllerConfig) -> Self {
        Self {
            engine:     axum::Router::new().fallback(not_found),
            container:  Container::new(ctx, config),
            routes:     RouteTable::new(),
            middleware: DEFAULT_STACK.to_vec(),
            state:      RouterState::Constructed,
        }
    }

    /// 全ルートを登録する
    ///
    /// 1 回だけ呼べる。2 回目以降は [`RouterError::AlreadyRegistered`]。
    pub fn register_routes(&mut self) -> Result<(), RouterError> {
        if self.state != RouterState::Constructed {
            return Err(RouterError::AlreadyRegistered);
        }

        let health = self.container.health().clone();

        let mut api = self.routes.group(BASE_PATH);
        api.get("/health", move || health.clone().check())?
            .get("/ping", || async { Json(PingResponse::pong()) })?;

        self.engine = self.routes.build(std::mem::take(&mut self.engine));
        self.state = RouterState::Registered;

        tracing::debug!(routes = self.routes.len(), "ルートを登録しました");
        Ok(())
    }

    /// ミドルウェア適用済みのエンジンを返す
    ///
    /// ブートストラップはこれをリスナーに bind して serve する。
    pub fn engine(&self) -> Result<axum::Router, RouterError> {
        if self.state != RouterState::Registered {
            return Err(RouterError::NotRegistered);
        }
        Ok(apply_middleware(self.engine.clone(), &self.middleware))
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn middleware(&self) -> &[Middleware] {
        &self.middleware
    }

    pub fn state(&self) -> RouterState {
        self.state
    }
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
