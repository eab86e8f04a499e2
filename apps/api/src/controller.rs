//! # コントローラコンテナ
//!
//! 共有コンテキストから各コントローラを一度だけ構築し、名前付きで保持する。
//!
//! ## 設計方針
//!
//! - スロットは `Option` を使わない通常のフィールドにし、
//!   一部だけ埋まったコンテナを作れないようにする
//! - 各コントローラには必要なハンドルだけを渡す
//! - 構築後は不変。ルーター登録時に `Arc` を複製して配る
//!
//! コントローラを追加するときは、スロット・[`Container::new`] での構築・
//! [`Router::register_routes`](crate::router::Router::register_routes) での
//! パス登録の 3 箇所を変更する。

pub mod health;

use std::{sync::Arc, time::Duration};

pub use health::HealthController;

use crate::context::AppContext;

/// コントローラ構築時の設定
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub health_probe_timeout: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            health_probe_timeout: health::DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// 全コントローラのインスタンスを保持するコンテナ
pub struct Container {
    health: Arc<HealthController>,
}

impl Container {
    /// 共有コンテキストから全コントローラを構築する
    pub fn new(ctx: &AppContext, config: &ControllerConfig) -> Self {
        Self {
            health: Arc::new(HealthController::new(
                ctx.db().clone(),
                config.health_probe_timeout,
            )),
        }
    }

    pub fn health(&self) -> &Arc<HealthController> {
        &self.health
    }
}
