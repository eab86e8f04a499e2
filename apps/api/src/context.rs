//! # 共有コンテキスト
//!
//! 起動時に初期化した外部リソースのハンドルを 1 つにまとめ、
//! 下流のコンポーネントへ明示的に渡すための集約。
//!
//! ## 設計方針
//!
//! - グローバル変数は使わず、ブートストラップが構築して引き回す
//! - フィールドは非公開にし、構築後に差し替えられないようにする
//! - ハンドルは `Arc<dyn Trait>` で共有し、テストではスタブに差し替える

use std::{fmt, sync::Arc};

use authsvc_infra::{CacheStore, RelationalStore};

/// リレーショナルストアとキャッシュストアのハンドルを保持する
///
/// `Clone` はハンドルの参照カウントを増やすだけ。
#[derive(Clone)]
pub struct AppContext {
    db:    Arc<dyn RelationalStore>,
    cache: Arc<dyn CacheStore>,
}

impl AppContext {
    /// 初期化済みのハンドルから構築する
    pub fn new(db: Arc<dyn RelationalStore>, cache: Arc<dyn CacheStore>) -> Self {
        Self { db, cache }
    }

    pub fn db(&self) -> &Arc<dyn RelationalStore> {
        &self.db
    }

    /// キャッシュストアのハンドル
    ///
    /// 現時点で利用するハンドラはない。
    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    /// プロセス終了時に両方のハンドルを解放する
    pub async fn shutdown(&self) {
        self.db.close().await;
        self.cache.close().await;
        tracing::info!("外部リソースを解放しました");
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}
