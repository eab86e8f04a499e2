//! # テスト用スタブストア
//!
//! ハンドラ・ルーターのテストで使用するインメモリのストア実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! authsvc-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::HashMap,
    sync::{
        Arc,
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;

use crate::{db::RelationalStore, error::InfraError, redis::CacheStore};

// ===== MockRelationalStore =====

/// `ping` の振る舞い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeBehavior {
    /// 常に成功する
    Healthy,
    /// 常に失敗する
    Failing,
    /// 応答しない（タイムアウトの検証用）
    Hanging,
}

/// 振る舞いを指定できる [`RelationalStore`] のスタブ
///
/// Clone は呼び出し回数などの状態を共有する。
#[derive(Debug, Clone)]
pub struct MockRelationalStore {
    behavior: ProbeBehavior,
    calls:    Arc<AtomicUsize>,
    closed:   Arc<AtomicBool>,
}

impl MockRelationalStore {
    pub fn new(behavior: ProbeBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn healthy() -> Self {
        Self::new(ProbeBehavior::Healthy)
    }

    pub fn failing() -> Self {
        Self::new(ProbeBehavior::Failing)
    }

    pub fn hanging() -> Self {
        Self::new(ProbeBehavior::Hanging)
    }

    /// `ping` / `execute` の呼び出し回数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn respond(&self) -> Result<(), InfraError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.is_closed() {
            return Err(InfraError::closed("mock-relational"));
        }
        match self.behavior {
            ProbeBehavior::Healthy => Ok(()),
            ProbeBehavior::Failing => Err(InfraError::unexpected("スタブ: 接続拒否")),
            ProbeBehavior::Hanging => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl RelationalStore for MockRelationalStore {
    async fn ping(&self) -> Result<(), InfraError> {
        self.respond().await
    }

    async fn execute(&self, _sql: &str) -> Result<u64, InfraError> {
        self.respond().await.map(|()| 0)
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

// ===== MockCacheStore =====

/// HashMap を使用した [`CacheStore`] のスタブ（TTL は無視する）
#[derive(Debug, Clone, Default)]
pub struct MockCacheStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    closed:  Arc<AtomicBool>,
}

impl MockCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for MockCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, InfraError> {
        if self.is_closed() {
            return Err(InfraError::closed("mock-cache"));
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl: Option<Duration>) -> Result<(), InfraError> {
        if self.is_closed() {
            return Err(InfraError::closed("mock-cache"));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
