//! # Redis 接続管理
//!
//! キャッシュストアのハンドル（[`CacheStore`]）と、その Redis 実装
//! （[`RedisCache`]）を提供する。
//!
//! ## ConnectionManager vs Connection
//!
//! | 方式 | 特徴 | 用途 |
//! |------|------|------|
//! | `Connection` | 単一接続、手動管理 | 短期間の処理 |
//! | `ConnectionManager` | 自動再接続、スレッドセーフ | 長期稼働アプリ |
//!
//! 長期稼働するサーバーのため `ConnectionManager` を使用する。
//!
//! ## 用途
//!
//! 現時点でキャッシュを利用するハンドラは存在しない。
//! 共有コンテキストには将来のコントローラ向けに保持している。

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tokio::sync::RwLock;

use crate::error::InfraError;

/// キャッシュストアのハンドル
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// 値を取得する。キーが存在しなければ `None`
    async fn get(&self, key: &str) -> Result<Option<String>, InfraError>;

    /// 値を保存する。`ttl` が `Some` の場合は有効期限付き
    ///
    /// 有効期限はミリ秒単位で扱う。1ms 未満の `ttl` はエラーになる。
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), InfraError>;

    /// ハンドルを閉じる
    ///
    /// 以降の操作はエラーになる。二重に呼び出しても安全。
    async fn close(&self);
}

/// Redis 接続マネージャを作成する
///
/// # 引数
///
/// * `redis_url` - Redis 接続 URL
///   - 形式: `redis://[[username:]password@]host[:port][/database]`
///   - TLS: `rediss://` スキームで TLS 接続
///
/// # エラー
///
/// - URL パースエラー: 不正な URL 形式
/// - 接続エラー: Redis サーバーに接続できない
pub async fn create_connection_manager(
    redis_url: &str,
) -> Result<ConnectionManager, redis::RedisError> {
    let client = Client::open(redis_url)?;
    ConnectionManager::new(client).await
}

/// `ConnectionManager` を使用した [`CacheStore`] 実装
///
/// `ConnectionManager` は Clone で共有できるが、明示的な close を持たない。
/// `close` でマネージャを取り外してドロップし、以降の操作を拒否する。
pub struct RedisCache {
    conn: RwLock<Option<ConnectionManager>>,
}

impl RedisCache {
    /// Redis に接続してキャッシュストアを作成する
    pub async fn connect(redis_url: &str) -> Result<Self, InfraError> {
        let conn = create_connection_manager(redis_url).await?;
        Ok(Self::new(conn))
    }

    /// 既存の接続マネージャからキャッシュストアを作成する
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn: RwLock::new(Some(conn)),
        }
    }

    /// 利用可能な接続マネージャの複製を取得する
    ///
    /// ロックはコマンド実行前に解放する。
    async fn connection(&self) -> Result<ConnectionManager, InfraError> {
        self.conn
            .read()
            .await
            .clone()
            .ok_or_else(|| InfraError::closed("redis"))
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, InfraError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), InfraError> {
        let mut conn = self.connection().await?;
        match ttl {
            Some(ttl) => {
                conn.pset_ex::<_, _, ()>(key, value, expiry_millis(ttl)?)
                    .await?
            }
            None => conn.set::<_, _, ()>(key, value).await?,
        }
        Ok(())
    }

    async fn close(&self) {
        if self.conn.write().await.take().is_some() {
            tracing::info!("Redis 接続を閉じました");
        }
    }
}

/// `PSETEX` に渡す有効期限（ミリ秒）
///
/// 0ms は Redis 側で拒否されるため、ここで `Unexpected` として返す。
fn expiry_millis(ttl: Duration) -> Result<u64, InfraError> {
    match u64::try_from(ttl.as_millis()) {
        Ok(0) => Err(InfraError::unexpected(format!(
            "有効期限が短すぎます: {ttl:?}"
        ))),
        Ok(millis) => Ok(millis),
        Err(_) => Err(InfraError::unexpected(format!(
            "有効期限が長すぎます: {ttl:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::error::InfraErrorKind;

    #[rstest]
    #[case(Duration::from_millis(500), 500)]
    #[case(Duration::from_secs(2), 2000)]
    #[case(Duration::from_millis(1500), 1500)]
    fn test_有効期限はミリ秒で切り捨てずに渡す(#[case] ttl: Duration, #[case] expected: u64) {
        assert_eq!(expiry_millis(ttl).unwrap(), expected);
    }

    #[rstest]
    #[case(Duration::ZERO)]
    #[case(Duration::from_micros(500))]
    fn test_1ms未満の有効期限はエラー(#[case] ttl: Duration) {
        let err = expiry_millis(ttl).unwrap_err();

        assert!(matches!(err.kind(), InfraErrorKind::Unexpected(_)));
    }
}
