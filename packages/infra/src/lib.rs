//! # authsvc インフラ層
//!
//! 外部ストアとの接続・通信を担当する。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プール管理（[`db`]）
//! - **キャッシュ接続**: Redis への接続管理（[`redis`]）
//! - **エラー定義**: インフラ層エラー（[`error`]）
//!
//! 上位層はトレイト（[`RelationalStore`], [`CacheStore`]）にのみ依存し、
//! 具象型は起動処理でだけ扱う。
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use authsvc_infra::{PgStore, RedisCache};
//!
//! async fn setup() -> Result<(), authsvc_infra::InfraError> {
//!     let db = PgStore::connect("postgres://localhost/authsvc", 10).await?;
//!     let cache = RedisCache::connect("redis://localhost").await?;
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod redis;

pub use db::{PgStore, RelationalStore};
pub use error::{InfraError, InfraErrorKind};
pub use self::redis::{CacheStore, RedisCache};
