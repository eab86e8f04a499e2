//! # アプリケーション設定
//!
//! 環境変数からアプリケーション設定を読み込む。
//!
//! ## 設計方針
//!
//! [12-Factor App](https://12factor.net/ja/config) の原則に従い、
//! すべての設定を環境変数から読み込む。
//! 数値の不正値は黙ってデフォルトに置き換えず、起動時エラーとする。
//! 接続数とタイムアウトは 0 も不正値として扱う。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `APP_HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `APP_PORT` | No | `8080` | ポート番号 |
//! | `DATABASE_URL` | **Yes** | - | PostgreSQL 接続 URL |
//! | `DATABASE_MAX_CONNECTIONS` | No | `10` | コネクションプールの最大接続数 |
//! | `REDIS_URL` | No | `redis://localhost:6379` | Redis 接続 URL |
//! | `HEALTH_PROBE_TIMEOUT_MS` | No | `3000` | ヘルスチェックの DB 疎通タイムアウト |
//!
//! ログ形式（`LOG_FORMAT`）は `authsvc_shared::observability` が読み込む。

use std::{env, str::FromStr, time::Duration};

use serde::{Serialize, Serializer};
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
const DEFAULT_PROBE_TIMEOUT_MS: u64 = 3000;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("環境変数 {0} が設定されていません")]
    Missing(&'static str),

    /// 値の形式が不正
    #[error("環境変数 {key} の値が不正です: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// HTTP サーバー設定
#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` 形式のバインドアドレス
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// データベース接続設定
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseConfig {
    /// 接続 URL（認証情報を含むため診断出力ではマスクする）
    #[serde(serialize_with = "redact")]
    pub url:             String,
    pub max_connections: u32,
}

/// Redis 接続設定
#[derive(Debug, Clone, Serialize)]
pub struct RedisConfig {
    #[serde(serialize_with = "redact")]
    pub url: String,
}

/// ヘルスチェック設定
#[derive(Debug, Clone, Serialize)]
pub struct HealthConfig {
    pub probe_timeout_ms: u64,
}

impl HealthConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

/// アプリケーション全体の設定
///
/// 起動時に一度だけ構築する。`Serialize` は診断ログ用で、接続 URL はマスクされる。
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub server:   ServerConfig,
    pub database: DatabaseConfig,
    pub redis:    RedisConfig,
    pub health:   HealthConfig,
}

impl AppConfig {
    /// プロセスの環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー解決関数から設定を読み込む
    ///
    /// テストではプロセス環境を書き換えずに済むよう、この関数を直接使う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            server:   ServerConfig {
                host: lookup("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: parse_or(&lookup, "APP_PORT", DEFAULT_PORT)?,
            },
            database: DatabaseConfig {
                url:             database_url,
                max_connections: parse_nonzero_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_MAX_CONNECTIONS,
                )?,
            },
            redis:    RedisConfig {
                url: lookup("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            },
            health:   HealthConfig {
                probe_timeout_ms: parse_nonzero_or(
                    &lookup,
                    "HEALTH_PROBE_TIMEOUT_MS",
                    DEFAULT_PROBE_TIMEOUT_MS,
                )?,
            },
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

/// [`parse_or`] に加えて、型のゼロ値（`T::default()`）を拒否する
fn parse_nonzero_or<T: FromStr + Default + PartialEq>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    let parsed = parse_or(lookup, key, default)?;
    if parsed == T::default() {
        return Err(ConfigError::Invalid {
            key,
            value: lookup(key).unwrap_or_default(),
        });
    }
    Ok(parsed)
}

fn redact<S: Serializer>(_value: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str("***")
}
