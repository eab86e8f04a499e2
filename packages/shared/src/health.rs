//! # ヘルスチェック共通型
//!
//! `/api/health` と `/api/ping` が返すレスポンス型を提供する。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 個別チェックの結果ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// チェック成功
    Ok,
    /// チェック失敗（エラーまたはタイムアウト）
    Error,
}

/// サービス全体の稼働状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// 全チェックが成功
    Healthy,
    /// 1 つ以上のチェックが失敗
    Unhealthy,
}

/// ヘルスチェックレスポンス
///
/// `status` は全体の稼働状態、`checks` は依存先ごとの結果を示す。
/// `checks` は出力順を安定させるため `BTreeMap` で保持する。
///
/// ## 使用例
///
/// ```
/// use authsvc_shared::{CheckStatus, HealthResponse, HealthStatus};
///
/// let response = HealthResponse::from_checks(
///     "0.1.0",
///     [("database".to_string(), CheckStatus::Ok)].into(),
/// );
/// assert_eq!(response.status, HealthStatus::Healthy);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 稼働状態（`"healthy"` または `"unhealthy"`）
    pub status:  HealthStatus,
    /// アプリケーションバージョン（Cargo.toml から取得）
    pub version: String,
    /// 個別チェック結果（キー: チェック名、値: ステータス）
    pub checks:  BTreeMap<String, CheckStatus>,
}

impl HealthResponse {
    /// 個別チェック結果から全体のステータスを決定してレスポンスを作る
    ///
    /// 1 つでも [`CheckStatus::Error`] があれば [`HealthStatus::Unhealthy`]。
    pub fn from_checks(version: impl Into<String>, checks: BTreeMap<String, CheckStatus>) -> Self {
        let status = if checks.values().all(|s| *s == CheckStatus::Ok) {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        };
        Self {
            status,
            version: version.into(),
            checks,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// `/api/ping` のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
}

impl PingResponse {
    pub fn pong() -> Self {
        Self {
            message: "pong".to_string(),
        }
    }
}
