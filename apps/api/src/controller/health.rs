//! # ヘルスチェックハンドラ
//!
//! リレーショナルストアへの疎通確認（`SELECT 1`）でサービスの稼働状態を返す。
//!
//! - 疎通成功 → 200 `{"status": "healthy", ...}`
//! - 失敗またはタイムアウト → 503 `{"status": "unhealthy", ...}`
//!
//! リトライは行わない。タイムアウトした問い合わせの Future は破棄される。

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use authsvc_infra::{InfraError, RelationalStore};
use authsvc_shared::{CheckStatus, HealthResponse};
use axum::{Json, http::StatusCode};

/// 疎通確認のデフォルトタイムアウト
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// ヘルスチェックのコントローラ
///
/// リレーショナルストアのハンドルとタイムアウトのみを保持する。
/// リクエストごとの可変状態は持たない。
pub struct HealthController {
    db:            Arc<dyn RelationalStore>,
    probe_timeout: Duration,
}

impl HealthController {
    pub fn new(db: Arc<dyn RelationalStore>, probe_timeout: Duration) -> Self {
        Self { db, probe_timeout }
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    /// `GET /api/health` のハンドラ本体
    ///
    /// 呼び出し側から受け取るパラメータはない。
    #[tracing::instrument(skip_all)]
    pub async fn check(self: Arc<Self>) -> (StatusCode, Json<HealthResponse>) {
        let mut checks = BTreeMap::new();
        checks.insert("database".to_string(), self.probe_database().await);

        let response = HealthResponse::from_checks(env!("CARGO_PKG_VERSION"), checks);
        let status = if response.is_healthy() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        (status, Json(response))
    }

    async fn probe_database(&self) -> CheckStatus {
        match tokio::time::timeout(self.probe_timeout, self.db.ping()).await {
            Ok(Ok(())) => CheckStatus::Ok,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "health check: database ping failed");
                CheckStatus::Error
            }
            Err(_) => {
                let err = InfraError::timeout("ping", self.probe_timeout);
                tracing::warn!(error = %err, "health check: database ping timed out");
                CheckStatus::Error
            }
        }
    }
}
