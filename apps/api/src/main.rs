//! # authsvc サーバー
//!
//! 共有コンテキストを構築し、ルーターを登録してから HTTP サーバーを起動する。
//!
//! ## 起動手順
//!
//! 1. `.env` の読み込みとトレーシング初期化
//! 2. 環境変数から設定を読み込む
//! 3. PostgreSQL と Redis に接続し、[`AppContext`] を構築
//! 4. [`Router`] を構築してルートを登録
//! 5. リスナーに bind して serve（Ctrl+C / SIGTERM でグレースフルシャットダウン）
//! 6. 外部リソースを解放
//!
//! 初期化のいずれかが失敗した場合はエラーログを出力して非ゼロで終了する。

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use authsvc_api::{
    AppContext,
    Router,
    config::AppConfig,
    controller::ControllerConfig,
};
use authsvc_infra::{PgStore, RedisCache};
use authsvc_shared::{
    format::to_pretty_json,
    observability::{self, TracingConfig},
};
use tokio::net::TcpListener;

const SERVICE_NAME: &str = "authsvc";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env(SERVICE_NAME);
    observability::init_tracing(&tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = %tracing_config.service_name).entered();

    if let Err(e) = run().await {
        tracing::error!(error = ?e, "起動に失敗しました");
        return Err(e);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("設定の読み込みに失敗しました")?;
    tracing::debug!("有効な設定:\n{}", to_pretty_json(&config));

    let db = PgStore::connect(&config.database.url, config.database.max_connections)
        .await
        .context("データベース接続に失敗しました")?;
    tracing::info!("データベースに接続しました");

    let cache = RedisCache::connect(&config.redis.url)
        .await
        .context("Redis 接続に失敗しました")?;
    tracing::info!("Redis に接続しました");

    let ctx = AppContext::new(Arc::new(db), Arc::new(cache));

    let mut router = Router::with_config(
        &ctx,
        &ControllerConfig {
            health_probe_timeout: config.health.probe_timeout(),
        },
    );
    router.register_routes()?;
    let app = router.engine()?;

    let addr: SocketAddr = config
        .server
        .bind_address()
        .parse()
        .with_context(|| format!("不正なバインドアドレスです: {}", config.server.bind_address()))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("{addr} に bind できませんでした"))?;
    tracing::info!("{SERVICE_NAME} サーバーを起動します: {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("サーバーが異常終了しました")?;

    ctx.shutdown().await;
    tracing::info!("サーバーを停止しました");
    Ok(())
}

/// Ctrl+C または SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+C ハンドラの登録に失敗しました");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM ハンドラの登録に失敗しました");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("シャットダウンシグナルを受信しました");
}
