//! テスト共通ヘルパー
//!
//! スタブストアを注入したエンジンの構築、リクエスト送信、
//! ログイベントのキャプチャを提供する。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use authsvc_api::{AppContext, Router, controller::ControllerConfig};
use authsvc_infra::mock::{MockCacheStore, MockRelationalStore};
use axum::{body::Body, response::Response};
use http::Request;
use tower::ServiceExt;
use tracing_subscriber::layer::SubscriberExt;

// =============================================================================
// エンジン構築
// =============================================================================

pub fn context_with(store: &MockRelationalStore) -> AppContext {
    AppContext::new(Arc::new(store.clone()), Arc::new(MockCacheStore::new()))
}

/// スタブストアを注入し、ルート登録済みのエンジンを返す
pub fn engine_with(store: &MockRelationalStore, probe_timeout: Duration) -> axum::Router {
    let mut router = Router::with_config(
        &context_with(store),
        &ControllerConfig {
            health_probe_timeout: probe_timeout,
        },
    );
    router.register_routes().unwrap();
    router.engine().unwrap()
}

pub async fn send_get(app: axum::Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// ログキャプチャ
// =============================================================================

/// キャプチャした 1 件のログイベント（メッセージもフィールドの 1 つとして保持）
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level:  tracing::Level,
    pub fields: BTreeMap<String, String>,
}

impl LogRecord {
    pub fn message(&self) -> &str {
        self.field("message").unwrap_or_default()
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// テスト中に出力されたログイベントの記録
#[derive(Clone, Default)]
pub struct LogSink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl LogSink {
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    /// 指定メッセージのうち、`http.path` が一致するもの
    pub fn with_message_for_path(&self, message: &str, path: &str) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.message() == message && r.field("http.path") == Some(path))
            .collect()
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogSink {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut fields = FieldMap::default();
        event.record(&mut fields);
        self.records.lock().unwrap().push(LogRecord {
            level:  *event.metadata().level(),
            fields: fields.0,
        });
    }
}

#[derive(Default)]
struct FieldMap(BTreeMap<String, String>);

impl tracing::field::Visit for FieldMap {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_owned(), format!("{value:?}"));
    }
}

/// スレッドローカルなサブスクライバでログを記録する
///
/// 返り値のガードをドロップすると記録が止まる。
/// `#[tokio::test]` の current_thread ランタイムでのみ全イベントを拾える。
pub fn capture_logs() -> (tracing::subscriber::DefaultGuard, LogSink) {
    let sink = LogSink::default();
    let subscriber = tracing_subscriber::registry().with(sink.clone());
    (tracing::subscriber::set_default(subscriber), sink)
}
