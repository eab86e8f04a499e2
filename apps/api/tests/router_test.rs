//! # ルーター統合テスト
//!
//! `Router::register_routes` → `Router::engine` で得たエンジンに
//! `oneshot` でリクエストを送り、エンドポイントの振る舞いを検証する。
//!
//! - `/api/ping` はストアの状態に関係なく 200 `{"message": "pong"}`
//! - `/api/health` は疎通成功で 200、失敗・タイムアウトで 503
//! - 未定義パスは 404 の Problem Details
//! - 全レスポンスに `x-request-id` が付与される

mod common;

use std::time::Duration;

use authsvc_infra::mock::MockRelationalStore;
use axum::body::Body;
use common::{body_json, engine_with, send_get};
use http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use tower::ServiceExt;

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[rstest]
#[case::healthy(MockRelationalStore::healthy())]
#[case::failing(MockRelationalStore::failing())]
#[tokio::test]
async fn test_pingはストアに依存せずpongを返す(#[case] store: MockRelationalStore) {
    let app = engine_with(&store, PROBE_TIMEOUT);

    let response = send_get(app, "/api/ping").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "message": "pong" }));
    assert_eq!(store.calls(), 0, "ストアにアクセスしないこと");
}

#[tokio::test]
async fn test_healthは疎通成功で200とhealthyを返す() {
    let store = MockRelationalStore::healthy();
    let app = engine_with(&store, PROBE_TIMEOUT);

    let response = send_get(app, "/api/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"], json!({ "database": "ok" }));
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn test_healthは疎通失敗で503とunhealthyを返す() {
    let store = MockRelationalStore::failing();
    let app = engine_with(&store, PROBE_TIMEOUT);

    let response = send_get(app, "/api/health").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["checks"], json!({ "database": "error" }));
}

#[tokio::test]
async fn test_healthは疎通タイムアウトで503を返す() {
    let store = MockRelationalStore::hanging();
    let app = engine_with(&store, Duration::from_millis(100));

    let response = tokio::time::timeout(Duration::from_secs(5), send_get(app, "/api/health"))
        .await
        .expect("プローブのタイムアウトでレスポンスが返ること");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["status"], "unhealthy");
}

#[tokio::test]
async fn test_healthは失敗後もサーバーが応答し続ける() {
    let store = MockRelationalStore::failing();
    let app = engine_with(&store, PROBE_TIMEOUT);

    let first = send_get(app.clone(), "/api/health").await;
    let second = send_get(app, "/api/ping").await;

    assert_eq!(first.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(second.status(), StatusCode::OK);
}

#[rstest]
#[case("/health")]
#[case("/api/unknown")]
#[case("/api/ping/extra")]
#[tokio::test]
async fn test_未定義パスは404のproblem_detailsを返す(#[case] uri: &str) {
    let app = engine_with(&MockRelationalStore::healthy(), PROBE_TIMEOUT);

    let response = send_get(app, uri).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["type"], "https://authsvc.example.com/errors/not-found");
}

#[tokio::test]
async fn test_レスポンスにuuid_v7のx_request_idが付与される() {
    let app = engine_with(&MockRelationalStore::healthy(), PROBE_TIMEOUT);

    let response = send_get(app, "/api/ping").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id ヘッダーが含まれること")
        .to_str()
        .unwrap();
    let parsed = uuid::Uuid::parse_str(request_id).expect("UUID として解釈できること");
    assert_eq!(parsed.get_version(), Some(uuid::Version::SortRand));
}

#[tokio::test]
async fn test_クライアント提供のx_request_idがそのまま返される() {
    let app = engine_with(&MockRelationalStore::healthy(), PROBE_TIMEOUT);
    let custom_id = "client-provided-request-id-123";

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("x-request-id", custom_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .unwrap()
            .to_str()
            .unwrap(),
        custom_id
    );
}

#[tokio::test]
async fn test_404レスポンスにもx_request_idが付与される() {
    let app = engine_with(&MockRelationalStore::healthy(), PROBE_TIMEOUT);

    let response = send_get(app, "/nowhere").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key("x-request-id"));
}
