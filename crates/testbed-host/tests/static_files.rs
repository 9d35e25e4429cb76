//! Static file serving tests: the router's fallback serves the frontend
//! directory, with `index.html` at `/` and 404 for missing assets.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use testbed_host::{Config, OAuthClient};

fn build_app(static_dir: &std::path::Path) -> Router {
    let mut config = Config::for_testing("http://unused.localhost");
    config.static_dir = static_dir.to_path_buf();
    let config = Arc::new(config);
    let oauth = OAuthClient::new(&config).expect("client builds");
    testbed_host::server::create_router(config, oauth)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_root_serves_index() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>testbed entry</html>").unwrap();
    let app = build_app(dir.path());

    let response =
        app.oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("testbed entry"));
}

#[tokio::test]
async fn test_nested_asset_is_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("js")).unwrap();
    std::fs::write(dir.path().join("js").join("app.js"), "console.log('hi');").unwrap();
    let app = build_app(dir.path());

    let response =
        app.oneshot(Request::get("/js/app.js").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("console.log"));
}

#[tokio::test]
async fn test_missing_asset_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(dir.path());

    let response = app
        .oneshot(Request::get("/does-not-exist.png").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_routes_shadow_static_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("api")).unwrap();
    std::fs::write(dir.path().join("api").join("token"), "not this one").unwrap();
    let app = build_app(dir.path());

    // /api/token is the session endpoint, never the file
    let response = app
        .oneshot(Request::get("/api/token").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
