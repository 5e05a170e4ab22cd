use crate::helpers::{TEST_ORIGIN, TestApp, test_settings};

use reqwest::{Method, StatusCode};
use statusac::startup::{Application, StartupError};

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app
        .get_client()
        .get(app.get_url("/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn index_serves_the_front_end() {
    let app = TestApp::spawn().await;

    let response = app
        .get_client()
        .get(app.get_url("/"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let page = response.text().await.unwrap();
    assert!(page.contains("<title>URL Status Checker</title>"));
    assert!(page.contains("sessionStorage"));
    assert!(page.contains("fetch('/check'"));
}

#[tokio::test]
async fn preflight_allows_configured_origins() {
    let app = TestApp::spawn().await;

    let response = app
        .get_client()
        .request(Method::OPTIONS, app.get_url("/check"))
        .header("origin", TEST_ORIGIN)
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        TEST_ORIGIN
    );
}

#[tokio::test]
async fn invalid_cors_origin_fails_startup() {
    let mut settings = test_settings();
    settings.cors.allowed_origins = vec!["http://bad\norigin".to_string()];

    let outcome = Application::build(settings).await;

    assert!(matches!(outcome, Err(StartupError::CorsOrigin { .. })));
}
