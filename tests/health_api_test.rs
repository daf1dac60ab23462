mod common;

use axum::http::{header, Method, StatusCode};
use common::{response_json, TestApp};

#[tokio::test]
async fn health_reports_database_and_mail_state() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["checks"]["database"], "healthy");
    assert_eq!(body["data"]["checks"]["smtp"], "disabled");
    assert_eq!(body["data"]["environment"], "development");
}

#[tokio::test]
async fn root_redirects_to_docs() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/", None).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/api/docs/swagger"
    );
}

#[tokio::test]
async fn responses_echo_request_id() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/api/categories/999", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let header = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["request_id"], header.as_str());
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/categories"].is_object());
    assert!(body["paths"]["/api/contact/submit"].is_object());
}
