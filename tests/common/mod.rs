#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use kitti_api::{
    config::AppConfig,
    db::{self, DbConfig},
    entities::catalog_item,
    notifications::{LogNotifier, Notifier},
    AppState,
};
use http_body_util::BodyExt;
use sea_orm::{EntityTrait, QueryOrder};
use serde_json::Value;
use tower::ServiceExt;

/// Application over a private in-memory SQLite database
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_notifier(Arc::new(LogNotifier)).await
    }

    pub async fn with_notifier(notifier: Arc<dyn Notifier>) -> Self {
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "development".to_string(),
        );

        // every pooled connection would open its own empty database
        let pool = db::establish_connection_with_config(&DbConfig {
            url: cfg.database_url.clone(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        })
        .await
        .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg, notifier);
        let router = kitti_api::build_router(state.clone());
        Self { router, state }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
            }
            None => Body::empty(),
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Sends the request and decodes the JSON body (`Null` when empty)
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> StatusCode {
        self.request(Method::DELETE, uri, None).await.status()
    }

    /// Creates through the API and returns the new id
    pub async fn create(&self, uri: &str, body: Value) -> i64 {
        let (status, json) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", json);
        json["data"]["id"].as_i64().expect("created id")
    }

    /// `(id, parent_id, lft, rght, depth)` for every catalog row, by id
    pub async fn catalog_coords(&self) -> Vec<(i64, Option<i64>, i64, i64, i64)> {
        catalog_item::Entity::find()
            .order_by_asc(catalog_item::Column::Id)
            .all(&*self.state.db)
            .await
            .expect("catalog rows")
            .into_iter()
            .map(|m| (m.id, m.parent_id, m.lft, m.rght, m.depth))
            .collect()
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("response body bytes")
        .to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("json response")
}
