mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

fn ids(body: &Value) -> Vec<i64> {
    body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn sliders_keep_insertion_order_until_moved() {
    let app = TestApp::new().await;
    let first = app
        .create("/api/sliders", json!({"title": "Yeni sezon", "image": "sliders/season.jpg"}))
        .await;
    let second = app
        .create("/api/sliders", json!({"title": "İndirim", "image": "sliders/sale.jpg"}))
        .await;

    let (_, body) = app.get("/api/sliders").await;
    assert_eq!(ids(&body), vec![first, second]);

    let (status, body) = app
        .post(
            &format!("/api/sliders/{}/move", second),
            json!({"parent_id": null, "position": {"before": first}}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (_, body) = app.get("/api/sliders").await;
    assert_eq!(ids(&body), vec![second, first]);
    assert_eq!(body["data"]["items"][0]["lft"], 1);
}

#[tokio::test]
async fn slider_image_resolves_per_language() {
    let app = TestApp::new().await;
    let id = app
        .create("/api/sliders", json!({"image": "sliders/tr.jpg"}))
        .await;
    let uri = format!("/api/sliders/{}", id);

    let (_, en) = app.get(&format!("{}?lang=en", uri)).await;
    assert_eq!(en["data"]["image"], "/media/sliders/tr.jpg");

    let (status, _) = app
        .patch(&format!("{}?lang=en", uri), json!({"image": "sliders/en.jpg"}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, en) = app.get(&format!("{}?lang=en", uri)).await;
    assert_eq!(en["data"]["image"], "/media/sliders/en.jpg");
    let (_, tr) = app.get(&uri).await;
    assert_eq!(tr["data"]["image"], "/media/sliders/tr.jpg");
}

#[tokio::test]
async fn slider_image_is_required() {
    let app = TestApp::new().await;
    let (status, body) = app.post("/api/sliders", json!({"title": "Boş"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let id = app
        .create("/api/sliders", json!({"image": "sliders/a.jpg"}))
        .await;
    let (status, _) = app
        .put(&format!("/api/sliders/{}", id), json!({"title": "Yalnız başlık"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_slider_removes_nested_ones() {
    let app = TestApp::new().await;
    let parent = app
        .create("/api/sliders", json!({"image": "sliders/parent.jpg"}))
        .await;
    app.create(
        "/api/sliders",
        json!({"image": "sliders/child.jpg", "parent_id": parent}),
    )
    .await;
    let other = app
        .create("/api/sliders", json!({"image": "sliders/other.jpg"}))
        .await;

    assert_eq!(
        app.delete(&format!("/api/sliders/{}", parent)).await,
        StatusCode::NO_CONTENT
    );

    let (_, body) = app.get("/api/sliders").await;
    assert_eq!(ids(&body), vec![other]);
    assert_eq!(body["data"]["items"][0]["lft"], 1);
    assert_eq!(body["data"]["items"][0]["rght"], 2);
}
