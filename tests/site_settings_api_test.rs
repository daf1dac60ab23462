//! Site settings with nested page blocks.
//!
//! Tests cover:
//! - Creating a record with its owned collections
//! - Sync by id: update kept rows, create new ones, delete the rest
//! - Replace-all for payloads without ids
//! - Foreign ids rejecting the whole write
//! - Cascading delete

mod common;

use axum::http::StatusCode;
use common::TestApp;
use kitti_api::entities::{contact_address, menu_item};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{json, Value};

fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect()
}

async fn site(app: &TestApp) -> (i64, Value) {
    let (status, body) = app
        .post(
            "/api/site-settings",
            json!({
                "site_title_tr": "Kitti",
                "site_title_en": "Kitti Store",
                "logo": "site/logo.svg",
                "menu_items": [
                    {"href": "/", "text_tr": "Ana Sayfa", "text_en": "Home"},
                    {"href": "/products", "text_tr": "Ürünler", "text_en": "Products"}
                ],
                "contact_sections": [{
                    "title": "İletişim",
                    "addresses": [{"tel": "+90 212 000 00 00", "tel_wp": "+90 532 000 00 00", "title": "Merkez"}],
                    "mails": [{"mail": "info@kitti.com.tr"}]
                }],
                "footer_info": {"footer_text_tr": "Tüm hakları saklıdır."},
                "faq_items": [{"question": "Kargo?", "answer": "Ücretsiz.", "sort_order": 1}]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    (body["data"]["id"].as_i64().unwrap(), body["data"].clone())
}

#[tokio::test]
async fn create_returns_every_block_in_request_language() {
    let app = TestApp::new().await;
    let (id, created) = site(&app).await;
    assert_eq!(created["site_title"], "Kitti");
    assert_eq!(created["logo"], "/media/site/logo.svg");
    assert_eq!(created["menu_items"][0]["text"], "Ana Sayfa");
    assert_eq!(created["contact_sections"][0]["mails"][0]["mail"], "info@kitti.com.tr");

    let (status, en) = app.get(&format!("/api/site-settings/{}?lang=en", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(en["data"]["site_title"], "Kitti Store");
    assert_eq!(en["data"]["menu_items"][1]["text"], "Products");
    assert_eq!(en["data"]["footer_info"]["footer_text"], "Tüm hakları saklıdır.");

    let (_, list) = app.get("/api/site-settings").await;
    assert_eq!(list["data"]["total"], 1);
}

#[tokio::test]
async fn collections_sync_by_id() {
    let app = TestApp::new().await;
    let (id, created) = site(&app).await;
    let existing = ids(&created["menu_items"]);

    let (status, body) = app
        .patch(
            &format!("/api/site-settings/{}?lang=en", id),
            json!({
                "menu_items": [
                    {"id": existing[1], "href": "/catalog", "text": "Catalog"},
                    {"href": "/contact", "text_tr": "İletişim"}
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let menu = &body["data"]["menu_items"];
    let kept = ids(menu);
    assert_eq!(kept.len(), 2);
    assert!(kept.contains(&existing[1]));
    assert!(!kept.contains(&existing[0]));

    let updated = menu
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["id"] == existing[1])
        .unwrap();
    assert_eq!(updated["href"], "/catalog");
    assert_eq!(updated["text"], "Catalog");

    // untouched collections stay as they were
    assert_eq!(body["data"]["faq_items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn payload_without_ids_replaces_collection() {
    let app = TestApp::new().await;
    let (id, created) = site(&app).await;
    let before = ids(&created["menu_items"]);

    let (_, body) = app
        .patch(
            &format!("/api/site-settings/{}", id),
            json!({"menu_items": [{"href": "/", "text": "Anasayfa"}]}),
        )
        .await;
    let after = ids(&body["data"]["menu_items"]);
    assert_eq!(after.len(), 1);
    assert!(!before.contains(&after[0]));

    let (_, body) = app
        .patch(&format!("/api/site-settings/{}", id), json!({"menu_items": []}))
        .await;
    assert!(body["data"]["menu_items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn foreign_id_rejects_whole_write() {
    let app = TestApp::new().await;
    let (first, _) = site(&app).await;
    let (second, other) = site(&app).await;
    let foreign = ids(&other["menu_items"])[0];

    let (status, body) = app
        .patch(
            &format!("/api/site-settings/{}", first),
            json!({
                "site_title": "Yeni Başlık",
                "menu_items": [{"id": foreign, "href": "/stolen", "text": "Çalıntı"}]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (_, unchanged) = app.get(&format!("/api/site-settings/{}", first)).await;
    assert_eq!(unchanged["data"]["site_title"], "Kitti");
    let (_, other) = app.get(&format!("/api/site-settings/{}", second)).await;
    assert_eq!(other["data"]["menu_items"][0]["href"], "/");
}

#[tokio::test]
async fn replace_requires_site_title() {
    let app = TestApp::new().await;
    let (id, _) = site(&app).await;
    let (status, body) = app
        .put(&format!("/api/site-settings/{}", id), json!({"logo": null}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["site_title"].is_array());
}

#[tokio::test]
async fn invalid_contact_mail_is_rejected() {
    let app = TestApp::new().await;
    let (status, _) = app
        .post(
            "/api/site-settings",
            json!({
                "site_title": "Kitti",
                "contact_sections": [{"title": "İletişim", "mails": [{"mail": "not-an-address"}]}]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_cascades_to_owned_rows() {
    let app = TestApp::new().await;
    let (id, _) = site(&app).await;

    assert_eq!(
        app.delete(&format!("/api/site-settings/{}", id)).await,
        StatusCode::NO_CONTENT
    );
    let (status, _) = app.get(&format!("/api/site-settings/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let db = &*app.state.db;
    assert_eq!(menu_item::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(contact_address::Entity::find().count(db).await.unwrap(), 0);
}
