//! Category/product tree over HTTP.
//!
//! Tests cover:
//! - Depth and kind rules on create, move and conversion
//! - Cycle rejection leaving coordinates untouched
//! - Subtree deletion with image cleanup and coordinate compaction
//! - Nested list rendering and filters

mod common;

use axum::http::StatusCode;
use common::TestApp;
use kitti_api::entities::{catalog_item, item_image};
use sea_orm::{sea_query::Expr, EntityTrait, PaginatorTrait};
use serde_json::{json, Value};

async fn category(app: &TestApp, title: &str, parent: Option<i64>) -> i64 {
    app.create("/api/categories", json!({"title": title, "parent_id": parent}))
        .await
}

async fn product(app: &TestApp, title: &str, parent: Option<i64>) -> i64 {
    app.create("/api/products", json!({"title": title, "parent_id": parent}))
        .await
}

fn error_code(body: &Value) -> &str {
    body["code"].as_str().unwrap_or_default()
}

// ==================== Tree Rules ====================

#[tokio::test]
async fn categories_nest_one_level_only() {
    let app = TestApp::new().await;
    let c1 = category(&app, "Giyim", None).await;
    let c2 = category(&app, "Elbise", Some(c1)).await;

    let (status, body) = app
        .post("/api/categories", json!({"title": "Yazlık", "parent_id": c2}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "too_deep");
    assert_eq!(app.catalog_coords().await.len(), 2);
}

#[tokio::test]
async fn products_only_attach_to_categories() {
    let app = TestApp::new().await;
    let c1 = category(&app, "Giyim", None).await;
    let p1 = product(&app, "Keten Elbise", Some(c1)).await;

    let (status, body) = app
        .post("/api/products", json!({"title": "Kemer", "parent_id": p1}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "invalid_parent");
}

#[tokio::test]
async fn product_becomes_parent_after_conversion() {
    let app = TestApp::new().await;
    let root = product(&app, "Aksesuar", None).await;

    let (status, body) = app
        .post("/api/categories", json!({"title": "Çanta", "parent_id": root}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "illegal_children");

    let (status, body) = app
        .post(&format!("/api/products/{}/convert", root), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["kind"], "category");

    category(&app, "Çanta", Some(root)).await;
    let (status, _) = app.get(&format!("/api/products/{}", root)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn category_with_children_cannot_become_product() {
    let app = TestApp::new().await;
    let c1 = category(&app, "Giyim", None).await;
    product(&app, "Keten Elbise", Some(c1)).await;

    let (status, body) = app
        .post(&format!("/api/categories/{}/convert", c1), json!({}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "illegal_children");
}

#[tokio::test]
async fn subtype_is_rejected_on_products() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(
            "/api/products",
            json!({"title": "Kemer", "category_subtype": "type1"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "misplaced_subtype");
}

#[tokio::test]
async fn moving_under_own_descendant_is_a_cycle() {
    let app = TestApp::new().await;
    let a = category(&app, "Giyim", None).await;
    let b = category(&app, "Elbise", Some(a)).await;
    product(&app, "Keten Elbise", Some(b)).await;
    category(&app, "Ayakkabı", None).await;
    let before = app.catalog_coords().await;

    let (status, body) = app
        .post(
            &format!("/api/categories/{}/move", a),
            json!({"parent_id": b}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "cycle");
    assert_eq!(app.catalog_coords().await, before);
}

#[tokio::test]
async fn move_reparents_whole_subtree() {
    let app = TestApp::new().await;
    let a = category(&app, "Ayakkabı", None).await;
    let b = category(&app, "Bot", None).await;
    let p = product(&app, "Deri Bot", Some(b)).await;

    let (status, body) = app
        .post(
            &format!("/api/categories/{}/move", b),
            json!({"parent_id": a, "position": "last_child"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["parent_id"], a);
    assert_eq!(body["data"]["level"], 1);

    let (_, body) = app.get(&format!("/api/products/{}", p)).await;
    assert_eq!(body["data"]["level"], 2);

    let (_, ancestors) = app.get(&format!("/api/categories/{}/ancestors", b)).await;
    let ids: Vec<i64> = ancestors["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![a]);
}

// ==================== Deletion ====================

#[tokio::test]
async fn delete_removes_subtree_and_images_and_compacts() {
    let app = TestApp::new().await;
    let zeta = category(&app, "Zeytin", None).await;
    let alpha = category(&app, "Ayakkabı", None).await;
    let sub = category(&app, "Bot", Some(alpha)).await;
    let boot = app
        .create(
            "/api/products",
            json!({
                "title": "Deri Bot",
                "parent_id": sub,
                "images": [{"image": "products/bot-1.jpg"}, {"image": "products/bot-2.jpg"}]
            }),
        )
        .await;

    assert_eq!(app.delete(&format!("/api/categories/{}", alpha)).await, StatusCode::NO_CONTENT);

    for uri in [
        format!("/api/categories/{}", sub),
        format!("/api/products/{}", boot),
    ] {
        let (status, _) = app.get(&uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} still present", uri);
    }
    let images = item_image::Entity::find()
        .count(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(images, 0);
    assert_eq!(app.catalog_coords().await, vec![(zeta, None, 1, 2, 0)]);
}

#[tokio::test]
async fn deleting_through_wrong_kind_is_not_found() {
    let app = TestApp::new().await;
    let c1 = category(&app, "Giyim", None).await;
    assert_eq!(app.delete(&format!("/api/products/{}", c1)).await, StatusCode::NOT_FOUND);
    assert_eq!(app.catalog_coords().await.len(), 1);
}

#[tokio::test]
async fn rebuild_restores_coordinates_from_parent_links() {
    let app = TestApp::new().await;
    let root = category(&app, "Giyim", None).await;
    let sub = category(&app, "Elbise", Some(root)).await;
    product(&app, "Keten Elbise", Some(sub)).await;
    product(&app, "Atkı", Some(root)).await;
    let before = app.catalog_coords().await;

    catalog_item::Entity::update_many()
        .col_expr(catalog_item::Column::Lft, Expr::value(0))
        .col_expr(catalog_item::Column::Rght, Expr::value(0))
        .exec(&*app.state.db)
        .await
        .unwrap();

    let placed = app.state.services.catalog.rebuild_tree().await.unwrap();
    assert_eq!(placed, 4);
    assert_eq!(app.catalog_coords().await, before);
}

// ==================== Listing ====================

#[tokio::test]
async fn category_list_nests_subcategories_before_products() {
    let app = TestApp::new().await;
    let root = category(&app, "Giyim", None).await;
    product(&app, "Atkı", Some(root)).await;
    let sub = category(&app, "Elbise", Some(root)).await;
    product(&app, "Keten Elbise", Some(sub)).await;

    let (status, body) = app.get("/api/categories").await;
    assert_eq!(status, StatusCode::OK);
    let page = &body["data"];
    assert_eq!(page["total"], 1);
    assert_eq!(page["per_page"], 20);

    let tree = &page["items"][0];
    assert_eq!(tree["id"], root);
    assert_eq!(tree["products_count"], 1);
    let children = tree["children"].as_array().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0]["id"], sub);
    assert_eq!(children[0]["children"][0]["title"], "Keten Elbise");
    assert_eq!(children[1]["kind"], "product");
}

#[tokio::test]
async fn search_matches_any_language_case_insensitively() {
    let app = TestApp::new().await;
    app.create(
        "/api/categories",
        json!({"title_tr": "Ayakkabı", "title_en": "Shoes"}),
    )
    .await;
    category(&app, "Giyim", None).await;

    let (_, body) = app.get("/api/categories?search=SHOE").await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["title"], "Ayakkabı");

    let (_, body) = app.get("/api/categories?search=shoe&lang=en").await;
    assert_eq!(body["data"]["items"][0]["title"], "Shoes");
}

#[tokio::test]
async fn search_wildcards_match_literally() {
    let app = TestApp::new().await;
    category(&app, "Giyim", None).await;
    category(&app, "%100 Pamuk", None).await;

    let (status, body) = app.get("/api/categories?search=%25").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["title"], "%100 Pamuk");

    let (_, body) = app.get("/api/categories?search=_").await;
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn page_beyond_any_offset_is_empty() {
    let app = TestApp::new().await;
    category(&app, "Giyim", None).await;

    let (status, body) = app
        .get("/api/categories?page=18446744073709551615")
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["total"], 1);
    assert!(body["data"]["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn products_filter_by_category_and_paginate() {
    let app = TestApp::new().await;
    let shoes = category(&app, "Ayakkabı", None).await;
    let bags = category(&app, "Çanta", None).await;
    for title in ["Bot", "Cizme", "Sandalet"] {
        product(&app, title, Some(shoes)).await;
    }
    product(&app, "Sırt Çantası", Some(bags)).await;

    let (_, body) = app
        .get(&format!("/api/products?category={}&per_page=2&page=2", shoes))
        .await;
    let page = &body["data"];
    assert_eq!(page["total"], 3);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["items"][0]["title"], "Sandalet");
}

#[tokio::test]
async fn siblings_follow_turkish_title_order() {
    let app = TestApp::new().await;
    let root = category(&app, "Giyim", None).await;
    let zeta = category(&app, "Yelek", Some(root)).await;
    let alpha = category(&app, "Atlet", Some(root)).await;

    let (_, body) = app.get(&format!("/api/categories/{}/children", root)).await;
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![alpha, zeta]);

    // renaming repositions the node among its siblings
    let (status, _) = app
        .patch(&format!("/api/categories/{}", alpha), json!({"title": "Zıbın"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get(&format!("/api/categories/{}/descendants", root)).await;
    assert_eq!(body["data"][0]["id"], zeta);
}
