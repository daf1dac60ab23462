//! Contact form submission and its one-shot notification.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::TestApp;
use kitti_api::{
    entities::contact_form_entry,
    notifications::{NotificationError, Notifier},
};
use mockall::mock;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{json, Value};

mock! {
    pub Mailer {}

    #[async_trait]
    impl Notifier for Mailer {
        async fn contact_submitted(
            &self,
            entry: &contact_form_entry::Model,
        ) -> Result<(), NotificationError>;
    }
}

fn submission(accept_terms: bool) -> Value {
    json!({
        "name": "Ayşe Yılmaz",
        "email": "ayse@example.com",
        "phone": "0555 000 00 00",
        "message": "Toptan fiyat alabilir miyim?",
        "accept_terms": accept_terms,
        "subscribe_newsletter": true
    })
}

async fn stored(app: &TestApp, id: i64) -> contact_form_entry::Model {
    contact_form_entry::Entity::find_by_id(id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .expect("stored submission")
}

#[tokio::test]
async fn rejected_terms_store_nothing_and_send_nothing() {
    let mut mailer = MockMailer::new();
    mailer.expect_contact_submitted().times(0);
    let app = TestApp::with_notifier(Arc::new(mailer)).await;

    let (status, body) = app.post("/api/contact/submit", submission(false)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
    assert!(body["fields"]["accept_terms"].is_array());
    let count = contact_form_entry::Entity::find()
        .count(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn delivered_notification_marks_entry() {
    let mut mailer = MockMailer::new();
    mailer
        .expect_contact_submitted()
        .withf(|entry| entry.email == "ayse@example.com" && entry.subscribe_newsletter)
        .times(1)
        .returning(|_| Ok(()));
    let app = TestApp::with_notifier(Arc::new(mailer)).await;

    let (status, body) = app.post("/api/contact/submit", submission(true)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["name"], "Ayşe Yılmaz");

    let id = body["data"]["id"].as_i64().unwrap();
    assert!(stored(&app, id).await.was_notified);
}

#[tokio::test]
async fn failed_notification_still_accepts_submission() {
    let mut mailer = MockMailer::new();
    mailer
        .expect_contact_submitted()
        .times(1)
        .returning(|_| Err(NotificationError::NotConfigured("smtp_host")));
    let app = TestApp::with_notifier(Arc::new(mailer)).await;

    let (status, body) = app.post("/api/contact/submit", submission(true)).await;
    assert_eq!(status, StatusCode::CREATED);

    let entry = stored(&app, body["data"]["id"].as_i64().unwrap()).await;
    assert!(!entry.was_notified);
    assert_eq!(entry.phone.as_deref(), Some("0555 000 00 00"));
}

#[tokio::test]
async fn malformed_email_is_rejected() {
    let app = TestApp::new().await;
    let mut payload = submission(true);
    payload["email"] = json!("ayse-at-example");

    let (status, body) = app.post("/api/contact/submit", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["email"].is_array());
}
