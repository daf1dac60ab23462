use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::common::Created;
use crate::{
    entities::contact_form_entry, errors::ServiceError,
    services::contact_service::ContactSubmission, ApiResponse, AppState,
};

/// Stored submission as echoed back to the sender
#[derive(Debug, Serialize, ToSchema)]
pub struct ContactEntryView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub accept_terms: bool,
    pub subscribe_newsletter: bool,
    pub created_at: DateTime<Utc>,
}

impl From<contact_form_entry::Model> for ContactEntryView {
    fn from(model: contact_form_entry::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            message: model.message,
            accept_terms: model.accept_terms,
            subscribe_newsletter: model.subscribe_newsletter,
            created_at: model.created_at,
        }
    }
}

pub fn contact_routes() -> Router<AppState> {
    Router::new().route("/submit", post(submit_contact_form))
}

#[utoipa::path(
    post,
    path = "/api/contact/submit",
    request_body = ContactSubmission,
    responses(
        (status = 201, description = "Submission stored; notification attempted once", body = ApiResponse<ContactEntryView>),
        (status = 400, description = "Invalid submission or terms not accepted", body = crate::errors::ErrorResponse)
    ),
    tag = "contact"
)]
pub async fn submit_contact_form(
    State(state): State<AppState>,
    Json(payload): Json<ContactSubmission>,
) -> Result<Created<ContactEntryView>, ServiceError> {
    let entry = state.services.contact.submit(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            ContactEntryView::from(entry),
            "Your message has been received",
        )),
    ))
}
