use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, IntoActiveModel, Set};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::entities::contact_form_entry;
use crate::errors::ServiceError;
use crate::i18n::normalize;
use crate::notifications::Notifier;

pub const ACCEPT_TERMS_MESSAGE: &str = "Kişisel verilerinizin işlenmesini kabul etmelisiniz.";

fn must_accept_terms(accepted: &bool) -> Result<(), ValidationError> {
    if *accepted {
        return Ok(());
    }
    let mut error = ValidationError::new("accept_terms");
    error.message = Some(ACCEPT_TERMS_MESSAGE.into());
    Err(error)
}

/// Contact form payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ContactSubmission {
    #[validate(length(min = 1, max = 255, message = "Ad Soyad zorunludur."))]
    pub name: String,
    #[validate(email(message = "Geçerli bir e-posta adresi giriniz."))]
    pub email: String,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "Mesaj zorunludur."))]
    pub message: String,
    #[serde(default)]
    #[validate(custom = "must_accept_terms")]
    pub accept_terms: bool,
    #[serde(default)]
    pub subscribe_newsletter: bool,
}

/// Stores contact submissions and hands them to the notifier
#[derive(Clone)]
pub struct ContactService {
    db: Arc<DatabaseConnection>,
    notifier: Arc<dyn Notifier>,
}

impl ContactService {
    pub fn new(db: Arc<DatabaseConnection>, notifier: Arc<dyn Notifier>) -> Self {
        Self { db, notifier }
    }

    /// Validates and stores the submission, then tries to notify once. A
    /// failed notification leaves `was_notified` false and is only logged.
    #[instrument(skip(self, submission))]
    pub async fn submit(
        &self,
        submission: ContactSubmission,
    ) -> Result<contact_form_entry::Model, ServiceError> {
        submission.validate()?;
        let db = &*self.db;

        let entry = contact_form_entry::ActiveModel {
            name: Set(submission.name.trim().to_string()),
            email: Set(submission.email.trim().to_string()),
            phone: Set(normalize(submission.phone)),
            message: Set(submission.message),
            accept_terms: Set(submission.accept_terms),
            subscribe_newsletter: Set(submission.subscribe_newsletter),
            was_notified: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        info!(entry_id = entry.id, "contact submission stored");

        match self.notifier.contact_submitted(&entry).await {
            Ok(()) => {
                let mut active = entry.into_active_model();
                active.was_notified = Set(true);
                Ok(active.update(db).await?)
            }
            Err(err) => {
                warn!(entry_id = entry.id, error = %err, "contact notification failed");
                Ok(entry)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(accept_terms: bool) -> ContactSubmission {
        ContactSubmission {
            name: "Ayşe".into(),
            email: "ayse@example.com".into(),
            phone: None,
            message: "Merhaba".into(),
            accept_terms,
            subscribe_newsletter: false,
        }
    }

    #[test]
    fn terms_must_be_accepted() {
        let errors = submission(false).validate().unwrap_err();
        let field = errors.field_errors();
        let messages = field.get("accept_terms").unwrap();
        assert_eq!(
            messages[0].message.as_deref(),
            Some(ACCEPT_TERMS_MESSAGE)
        );
        assert!(submission(true).validate().is_ok());
    }

    #[test]
    fn email_format_is_checked() {
        let mut bad = submission(true);
        bad.email = "not-an-email".into();
        assert!(bad.validate().is_err());
    }
}
