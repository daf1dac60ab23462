//! Outbound notification for contact-form submissions.
//!
//! Delivery is best effort: callers log a failed send and move on, nothing is
//! retried.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::EmailConfig;
use crate::entities::contact_form_entry;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("notifications are not configured: {0}")]
    NotConfigured(&'static str),

    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends the submission to the configured recipient
    async fn contact_submitted(
        &self,
        entry: &contact_form_entry::Model,
    ) -> Result<(), NotificationError>;
}

pub fn contact_subject(entry: &contact_form_entry::Model) -> String {
    format!("Yeni İletişim Formu Mesajı: {}", entry.name)
}

/// Plain-text body listing every submitted field
pub fn contact_body(entry: &contact_form_entry::Model) -> String {
    let phone = entry
        .phone
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or("Belirtilmedi");
    let newsletter = if entry.subscribe_newsletter {
        "Evet"
    } else {
        "Hayır"
    };
    format!(
        "Ad Soyad: {}\nE-posta: {}\nTelefon: {}\n\nMesaj:\n{}\n\n---\nKampanya ve duyuruları kabul etti mi?: {}\n",
        entry.name, entry.email, phone, entry.message, newsletter
    )
}

/// Sends mail through an SMTP relay
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    pub fn from_config(config: &EmailConfig) -> Result<Self, NotificationError> {
        let host = config
            .smtp_host
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .ok_or(NotificationError::NotConfigured("smtp_host"))?;
        let from: Mailbox = config
            .sender()
            .ok_or(NotificationError::NotConfigured("from_address"))?
            .parse()?;
        let to: Mailbox = config
            .recipient
            .as_deref()
            .ok_or(NotificationError::NotConfigured("recipient"))?
            .parse()?;

        let builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
        };
        let mut builder = builder.port(config.smtp_port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    #[instrument(skip(self, entry), fields(entry_id = entry.id))]
    async fn contact_submitted(
        &self,
        entry: &contact_form_entry::Model,
    ) -> Result<(), NotificationError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(contact_subject(entry))
            .header(ContentType::TEXT_PLAIN)
            .body(contact_body(entry))?;
        self.transport.send(message).await?;
        info!("contact notification sent");
        Ok(())
    }
}

/// Used when no SMTP relay is configured: records the submission in the log
/// and reports it as not delivered.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn contact_submitted(
        &self,
        entry: &contact_form_entry::Model,
    ) -> Result<(), NotificationError> {
        info!(
            entry_id = entry.id,
            subject = %contact_subject(entry),
            "contact submission received; mail delivery disabled"
        );
        Err(NotificationError::NotConfigured("smtp_host"))
    }
}

/// SMTP when the mail settings are complete, otherwise the logging fallback
pub fn build_notifier(config: &EmailConfig) -> Arc<dyn Notifier> {
    if !config.is_configured() {
        return Arc::new(LogNotifier);
    }
    match SmtpNotifier::from_config(config) {
        Ok(notifier) => Arc::new(notifier),
        Err(err) => {
            warn!(error = %err, "invalid mail settings; contact notifications disabled");
            Arc::new(LogNotifier)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(phone: Option<&str>, newsletter: bool) -> contact_form_entry::Model {
        contact_form_entry::Model {
            id: 1,
            name: "Ayşe Yılmaz".into(),
            email: "ayse@example.com".into(),
            phone: phone.map(String::from),
            message: "Toptan fiyat alabilir miyim?".into(),
            accept_terms: true,
            subscribe_newsletter: newsletter,
            was_notified: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn body_lists_submitted_fields() {
        let body = contact_body(&entry(Some("0555 000 00 00"), true));
        assert!(body.contains("Ad Soyad: Ayşe Yılmaz"));
        assert!(body.contains("Telefon: 0555 000 00 00"));
        assert!(body.contains("Toptan fiyat alabilir miyim?"));
        assert!(body.ends_with("kabul etti mi?: Evet\n"));
    }

    #[test]
    fn missing_phone_is_spelled_out() {
        let body = contact_body(&entry(None, false));
        assert!(body.contains("Telefon: Belirtilmedi"));
        assert!(body.contains("Hayır"));
    }

    #[test]
    fn subject_names_the_sender() {
        assert_eq!(
            contact_subject(&entry(None, false)),
            "Yeni İletişim Formu Mesajı: Ayşe Yılmaz"
        );
    }

    #[tokio::test]
    async fn log_notifier_reports_not_delivered() {
        let result = LogNotifier.contact_submitted(&entry(None, false)).await;
        assert!(matches!(result, Err(NotificationError::NotConfigured(_))));
    }

    #[test]
    fn incomplete_settings_fall_back_to_logging() {
        let config = EmailConfig {
            smtp_host: Some("smtp.example.com".into()),
            ..Default::default()
        };
        assert!(!config.is_configured());
        assert!(matches!(
            SmtpNotifier::from_config(&config),
            Err(NotificationError::NotConfigured(_))
        ));
    }
}
