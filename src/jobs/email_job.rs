//! Outbound email delivery.
//!
//! `MessagingService` is the sending contract; `SmtpMessagingService`
//! delivers through an SMTP relay with lettre. Emails that must not hold
//! up a request are wrapped in an [`EmailJob`] and run detached.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;

use crate::config::SmtpSettings;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Email sending contract.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MessagingService: Send + Sync {
    /// Send an HTML email to a single recipient
    async fn send_email(&self, to: &str, subject: &str, html_body: &str) -> AppResult<()>;
}

/// Reject blank arguments and unparseable recipients before any network work
fn validate_email(to: &str, subject: &str, html_body: &str) -> AppResult<Mailbox> {
    if to.trim().is_empty() {
        return Err(AppError::validation("Recipient email is required"));
    }
    if subject.trim().is_empty() {
        return Err(AppError::validation("Email subject is required"));
    }
    if html_body.trim().is_empty() {
        return Err(AppError::validation("Email body is required"));
    }

    to.trim()
        .parse::<Mailbox>()
        .map_err(|e| AppError::validation(format!("Invalid recipient email: {}", e)))
}

/// SMTP implementation of [`MessagingService`]
pub struct SmtpMessagingService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMessagingService {
    /// Build the transport from settings. Nothing is sent until the first email.
    pub fn new(settings: &SmtpSettings) -> AppResult<Self> {
        let from = settings
            .from
            .parse::<Mailbox>()
            .map_err(|e| AppError::config(format!("Invalid SMTP_FROM address: {}", e)))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| AppError::config(format!("Invalid SMTP relay {}: {}", settings.host, e)))?
            .port(settings.port);

        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        tracing::info!(
            host = %settings.host,
            port = settings.port,
            from = %from,
            "SMTP messaging initialized"
        );

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl MessagingService for SmtpMessagingService {
    async fn send_email(&self, to: &str, subject: &str, html_body: &str) -> AppResult<()> {
        let recipient = validate_email(to, subject, html_body)?;

        tracing::info!(to = %recipient, subject = %subject, "Sending email");

        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| AppError::internal(format!("Failed to build email: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::internal(format!("Failed to send email: {}", e)))?;

        tracing::info!(to = %to, "Email sent");
        Ok(())
    }
}

/// A rendered email waiting to be delivered
#[derive(Debug, Clone)]
pub struct EmailJob {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailJob {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Deliver the email. Failures end here as a log line.
    pub async fn run(self, sender: Arc<dyn MessagingService>) {
        if let Err(e) = sender.send_email(&self.to, &self.subject, &self.body).await {
            tracing::error!(to = %self.to, subject = %self.subject, "Email delivery failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_fields() {
        assert!(validate_email("", "Hi", "<p>x</p>").is_err());
        assert!(validate_email("a@example.com", " ", "<p>x</p>").is_err());
        assert!(validate_email("a@example.com", "Hi", "").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_address() {
        assert!(matches!(
            validate_email("not-an-address", "Hi", "<p>x</p>"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_accepts_mailbox() {
        let mailbox = validate_email("Jane <jane@example.com>", "Hi", "<p>x</p>").unwrap();
        assert_eq!(mailbox.email.to_string(), "jane@example.com");
    }

    #[test]
    fn test_new_rejects_bad_sender() {
        let settings = SmtpSettings {
            host: "smtp.example.com".into(),
            port: 587,
            username: None,
            password: None,
            from: "nobody".into(),
        };
        assert!(matches!(
            SmtpMessagingService::new(&settings),
            Err(AppError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_job_swallows_send_failure() {
        let mut sender = MockMessagingService::new();
        sender
            .expect_send_email()
            .withf(|to, subject, _| to == "jane@example.com" && subject == "Hello")
            .times(1)
            .returning(|_, _, _| Err(AppError::internal("relay down")));

        EmailJob::new("jane@example.com", "Hello", "<p>hi</p>")
            .run(Arc::new(sender))
            .await;
    }
}
