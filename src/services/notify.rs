//! Due-soon notification sinks
//!
//! The loan engine decides which loans qualify for a notice; delivery goes
//! through the [`NotificationSink`] capability so the engine never touches
//! SMTP or any other transport directly.

use async_trait::async_trait;
use chrono::NaiveDate;
use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;
use std::sync::Arc;

use crate::{
    config::{EmailConfig, NotificationConfig},
    error::{AppError, AppResult},
};

/// Notification descriptor for a loan approaching its due date
#[derive(Debug, Clone)]
pub struct DueNotice {
    pub user_id: i64,
    pub username: String,
    pub email: Option<String>,
    pub book_title: String,
    pub due_date: NaiveDate,
    pub days_remaining: i64,
}

/// Delivery capability for due-soon notices
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, notice: &DueNotice) -> AppResult<()>;
}

/// Build the sink selected by configuration
pub fn sink_from_config(config: &NotificationConfig) -> Arc<dyn NotificationSink> {
    match config.mode.as_str() {
        "email" => Arc::new(EmailNotifier::new(config.email.clone())),
        _ => Arc::new(LogNotifier),
    }
}

/// Sink that traces each notice instead of delivering it externally
pub struct LogNotifier;

#[async_trait]
impl NotificationSink for LogNotifier {
    async fn deliver(&self, notice: &DueNotice) -> AppResult<()> {
        tracing::info!(
            user_id = notice.user_id,
            "Notification: user {} - your borrowed book '{}' is due in {} days",
            notice.username,
            notice.book_title,
            notice.days_remaining,
        );
        Ok(())
    }
}

/// Sink that emails the borrower over SMTP
pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl NotificationSink for EmailNotifier {
    async fn deliver(&self, notice: &DueNotice) -> AppResult<()> {
        let Some(ref to) = notice.email else {
            tracing::warn!(
                user_id = notice.user_id,
                "skipping due-soon email: user has no email address"
            );
            return Ok(());
        };

        let from_mailbox = Mailbox::from_str(&format!("Atheneum <{}>", self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;
        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let body = format!(
            "Hello {},\n\nYour borrowed book '{}' is due on {} ({} days from now).\n\
             Please return or renew it in time.\n",
            notice.username, notice.book_title, notice.due_date, notice.days_remaining,
        );

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(format!("Book due in {} days", notice.days_remaining))
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) = (
            &self.config.smtp_username,
            &self.config.smtp_password,
        ) {
            mailer_builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer_builder
        };

        mailer_builder
            .build()
            .send(&email)
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}
