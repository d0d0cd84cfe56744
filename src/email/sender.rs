//! Mailer trait and SMTP transport implementation

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{EmailConfig, SmtpConfig};
use crate::metrics::EmailMetrics;

use super::types::EmailResult;

/// Port for sending emails
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a single HTML email
    async fn send(&self, to: &str, subject: &str, html: &str) -> EmailResult<()>;
}

fn build_message(from: &Mailbox, to: &str, subject: &str, html: &str) -> EmailResult<Message> {
    let message = Message::builder()
        .from(from.clone())
        .to(to.parse()?)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(html.to_string())?;
    Ok(message)
}

/// Mailer backed by an async SMTP relay
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(smtp: &SmtpConfig, email: &EmailConfig) -> EmailResult<Self> {
        let credentials = Credentials::new(smtp.username.clone(), smtp.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)?
            .port(smtp.port)
            .credentials(credentials)
            .build();

        let from = email.from_mailbox().parse()?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[tracing::instrument(name = "email.smtp_send", skip(self, html), fields(to = %to))]
    async fn send(&self, to: &str, subject: &str, html: &str) -> EmailResult<()> {
        let message = build_message(&self.from, to, subject, html)?;

        match self.transport.send(message).await {
            Ok(_) => {
                EmailMetrics::record_sent("smtp");
                tracing::debug!(to = %to, "Email sent");
                Ok(())
            }
            Err(e) => {
                EmailMetrics::record_failed("smtp");
                tracing::warn!(to = %to, error = %e, "Email send failed");
                Err(e.into())
            }
        }
    }
}

/// Mailer that only logs. Used when SMTP is not configured and in tests;
/// addresses are still validated so bad input fails the same way.
pub struct LogMailer {
    from: Mailbox,
}

impl LogMailer {
    pub fn new(email: &EmailConfig) -> EmailResult<Self> {
        Ok(Self {
            from: email.from_mailbox().parse()?,
        })
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> EmailResult<()> {
        let _ = build_message(&self.from, to, subject, html)?;

        EmailMetrics::record_sent("log");
        tracing::info!(to = %to, subject = %subject, "Email send (log-only mailer)");
        Ok(())
    }
}

/// Create a mailer from configuration.
///
/// Returns an `SmtpMailer` when SMTP credentials are configured, otherwise
/// falls back to the log-only mailer.
pub fn create_mailer(
    smtp: Option<&SmtpConfig>,
    email: &EmailConfig,
) -> EmailResult<Arc<dyn Mailer>> {
    match smtp {
        Some(config) => {
            tracing::info!(host = %config.host, port = config.port, "Creating SMTP mailer");
            Ok(Arc::new(SmtpMailer::new(config, email)?))
        }
        None => {
            tracing::warn!("SMTP not configured, emails will only be logged");
            Ok(Arc::new(LogMailer::new(email)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_message() {
        let from: Mailbox = "Atelier <contato@atelierfotografia.com.br>".parse().unwrap();
        let message = build_message(&from, "ana@example.com", "Oi", "<p>Olá</p>");
        assert!(message.is_ok());
    }

    #[test]
    fn test_build_message_invalid_recipient() {
        let from: Mailbox = "Atelier <contato@atelierfotografia.com.br>".parse().unwrap();
        let message = build_message(&from, "not-an-address", "Oi", "<p>Olá</p>");
        assert!(message.is_err());
    }

    #[tokio::test]
    async fn test_log_mailer_validates_address() {
        let mailer = LogMailer::new(&EmailConfig::default()).unwrap();

        assert!(mailer.send("ana@example.com", "Oi", "<p>x</p>").await.is_ok());
        assert!(mailer.send("broken", "Oi", "<p>x</p>").await.is_err());
    }

    #[test]
    fn test_create_mailer_falls_back_to_log() {
        let mailer = create_mailer(None, &EmailConfig::default());
        assert!(mailer.is_ok());
    }
}
