use async_trait::async_trait;
use lettre::message::{header, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::plugins::traits::{Delivery, NotificationMessage, Notifier};
use crate::utils::error::Result;
use crate::utils::text::strip_tags;

/// Sends alerts as multipart (plain + HTML) email over SMTP with STARTTLS.
pub struct EmailNotifier {
    config: SmtpConfig,
}

impl EmailNotifier {
    pub fn new(config: SmtpConfig) -> Self {
        EmailNotifier { config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn build_message(&self, message: &NotificationMessage) -> Result<Option<Message>> {
        let (Some(username), Some(to_address)) =
            (self.config.username.as_deref(), self.config.alert_to.as_deref())
        else {
            return Ok(None);
        };

        let from = Mailbox::new(Some(self.config.from_name.clone()), username.parse()?);
        let text_body = message
            .text_body
            .clone()
            .unwrap_or_else(|| strip_tags(&message.html_body));

        let email = Message::builder()
            .from(from)
            .to(to_address.parse()?)
            .subject(message.subject.clone())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(message.html_body.clone()),
                    ),
            )?;

        Ok(Some(email))
    }

    fn transport(&self) -> Result<Option<AsyncSmtpTransport<Tokio1Executor>>> {
        let (Some(username), Some(password)) =
            (self.config.username.clone(), self.config.password.clone())
        else {
            return Ok(None);
        };

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
            .port(self.config.port)
            .credentials(Credentials::new(username, password))
            .build();
        Ok(Some(mailer))
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send_notification(&self, message: &NotificationMessage) -> Result<Delivery> {
        if !self.is_configured() {
            tracing::warn!("Email not configured; skipping email send: {}", message.subject);
            return Ok(Delivery::Skipped {
                reason: "email transport not configured".to_string(),
            });
        }

        let (Some(email), Some(mailer)) = (self.build_message(message)?, self.transport()?) else {
            return Ok(Delivery::Skipped {
                reason: "email transport not configured".to_string(),
            });
        };

        let response = mailer.send(email).await?;
        let message_id = response.message().next().map(str::to_string);
        tracing::info!("Email sent via {}:{}: {}", self.config.host, self.config.port, message.subject);

        Ok(Delivery::Sent { message_id })
    }
}
