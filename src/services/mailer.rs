use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox as LettreMailbox},
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;
use uuid::Uuid;

use crate::{error::AppError, models::email::Email};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub name: Option<String>,
    pub email: Email,
}

impl Mailbox {
    pub fn new(name: Option<String>, email: Email) -> Self {
        Self { name, email }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    pub html_body: String,
}

/// Handle identifying a dispatched message, usable to trace it in the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub message_id: String,
}

impl DeliveryReceipt {
    pub fn generate(sender: &Email) -> Self {
        Self {
            message_id: format!("<{}@{}>", Uuid::new_v4(), sender.domain()),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Dispatches one message. Failures are returned, never swallowed.
    async fn send(&self, message: &MailMessage) -> Result<DeliveryReceipt, AppError>;
}

/// Plain SMTP relay (Mailpit, Ethereal and friends).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(host: &str, port: u16) -> Self {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();
        Self { transport }
    }
}

fn to_lettre(mailbox: &Mailbox) -> Result<LettreMailbox, AppError> {
    let address: Address = mailbox
        .email
        .as_str()
        .parse()
        .map_err(|err| AppError::Mail(format!("invalid address {}: {err}", mailbox.email)))?;
    Ok(LettreMailbox::new(mailbox.name.clone(), address))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &MailMessage) -> Result<DeliveryReceipt, AppError> {
        let receipt = DeliveryReceipt::generate(&message.from.email);
        let email = Message::builder()
            .from(to_lettre(&message.from)?)
            .to(to_lettre(&message.to)?)
            .subject(message.subject.clone())
            .message_id(Some(receipt.message_id.clone()))
            .header(ContentType::TEXT_HTML)
            .body(message.html_body.clone())
            .map_err(|err| AppError::Mail(format!("could not build message: {err}")))?;

        self.transport
            .send(email)
            .await
            .map_err(|err| AppError::Mail(err.to_string()))?;

        info!(to = %message.to.email, message_id = %receipt.message_id, "mail sent");
        Ok(receipt)
    }
}

/// Logs messages instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<DeliveryReceipt, AppError> {
        let receipt = DeliveryReceipt::generate(&message.from.email);
        info!(
            to = %message.to.email,
            subject = %message.subject,
            message_id = %receipt.message_id,
            "mail delivery skipped (log backend)"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> MailMessage {
        MailMessage {
            from: Mailbox::new(
                Some("plann.er team".into()),
                Email::parse("hello@plann.er").unwrap(),
            ),
            to: Mailbox::new(None, Email::parse("b@x.com").unwrap()),
            subject: "hi".into(),
            html_body: "<p>hi</p>".into(),
        }
    }

    #[tokio::test]
    async fn log_mailer_returns_a_receipt_on_the_sender_domain() {
        let receipt = LogMailer.send(&message()).await.unwrap();
        assert!(receipt.message_id.starts_with('<'));
        assert!(receipt.message_id.ends_with("@plann.er>"));
    }

    #[test]
    fn smtp_mailer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpMailer>();
    }
}
