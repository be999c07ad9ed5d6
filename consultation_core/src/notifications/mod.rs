//! Staff notification for accepted consultation requests

pub mod template;
pub mod transport;

pub use template::{escape_html, sanitize_header, ConsultationNotification};
pub use transport::{build_mailer, LogMailer, SmtpMailer, SpoolMailer};

use async_trait::async_trait;
use lettre::address::AddressError;
use lettre::message::{header::ContentType, Mailbox};
use lettre::Message;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub from: String,
    pub reply_to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingMail {
    /// Builds the MIME message. `lettre` encodes non-ASCII header values and
    /// picks the body transfer encoding.
    pub fn to_message(&self) -> Result<Message, MailError> {
        let message = Message::builder()
            .from(self.from.parse::<Mailbox>()?)
            .reply_to(self.reply_to.parse::<Mailbox>()?)
            .to(self.to.parse::<Mailbox>()?)
            .subject(self.subject.clone())
            .message_id(None)
            .header(ContentType::TEXT_PLAIN)
            .body(self.body.clone())?;

        Ok(message)
    }
}

/// Delivery failure. The reason is kept for operator logs only.
#[derive(Error, Debug)]
pub enum MailError {
    #[error("mail transport unavailable: {0}")]
    Unavailable(String),

    #[error("invalid mailbox: {0}")]
    Address(#[from] AddressError),

    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("spool delivery failed: {0}")]
    Spool(#[from] lettre::transport::file::Error),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;

    fn transport_name(&self) -> &'static str;
}
