use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncFileTransport, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs as async_fs;
use tracing::{debug, info};

use crate::config::{MailConfig, MailTransport, SmtpConfig, SmtpSecurity};
use crate::error::Result;

use super::{MailError, Mailer, OutgoingMail};

/// Relays notifications through an SMTP submission server.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailer {
    /// Builds the relay client. No connection is opened until the first send.
    pub fn new(config: &SmtpConfig) -> std::result::Result<Self, MailError> {
        let builder = match config.security {
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?,
            SmtpSecurity::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?,
            SmtpSecurity::Plain => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        };

        let mut builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_seconds)));

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            host: config.host.clone(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> std::result::Result<(), MailError> {
        self.transport.send(mail.to_message()?).await?;
        debug!(relay = %self.host, "SMTP relay accepted notification");
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "smtp"
    }
}

/// Drops each message as an `.eml` file into a directory watched by the
/// host MTA.
pub struct SpoolMailer {
    spool_dir: PathBuf,
    transport: AsyncFileTransport<Tokio1Executor>,
}

impl SpoolMailer {
    pub fn new(spool_dir: impl Into<PathBuf>) -> Self {
        let spool_dir = spool_dir.into();
        Self {
            transport: AsyncFileTransport::<Tokio1Executor>::new(&spool_dir),
            spool_dir,
        }
    }

    pub fn spool_dir(&self) -> &Path {
        &self.spool_dir
    }

    pub async fn initialize(&self) -> Result<()> {
        if !self.spool_dir.exists() {
            async_fs::create_dir_all(&self.spool_dir).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Mailer for SpoolMailer {
    async fn send(&self, mail: &OutgoingMail) -> std::result::Result<(), MailError> {
        if !self.spool_dir.is_dir() {
            return Err(MailError::Unavailable(format!(
                "spool directory {} does not exist",
                self.spool_dir.display()
            )));
        }

        let message_id = self.transport.send(mail.to_message()?).await?;

        debug!("Spooled notification {} in {}", message_id, self.spool_dir.display());
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "spool"
    }
}

/// Writes notifications to the log instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &OutgoingMail) -> std::result::Result<(), MailError> {
        info!(
            to = %mail.to,
            reply_to = %mail.reply_to,
            subject = %mail.subject,
            "Notification (log transport):\n{}",
            mail.body
        );
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "log"
    }
}

pub async fn build_mailer(config: &MailConfig) -> Result<Arc<dyn Mailer>> {
    match config.transport {
        MailTransport::Smtp => {
            let mailer = SmtpMailer::new(&config.smtp).map_err(|e| {
                anyhow::anyhow!("Invalid SMTP relay {}: {}", config.smtp.host, e)
            })?;
            info!("Mail relay: {}:{} ({:?})", mailer.host(), config.smtp.port, config.smtp.security);
            Ok(Arc::new(mailer))
        }
        MailTransport::Spool => {
            let mailer = SpoolMailer::new(&config.spool_dir);
            mailer.initialize().await?;
            info!("Mail spool directory: {}", mailer.spool_dir().display());
            Ok(Arc::new(mailer))
        }
        MailTransport::Log => Ok(Arc::new(LogMailer)),
    }
}
