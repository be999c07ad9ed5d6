use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::validation::validate_email;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout_seconds: u64,
    pub migrate_on_start: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailTransport {
    Smtp,
    Spool,
    Log,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Implicit TLS, usually port 465.
    Tls,
    Starttls,
    /// Plain text. Only for a relay on the local host.
    Plain,
}

/// Operator mailbox and delivery settings for booking notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub transport: MailTransport,
    pub to_address: String,
    pub from_address: String,
    pub spool_dir: PathBuf,
    pub smtp: SmtpConfig,
}

/// An empty `username` disables authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    pub username: String,
    pub password: String,
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_seconds: 30,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:./consultations.db".to_string(),
            max_connections: 10,
            min_connections: 1,
            connection_timeout_seconds: 30,
            migrate_on_start: true,
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            transport: MailTransport::Log,
            to_address: "consultations@example.com".to_string(),
            from_address: "noreply@example.com".to_string(),
            spool_dir: PathBuf::from("./mail_spool"),
            smtp: SmtpConfig::default(),
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 587,
            security: SmtpSecurity::Starttls,
            username: String::new(),
            password: String::new(),
            timeout_seconds: 10,
        }
    }
}

impl AppConfig {
    /// Defaults, then `config.toml` if present, then `APP_` environment
    /// variables with `__` between section and key (`APP_MAIL__TO_ADDRESS`).
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.database.url.is_empty() {
            return Err(ConfigError::Message(
                "Database URL cannot be empty".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "Database max connections must be greater than 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Message(
                "Database min connections cannot exceed max connections".to_string(),
            ));
        }

        if validate_email(&self.mail.to_address).is_err() {
            return Err(ConfigError::Message(format!(
                "Invalid notification recipient address: {}",
                self.mail.to_address
            )));
        }

        if validate_email(&self.mail.from_address).is_err() {
            return Err(ConfigError::Message(format!(
                "Invalid notification sender address: {}",
                self.mail.from_address
            )));
        }

        if self.mail.transport == MailTransport::Smtp {
            if self.mail.smtp.host.is_empty() {
                return Err(ConfigError::Message("SMTP host cannot be empty".to_string()));
            }

            if self.mail.smtp.port == 0 || self.mail.smtp.timeout_seconds == 0 {
                return Err(ConfigError::Message(
                    "SMTP port and timeout must be greater than 0".to_string(),
                ));
            }
        }

        if self.mail.to_address == MailConfig::default().to_address {
            tracing::warn!("Using default notification mailbox - set APP_MAIL__TO_ADDRESS in production!");
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "sqlite:./consultations.db");
        assert_eq!(config.mail.transport, MailTransport::Log);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.database.url = String::new();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.database.min_connections = 20;
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.mail.to_address = "not-an-address".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.mail.from_address = "noreply@".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.mail.transport = MailTransport::Smtp;
        assert!(config.validate().is_ok());
        config.mail.smtp.host = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bind_address() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:3000");

        let mut config = AppConfig::default();
        config.server.host = "0.0.0.0".to_string();
        config.server.port = 8080;
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_mail_transport_deserializes_lowercase() {
        let transport: MailTransport = serde_json::from_str("\"spool\"").unwrap();
        assert_eq!(transport, MailTransport::Spool);

        let transport: MailTransport = serde_json::from_str("\"smtp\"").unwrap();
        assert_eq!(transport, MailTransport::Smtp);

        let security: SmtpSecurity = serde_json::from_str("\"starttls\"").unwrap();
        assert_eq!(security, SmtpSecurity::Starttls);
    }

    #[test]
    fn test_config_loading() {
        let config = AppConfig::load().expect("Should load default configuration");

        assert!(config.validate().is_ok());
        assert!(!config.server.host.is_empty());
        assert!(config.server.port > 0);
        assert!(!config.database.url.is_empty());
        assert!(!config.mail.to_address.is_empty());
    }
}
