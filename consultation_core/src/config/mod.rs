pub mod settings;

pub use settings::{
    AppConfig, DatabaseConfig, MailConfig, MailTransport, ServerConfig, SmtpConfig, SmtpSecurity,
};
