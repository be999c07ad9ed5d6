//! Core library for the consultation booking service: validation, appointment
//! verification, persistence, staff notification and the HTTP routes that
//! tie them together.

pub mod appointment;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod notifications;
pub mod services;
pub mod validation;

pub use appointment::AppointmentSlot;
pub use config::{
    AppConfig, DatabaseConfig, MailConfig, MailTransport, ServerConfig, SmtpConfig, SmtpSecurity,
};
pub use database::{
    get_database_pool, run_migrations, ConsultationRepository, ConsultationStore, DatabaseManager,
    StoredConsultation,
};
pub use error::{AppError, Result};
pub use handlers::create_routes;
pub use models::{ConsultationForm, ConsultationRequest, NewConsultation, SubmissionResponse};
pub use notifications::{
    build_mailer, LogMailer, MailError, Mailer, OutgoingMail, SmtpMailer, SpoolMailer,
};
pub use services::{ConsultationService, SubmissionReceipt};

use axum::Router;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub db_manager: Option<DatabaseManager>,
    pub consultation_service: ConsultationService,
}

impl AppState {
    pub fn new(consultation_service: ConsultationService) -> Self {
        Self {
            app_name: "Consultation Booking Service".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            db_manager: None,
            consultation_service,
        }
    }

    /// Wires the SQLite repository and the given mailer into a ready state.
    pub fn with_database(db_manager: DatabaseManager, mailer: Arc<dyn Mailer>, mail_config: MailConfig) -> Self {
        let repository = ConsultationRepository::new(db_manager.pool().clone());
        let service = ConsultationService::new(Arc::new(repository), mailer, mail_config);

        Self {
            db_manager: Some(db_manager),
            ..Self::new(service)
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    create_app_with_config(state, &AppConfig::default())
}

pub fn create_app_with_config(state: AppState, config: &AppConfig) -> Router {
    let router = create_routes()
        .layer(middleware::cors_layer())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_seconds,
        )));

    middleware::with_request_logging(router).with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
