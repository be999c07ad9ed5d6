use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    appointment::AppointmentSlot,
    config::MailConfig,
    database::ConsultationStore,
    error::{AppError, Result},
    models::{ConsultationForm, NewConsultation, SubmissionResponse},
    notifications::{ConsultationNotification, Mailer},
    validation::Validatable,
};

/// Outcome of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub id: i64,
    pub appointment: AppointmentSlot,
    pub notification_sent: bool,
}

impl From<SubmissionReceipt> for SubmissionResponse {
    fn from(receipt: SubmissionReceipt) -> Self {
        if receipt.notification_sent {
            SubmissionResponse::submitted(receipt.id)
        } else {
            SubmissionResponse::saved_without_notification(receipt.id)
        }
    }
}

/// Validate, verify the appointment slot, persist, then notify.
///
/// Stateless between calls; the store and mailer are shared collaborators.
#[derive(Clone)]
pub struct ConsultationService {
    store: Arc<dyn ConsultationStore>,
    mailer: Arc<dyn Mailer>,
    mail_config: MailConfig,
}

impl ConsultationService {
    pub fn new(store: Arc<dyn ConsultationStore>, mailer: Arc<dyn Mailer>, mail_config: MailConfig) -> Self {
        Self {
            store,
            mailer,
            mail_config,
        }
    }

    pub fn mail_transport(&self) -> &'static str {
        self.mailer.transport_name()
    }

    pub async fn submit(&self, form: ConsultationForm) -> Result<SubmissionReceipt> {
        let request = form.normalize();

        request.validate_comprehensive().into_result()?;

        let appointment = AppointmentSlot::compose(&request.appointment_date, &request.appointment_time)?;

        let record = NewConsultation::new(&request, &appointment, Utc::now());
        let id = self.store.insert(&record).await.map_err(|e| {
            error!("Failed to persist consultation request: {}", e);
            AppError::InternalServerError
        })?;

        info!(
            request_id = id,
            appointment = %appointment,
            practice_area = %request.practice_area,
            "Consultation request stored"
        );

        let mail = ConsultationNotification::new(&request, &appointment, id).into_mail(&self.mail_config);

        // The record is already stored, so a delivery failure only downgrades the response.
        let notification_sent = match self.mailer.send(&mail).await {
            Ok(()) => {
                info!(request_id = id, transport = self.mailer.transport_name(), "Notification sent");
                true
            }
            Err(e) => {
                warn!(request_id = id, "Notification could not be sent: {}", e);
                false
            }
        };

        Ok(SubmissionReceipt {
            id,
            appointment,
            notification_sent,
        })
    }
}
