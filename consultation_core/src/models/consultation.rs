//! Consultation booking input and persistence models

use chrono::{DateTime, Utc};

use crate::appointment::AppointmentSlot;

/// Raw form payload as posted by the booking page.
///
/// Every field defaults to an empty string so that a missing key is reported
/// by validation rather than rejected by the form decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsultationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub practice_area: String,
    pub message: String,
    pub appointment_date: String,
    pub appointment_time: String,
}

impl ConsultationForm {
    /// Builds the form from decoded `key=value` pairs. A repeated key keeps
    /// its last value; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "name" => &mut form.name,
                "email" => &mut form.email,
                "phone" => &mut form.phone,
                "practiceArea" => &mut form.practice_area,
                "message" => &mut form.message,
                "appointmentDate" => &mut form.appointment_date,
                "appointmentTime" => &mut form.appointment_time,
                _ => continue,
            };
            *slot = value.into();
        }
        form
    }

    pub fn normalize(self) -> ConsultationRequest {
        ConsultationRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            practice_area: self.practice_area.trim().to_string(),
            message: self.message.trim().to_string(),
            appointment_date: self.appointment_date.trim().to_string(),
            appointment_time: self.appointment_time.trim().to_string(),
        }
    }
}

/// Whitespace-trimmed submission, ready for validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsultationRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub practice_area: String,
    pub message: String,
    pub appointment_date: String,
    pub appointment_time: String,
}

/// Row handed to the store for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConsultation {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub practice_area: String,
    pub message: String,
    pub appointment_datetime: String,
    pub created_at: DateTime<Utc>,
}

impl NewConsultation {
    pub fn new(request: &ConsultationRequest, slot: &AppointmentSlot, created_at: DateTime<Utc>) -> Self {
        Self {
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            practice_area: request.practice_area.clone(),
            message: request.message.clone(),
            appointment_datetime: slot.canonical(),
            created_at,
        }
    }
}
