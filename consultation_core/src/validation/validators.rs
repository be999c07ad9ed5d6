//! Specific validators for data models

use super::{rules::*, Validatable, ValidationResult};
use crate::models::ConsultationRequest;

impl ConsultationRequest {
    /// Required fields in reporting order: `(field, value, message)`.
    fn required_fields(&self) -> [(&'static str, &str, &'static str); 7] {
        [
            ("name", self.name.as_str(), "Name is required"),
            ("email", self.email.as_str(), "Email is required"),
            ("phone", self.phone.as_str(), "Phone is required"),
            ("practiceArea", self.practice_area.as_str(), "Practice area is required"),
            ("message", self.message.as_str(), "Message is required"),
            ("appointmentDate", self.appointment_date.as_str(), "Appointment date is required"),
            ("appointmentTime", self.appointment_time.as_str(), "Appointment time is required"),
        ]
    }
}

impl Validatable for ConsultationRequest {
    /// Runs every rule; nothing short-circuits. The email format check only
    /// applies when an email was supplied.
    fn validate_comprehensive(&self) -> ValidationResult {
        let mut result = ValidationResult::success();

        for (field, value, message) in self.required_fields() {
            if validate_required(value).is_err() {
                result.add_error(field, message);
            } else if field == "email" && validate_email(value).is_err() {
                result.add_error(field, "Invalid email format");
            }
        }

        result
    }
}
