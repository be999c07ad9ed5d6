//! JSON body returned by the submission endpoint

use serde::Serialize;

pub const SUBMITTED_MESSAGE: &str =
    "Your consultation request has been submitted successfully. We will contact you soon.";
pub const SAVED_MESSAGE: &str = "Your consultation request has been saved. We will contact you soon.";
pub const NOTIFICATION_WARNING: &str =
    "Email notification could not be sent, but your request was saved.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl SubmissionResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
            id: None,
            warning: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn submitted(id: i64) -> Self {
        Self {
            success: true,
            message: SUBMITTED_MESSAGE.to_string(),
            errors: None,
            id: Some(id),
            warning: None,
        }
    }

    /// Record was stored but the staff mailbox was not reached.
    pub fn saved_without_notification(id: i64) -> Self {
        Self {
            success: true,
            message: SAVED_MESSAGE.to_string(),
            errors: None,
            id: Some(id),
            warning: Some(NOTIFICATION_WARNING.to_string()),
        }
    }
}
