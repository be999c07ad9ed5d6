pub mod consultation_service;

pub use consultation_service::{ConsultationService, SubmissionReceipt};
