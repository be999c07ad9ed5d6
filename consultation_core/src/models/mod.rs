pub mod consultation;
pub mod response;

pub use consultation::{ConsultationForm, ConsultationRequest, NewConsultation};
pub use response::SubmissionResponse;
