use axum::{
    extract::{rejection::FormRejection, Form, State},
    http::Method,
    Json,
};
use tracing::{info, warn};

use crate::{
    error::{AppError, Result},
    models::{ConsultationForm, SubmissionResponse},
    AppState,
};

/// `POST /api/consultations`
///
/// A body that is not a decodable form is handled as an empty form, so the
/// caller gets the usual list of required-field errors. Repeated keys keep
/// the last value.
pub async fn handle_submit_consultation(
    State(state): State<AppState>,
    form: std::result::Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Json<SubmissionResponse>> {
    let form = match form {
        Ok(Form(pairs)) => ConsultationForm::from_pairs(pairs),
        Err(rejection) => {
            warn!("Could not decode consultation form: {}", rejection);
            ConsultationForm::default()
        }
    };

    info!("POST consultation request received");

    let receipt = state.consultation_service.submit(form).await?;
    Ok(Json(SubmissionResponse::from(receipt)))
}

/// Any method other than POST on a submission path.
pub async fn handle_method_not_allowed(method: Method) -> AppError {
    info!("Rejected {} on consultation endpoint", method);
    AppError::MethodNotAllowed
}
