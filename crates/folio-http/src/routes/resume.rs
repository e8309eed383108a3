//! Resume parsing endpoint.

use axum::extract::Json;
use folio_service::resume::{ResumeFields, parse_resume_text};

use crate::error::{ApiError, ErrorBody};
use crate::types::ParseResumeRequest;

/// Largest accepted resume text, in bytes.
pub const MAX_RESUME_BYTES: usize = 100_000;

/// Extract contact fields from resume text.
///
/// Pulls the candidate's name, email and phone number out of plain text.
/// Fields that cannot be found are returned as `null`.
#[utoipa::path(
    post,
    path = "/api/resume/parse",
    request_body = ParseResumeRequest,
    responses(
        (status = 200, description = "Extracted fields", body = ResumeFields),
        (status = 400, description = "Empty or oversized text", body = ErrorBody),
        (status = 429, description = "Too many resume uploads", body = ErrorBody),
    ),
    tag = "Resume"
)]
pub async fn parse_resume(
    Json(req): Json<ParseResumeRequest>,
) -> Result<Json<ResumeFields>, ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".to_string()));
    }
    if req.text.len() > MAX_RESUME_BYTES {
        return Err(ApiError::BadRequest(format!(
            "text exceeds {MAX_RESUME_BYTES} bytes"
        )));
    }

    let fields = parse_resume_text(&req.text);
    tracing::debug!(
        name = fields.name.is_some(),
        email = fields.email.is_some(),
        phone = fields.phone.is_some(),
        "parsed resume text"
    );
    Ok(Json(fields))
}
