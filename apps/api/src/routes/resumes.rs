use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::models::edit::ResumeEdit;
use crate::models::resume::ResumeData;

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub resume: ResumeData,
    #[serde(default)]
    pub edits: Vec<ResumeEdit>,
}

/// GET /api/v1/resumes/sample
pub async fn handle_sample() -> Json<ResumeData> {
    Json(ResumeData::sample())
}

/// POST /api/v1/resumes/edits
///
/// Applies the edits in order to the posted resume and returns the result.
/// The first failing edit rejects the whole batch.
pub async fn handle_apply_edits(
    Json(request): Json<EditRequest>,
) -> Result<Json<ResumeData>, AppError> {
    let EditRequest { mut resume, edits } = request;
    let count = edits.len();
    resume.apply_all(edits)?;
    debug!(edits = count, "Applied resume edits");
    Ok(Json(resume))
}
