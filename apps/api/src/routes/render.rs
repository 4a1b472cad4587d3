use axum::{
    extract::State,
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;

use crate::errors::AppError;
use crate::export::{export_resume, ExportFormat};
use crate::models::resume::ResumeData;
use crate::render::{render_snapshot, RenderedDocument, TemplateId};
use crate::state::AppState;

/// Number of rendered pages in an export response.
pub const PAGE_COUNT_HEADER: HeaderName = HeaderName::from_static("x-page-count");

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub resume: ResumeData,
    /// Parsed by the handler so an unknown name is a 400, not a body rejection.
    pub template: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub resume: ResumeData,
    pub template: Option<String>,
    #[serde(default)]
    pub format: ExportFormat,
}

fn resolve_template(state: &AppState, requested: Option<&str>) -> Result<TemplateId, AppError> {
    match requested {
        Some(name) if !name.trim().is_empty() => Ok(name.parse()?),
        _ => Ok(state.config.default_template),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/render
///
/// Returns the laid-out pages as JSON (preview; nothing is rasterized).
pub async fn handle_render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderedDocument>, AppError> {
    let template = resolve_template(&state, request.template.as_deref())?;
    let document = render_snapshot(request.resume, template).await?;
    Ok(Json(document))
}

/// POST /api/v1/export
///
/// Runs the full pipeline and returns the file as an attachment.
pub async fn handle_export(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let template = resolve_template(&state, request.template.as_deref())?;
    let artifact = export_resume(
        request.resume,
        template,
        request.format,
        state.capturer.as_ref(),
        state.font.clone(),
    )
    .await?;

    let headers = [
        (header::CONTENT_TYPE, artifact.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.filename),
        ),
        (PAGE_COUNT_HEADER, artifact.page_count.to_string()),
    ];
    Ok((headers, Bytes::from(artifact.bytes)).into_response())
}
