// Template renderer: (ResumeData, TemplateId) → RenderedDocument.
// Pure and deterministic; async callers go through `render_snapshot`, which
// moves the CPU-bound layout onto the blocking pool.

pub mod format;
pub mod node;
pub mod paginate;
pub mod sections;
pub mod template;

use tracing::debug;

use crate::errors::AppError;
use crate::models::resume::ResumeData;

pub use node::RenderedDocument;
pub use template::{TemplateError, TemplateId};

/// Renders a resume with the given template.
pub fn render_resume(resume: &ResumeData, template: TemplateId) -> RenderedDocument {
    let descriptor = template.descriptor();
    let pages = paginate::paginate(resume, descriptor);
    debug!(template = %template, pages = pages.len(), "Resume rendered");
    RenderedDocument { template, pages }
}

/// Renders an owned snapshot on the blocking pool.
pub async fn render_snapshot(
    resume: ResumeData,
    template: TemplateId,
) -> Result<RenderedDocument, AppError> {
    tokio::task::spawn_blocking(move || render_resume(&resume, template))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))
}
