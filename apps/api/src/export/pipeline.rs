//! Export pipeline for one user-initiated download, start to finish.
//!
//! render → materialize → capture (page by page, in order) → assemble.
//! Each stage awaits the previous one; the first failure aborts the run and no
//! partial file is produced.

use std::sync::Arc;

use ab_glyph::FontArc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::capture::{CapturedPage, Capturer, PageSurface, RasterSurface};
use crate::errors::AppError;
use crate::export::assembler::{stitch_png, AssemblyError, DocumentAssembler};
use crate::models::resume::ResumeData;
use crate::render::{render_snapshot, TemplateId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Png,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Png => "png",
        }
    }
}

/// The finished download.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// `<Full_Name>_Resume.<ext>`, or `Resume.<ext>` when the name is blank.
///
/// Whitespace runs become one underscore; characters that are unsafe in a
/// `Content-Disposition` filename are dropped.
pub fn export_filename(full_name: &str, format: ExportFormat) -> String {
    let stem = full_name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '\''))
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if stem.is_empty() {
        format!("Resume.{}", format.extension())
    } else {
        format!("{stem}_Resume.{}", format.extension())
    }
}

fn document_title(full_name: &str) -> String {
    match full_name.trim() {
        "" => "Resume".to_string(),
        name => format!("{name} - Resume"),
    }
}

/// Runs the whole export for an owned snapshot of the resume.
#[instrument(skip_all, fields(template = %template, format = ?format))]
pub async fn export_resume(
    resume: ResumeData,
    template: TemplateId,
    format: ExportFormat,
    capturer: &dyn Capturer,
    font: Option<FontArc>,
) -> Result<ExportArtifact, AppError> {
    let full_name = resume.personal_info.full_name.clone();
    let filename = export_filename(&full_name, format);

    // 1. Render
    let document = render_snapshot(resume, template).await?;
    let page_count = document.page_count();
    info!(pages = page_count, "Rendered resume for export");

    // 2. Materialize + capture, strictly in page order
    let style = template.descriptor().style;
    let mut captured: Vec<CapturedPage> = Vec::with_capacity(page_count);
    for page in document.pages {
        let surface: Arc<dyn PageSurface> =
            Arc::new(RasterSurface::materialize(page, style, font.clone()));
        captured.push(capturer.capture(surface).await?);
    }
    info!(pages = captured.len(), "Captured all pages");

    // 3. Assemble
    let title = document_title(&full_name);
    let bytes = tokio::task::spawn_blocking(move || match format {
        ExportFormat::Pdf => DocumentAssembler::new(title)
            .assemble(&captured)
            .map(|doc| {
                for placement in &doc.pages {
                    debug!(
                        page = placement.page_number,
                        source_page = placement.source_page,
                        width_px = placement.width_px,
                        height_px = placement.height_px,
                        width_pt = placement.width_pt,
                        height_pt = placement.height_pt,
                        "Placed page"
                    );
                }
                doc.bytes
            }),
        ExportFormat::Png => stitch_png(&captured),
    })
    .await
    .map_err(|e| AssemblyError::Worker(e.to_string()))??;

    info!(filename = %filename, bytes = bytes.len(), "Export complete");

    Ok(ExportArtifact {
        filename,
        content_type: format.content_type(),
        bytes,
        page_count,
    })
}
