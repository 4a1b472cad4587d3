use axum::{extract::State, Json};
use serde::Serialize;

use crate::layout::font_metrics::FontFamily;
use crate::render::template::{Pagination, SectionKind, TemplateDescriptor, TemplateId};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TemplateSummary {
    pub id: TemplateId,
    pub name: &'static str,
    /// `"flow"` or `"fixed"`.
    pub pagination: &'static str,
    /// Page count for fixed templates; flow templates grow with content.
    pub pages: Option<usize>,
    pub sections: Vec<SectionKind>,
    pub font: FontFamily,
    pub is_default: bool,
}

impl TemplateSummary {
    fn describe(descriptor: &TemplateDescriptor, default: TemplateId) -> Self {
        let (pagination, pages) = match descriptor.pagination {
            Pagination::Flow => ("flow", None),
            Pagination::Fixed(table) => ("fixed", Some(table.len())),
        };
        TemplateSummary {
            id: descriptor.id,
            name: descriptor.name,
            pagination,
            pages,
            sections: descriptor.page_groups().concat(),
            font: descriptor.style.font,
            is_default: descriptor.id == default,
        }
    }
}

/// GET /api/v1/templates
pub async fn handle_list_templates(State(state): State<AppState>) -> Json<Vec<TemplateSummary>> {
    let default = state.config.default_template;
    Json(
        TemplateId::ALL
            .into_iter()
            .map(|id| TemplateSummary::describe(id.descriptor(), default))
            .collect(),
    )
}
