//! The rendered document: a plain value with every line already broken and
//! every block already positioned in page pixels.

use serde::Serialize;

use crate::render::template::{SectionKind, TemplateId};

/// What a block represents; capture picks colour and weight from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Name,
    JobTitle,
    Contact,
    Heading,
    EntryTitle,
    EntryMeta,
    Paragraph,
    Bullet,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub kind: BlockKind,
    pub x_px: f32,
    /// Top of the first line, from the top of the page.
    pub y_px: f32,
    pub width_px: f32,
    pub font_px: f32,
    pub line_height_px: f32,
    pub lines: Vec<String>,
}

impl Block {
    pub fn height_px(&self) -> f32 {
        self.lines.len() as f32 * self.line_height_px
    }

    pub fn bottom_px(&self) -> f32 {
        self.y_px + self.height_px()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionLayout {
    pub kind: SectionKind,
    pub blocks: Vec<Block>,
}

#[cfg(test)]
impl SectionLayout {
    pub fn heading(&self) -> Option<&Block> {
        self.blocks.iter().find(|b| b.kind == BlockKind::Heading)
    }

    /// True when the section carries nothing beyond its heading.
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.kind == BlockKind::Heading)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// 1-based.
    pub number: u32,
    pub width_px: u32,
    pub height_px: u32,
    pub sections: Vec<SectionLayout>,
}

#[cfg(test)]
impl Page {
    pub fn section(&self, kind: SectionKind) -> Option<&SectionLayout> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn section_kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|s| s.kind).collect()
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.sections.iter().flat_map(|s| s.blocks.iter())
    }

    /// Every block's text, in reading order.
    pub fn texts(&self) -> Vec<String> {
        self.blocks().map(Block::text).collect()
    }

    pub fn content_bottom_px(&self) -> f32 {
        self.blocks().map(Block::bottom_px).fold(0.0, f32::max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDocument {
    pub template: TemplateId,
    pub pages: Vec<Page>,
}

impl RenderedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[cfg(test)]
impl Block {
    /// Block text with wrapped lines joined back by single spaces.
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }
}
