//! Measures section units and distributes them over pages.
//!
//! # Rules
//! - `Pagination::Fixed`: one page per table row, sections in row order, no
//!   automatic breaks (a FitContent page simply grows).
//! - `Pagination::Flow`: one run over `descriptor.sections`; a unit that would
//!   cross the bottom margin moves to a fresh page, and a heading travels with
//!   its section's first unit. A unit taller than a whole page is continued
//!   block by block, and a block taller than the space left is split between
//!   lines, so nothing is drawn below the bottom margin.
//! - A section appears on a page only once one of its blocks lands there.
//! - The gap before the first block on a page is dropped.

use crate::layout::font_metrics::{get_metrics, FontMetricTable};
use crate::layout::wrap::wrap_text;
use crate::models::resume::ResumeData;
use crate::render::node::{Block, BlockKind, Page, SectionLayout};
use crate::render::sections::{section_units, BlockSpec, Unit};
use crate::render::template::{
    EmptySections, Pagination, SectionKind, StyleTokens, TemplateDescriptor, A4_HEIGHT_PX,
    PAGE_WIDTH_PX,
};

/// Lays out `resume` with `descriptor` and returns the finished pages.
pub fn paginate(resume: &ResumeData, descriptor: &TemplateDescriptor) -> Vec<Page> {
    let style = &descriptor.style;
    let metrics = get_metrics(style.font);
    let content_width = PAGE_WIDTH_PX as f32 - 2.0 * style.margin_px;
    let flow = matches!(descriptor.pagination, Pagination::Flow);

    let mut paginator = Paginator::new(descriptor);

    for (index, group) in descriptor.page_groups().into_iter().enumerate() {
        if index > 0 {
            paginator.break_page();
        }
        for &kind in group {
            let Some(units) = with_heading(kind, section_units(resume, kind, style), descriptor)
            else {
                continue;
            };

            for unit in &units {
                let blocks = measure_unit(unit, style, &metrics, content_width);
                if flow {
                    paginator.flow_unit(kind, blocks);
                } else {
                    paginator.page.place(kind, blocks);
                }
            }
        }
    }

    paginator.finish()
}

/// Prepends the section heading to the first unit, or decides what an empty
/// section becomes. `None` means the section is left out entirely.
fn with_heading(
    kind: SectionKind,
    mut units: Vec<Unit>,
    descriptor: &TemplateDescriptor,
) -> Option<Vec<Unit>> {
    let style = &descriptor.style;
    let heading = kind.heading().map(|text| BlockSpec {
        kind: BlockKind::Heading,
        text: if style.uppercase_headings {
            text.to_uppercase()
        } else {
            text.to_string()
        },
        gap_before_px: style.section_gap_px,
    });

    if units.is_empty() {
        return match descriptor.empty_sections {
            EmptySections::Omit => None,
            EmptySections::ShowHeading => Some(heading.map(|h| vec![h]).into_iter().collect()),
        };
    }

    if let Some(heading) = heading {
        units[0].insert(0, heading);
    }
    Some(units)
}

fn font_px(kind: BlockKind, style: &StyleTokens) -> f32 {
    match kind {
        BlockKind::Name => style.name_font_px,
        BlockKind::JobTitle => style.job_title_font_px,
        BlockKind::Heading => style.heading_font_px,
        BlockKind::Contact | BlockKind::EntryMeta => style.meta_font_px,
        BlockKind::EntryTitle | BlockKind::Paragraph | BlockKind::Bullet => style.body_font_px,
    }
}

/// A measured block plus the gap it wants above it.
struct Measured {
    gap_before_px: f32,
    block: Block,
}

fn measure_unit(
    unit: &[BlockSpec],
    style: &StyleTokens,
    metrics: &FontMetricTable,
    content_width: f32,
) -> Vec<Measured> {
    unit.iter()
        .map(|spec| {
            let font = font_px(spec.kind, style);
            let indent = if spec.kind == BlockKind::Bullet {
                style.bullet_indent_px
            } else {
                0.0
            };
            let width = content_width - indent;
            Measured {
                gap_before_px: spec.gap_before_px,
                block: Block {
                    kind: spec.kind,
                    x_px: style.margin_px + indent,
                    y_px: 0.0,
                    width_px: width,
                    font_px: font,
                    line_height_px: (font * style.line_height).round(),
                    lines: wrap_text(&spec.text, metrics, font, width),
                },
            }
        })
        .collect()
}

/// Owns the finished pages and the page being filled.
struct Paginator<'a> {
    descriptor: &'a TemplateDescriptor,
    pages: Vec<Page>,
    page: PageBuilder,
}

impl<'a> Paginator<'a> {
    fn new(descriptor: &'a TemplateDescriptor) -> Self {
        Self {
            descriptor,
            pages: Vec::new(),
            page: PageBuilder::new(1, descriptor),
        }
    }

    fn break_page(&mut self) {
        let next = PageBuilder::new(self.pages.len() as u32 + 2, self.descriptor);
        let full = std::mem::replace(&mut self.page, next);
        let index = self.pages.len();
        self.pages.push(full.finish(self.descriptor, index));
    }

    fn finish(self) -> Vec<Page> {
        let Paginator {
            descriptor,
            mut pages,
            page,
        } = self;
        let index = pages.len();
        pages.push(page.finish(descriptor, index));
        pages
    }

    /// Places one unit under the flow rules.
    fn flow_unit(&mut self, kind: SectionKind, blocks: Vec<Measured>) {
        let needed = self.page.height_needed(&blocks);
        if needed <= self.page.room() {
            self.page.place(kind, blocks);
            return;
        }
        if self.page.has_content() && needed <= self.page.capacity() {
            self.break_page();
            self.page.place(kind, blocks);
            return;
        }

        // Taller than a page: continue it block by block.
        let mut blocks = blocks.into_iter().peekable();
        while let Some(measured) = blocks.next() {
            let keep_with_next = match blocks.peek() {
                Some(next) if keeps_with_next(measured.block.kind) => {
                    next.gap_before_px + next.block.line_height_px
                }
                _ => 0.0,
            };
            self.flow_block(kind, measured, keep_with_next);
        }
    }

    /// Places one block, splitting it between lines across as many pages as needed.
    fn flow_block(&mut self, kind: SectionKind, mut measured: Measured, keep_with_next: f32) {
        loop {
            let gap = if self.page.has_content() {
                measured.gap_before_px
            } else {
                0.0
            };
            let room = self.page.room() - gap;
            let block = &measured.block;

            if block.height_px() + keep_with_next <= room {
                self.page.place(kind, vec![measured]);
                return;
            }

            let line_count = block.lines.len();
            let lines_in_room = (room / block.line_height_px).floor().max(0.0) as usize;
            let mut fit = lines_in_room.min(line_count);
            if fit == line_count || fit == 0 || keeps_with_next(block.kind) {
                if self.page.has_content() {
                    self.break_page();
                    continue;
                }
                if fit == line_count {
                    self.page.place(kind, vec![measured]);
                    return;
                }
                // Empty page and still no room: always make progress.
                fit = fit.max(1);
            }

            let mut rest = block.clone();
            rest.lines = measured.block.lines.split_off(fit);
            self.page.place(kind, vec![measured]);
            self.break_page();
            measured = Measured {
                gap_before_px: 0.0,
                block: rest,
            };
        }
    }
}

/// Blocks that must not end a page on their own.
fn keeps_with_next(kind: BlockKind) -> bool {
    matches!(
        kind,
        BlockKind::Heading | BlockKind::EntryTitle | BlockKind::EntryMeta
    )
}

struct PageBuilder {
    number: u32,
    top: f32,
    /// Lowest y a block may reach; unbounded for fixed templates.
    bottom: f32,
    cursor: f32,
    sections: Vec<SectionLayout>,
}

impl PageBuilder {
    fn new(number: u32, descriptor: &TemplateDescriptor) -> Self {
        let margin = descriptor.style.margin_px;
        let bottom = match descriptor.pagination {
            Pagination::Flow => A4_HEIGHT_PX as f32 - margin,
            Pagination::Fixed(_) => f32::INFINITY,
        };
        Self {
            number,
            top: margin,
            bottom,
            cursor: margin,
            sections: Vec::new(),
        }
    }

    fn has_content(&self) -> bool {
        !self.sections.is_empty()
    }

    fn room(&self) -> f32 {
        self.bottom - self.cursor
    }

    fn capacity(&self) -> f32 {
        self.bottom - self.top
    }

    fn height_needed(&self, blocks: &[Measured]) -> f32 {
        let mut at_top = !self.has_content();
        blocks
            .iter()
            .map(|m| {
                let gap = if at_top { 0.0 } else { m.gap_before_px };
                at_top = false;
                gap + m.block.height_px()
            })
            .sum()
    }

    /// Places blocks below the cursor, opening `kind`'s section on first use.
    fn place(&mut self, kind: SectionKind, blocks: Vec<Measured>) {
        for Measured {
            gap_before_px,
            mut block,
        } in blocks
        {
            if self.has_content() {
                self.cursor += gap_before_px;
            }
            block.y_px = self.cursor;
            self.cursor += block.height_px();

            match self.sections.last_mut() {
                Some(section) if section.kind == kind => section.blocks.push(block),
                _ => self.sections.push(SectionLayout {
                    kind,
                    blocks: vec![block],
                }),
            }
        }
    }

    fn finish(self, descriptor: &TemplateDescriptor, page_index: usize) -> Page {
        let content_bottom = if self.has_content() {
            self.cursor + descriptor.style.margin_px
        } else {
            0.0
        };
        Page {
            number: self.number,
            width_px: PAGE_WIDTH_PX,
            height_px: descriptor.page_height.resolve(page_index, content_bottom),
            sections: self.sections,
        }
    }
}
