//! Page surfaces: a rendered page materialized so its pixels can be read.

use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::layout::font_metrics::{get_metrics, FontMetricTable};
use crate::render::node::{Block, BlockKind, Page};
use crate::render::template::{Rgb, SectionKind, StyleTokens};

/// What the capture stage needs from a materialized page.
pub trait PageSurface: Send + Sync {
    fn page_number(&self) -> u32;

    /// Size the page was authored at, in CSS pixels.
    fn authored_size(&self) -> (u32, u32);

    fn is_attached(&self) -> bool;

    /// False when the surface holds content whose pixels may not be read back.
    fn is_origin_clean(&self) -> bool {
        true
    }

    /// Paints the page onto `canvas`, which is `authored_size * scale` pixels
    /// and already filled with the background colour.
    fn paint(&self, canvas: &mut RgbaImage, scale: f32);
}

/// The built-in surface: draws a laid-out `Page` with its template's tokens.
///
/// Text is drawn with the configured font when one is loaded; otherwise every
/// word becomes a greeked bar of its measured width.
pub struct RasterSurface {
    page: Page,
    style: StyleTokens,
    font: Option<FontArc>,
}

impl RasterSurface {
    pub fn materialize(page: Page, style: StyleTokens, font: Option<FontArc>) -> Self {
        Self {
            page,
            style,
            font,
        }
    }

    /// Bottom of the name/contact area, in authored pixels.
    fn header_bottom(&self) -> Option<f32> {
        self.page
            .sections
            .iter()
            .filter(|s| matches!(s.kind, SectionKind::Header | SectionKind::Contact))
            .flat_map(|s| s.blocks.iter())
            .map(Block::bottom_px)
            .reduce(f32::max)
    }

    fn color_for(&self, kind: BlockKind, on_band: bool) -> Rgba<u8> {
        let style = &self.style;
        let rgb = match kind {
            _ if on_band => [0xff, 0xff, 0xff],
            BlockKind::Name | BlockKind::Heading => style.accent_color,
            BlockKind::Contact | BlockKind::EntryMeta => style.muted_color,
            _ => style.text_color,
        };
        opaque(rgb)
    }

    fn paint_block(
        &self,
        canvas: &mut RgbaImage,
        block: &Block,
        color: Rgba<u8>,
        metrics: &FontMetricTable,
        scale: f32,
    ) {
        for (i, line) in block.lines.iter().enumerate() {
            let top = block.y_px + i as f32 * block.line_height_px;
            // Vertically centre the glyph box inside the line box.
            let glyph_top = top + (block.line_height_px - block.font_px) / 2.0;

            match &self.font {
                Some(font) => draw_text_mut(
                    canvas,
                    color,
                    px(block.x_px, scale),
                    px(glyph_top, scale),
                    PxScale::from(block.font_px * scale),
                    font,
                    line,
                ),
                None => greek_line(canvas, line, block, glyph_top, color, metrics, scale),
            }
        }

        if block.kind == BlockKind::Bullet {
            let cy = block.y_px + block.line_height_px / 2.0;
            let radius = (block.font_px * 0.15 * scale).round().max(1.0) as i32;
            draw_filled_circle_mut(
                canvas,
                (px(block.x_px - 9.0, scale), px(cy, scale)),
                radius,
                color,
            );
        }

        if block.kind == BlockKind::Heading && self.style.section_rule {
            let y = block.bottom_px() + 1.0;
            fill_rect(
                canvas,
                block.x_px,
                y,
                block.width_px,
                1.0,
                opaque(self.style.accent_color),
                scale,
            );
        }
    }
}

impl PageSurface for RasterSurface {
    fn page_number(&self) -> u32 {
        self.page.number
    }

    fn authored_size(&self) -> (u32, u32) {
        (self.page.width_px, self.page.height_px)
    }

    /// Owns its page, so it stays attached until dropped.
    fn is_attached(&self) -> bool {
        true
    }

    fn paint(&self, canvas: &mut RgbaImage, scale: f32) {
        let metrics = get_metrics(self.style.font);

        let band_bottom = if self.style.header_band {
            self.header_bottom()
                .map(|bottom| bottom + self.style.margin_px / 2.0)
        } else {
            None
        };
        if let Some(bottom) = band_bottom {
            fill_rect(
                canvas,
                0.0,
                0.0,
                self.page.width_px as f32,
                bottom,
                opaque(self.style.accent_color),
                scale,
            );
        }

        for section in &self.page.sections {
            let on_band = band_bottom.is_some()
                && matches!(section.kind, SectionKind::Header | SectionKind::Contact);
            for block in &section.blocks {
                let color = self.color_for(block.kind, on_band);
                self.paint_block(canvas, block, color, &metrics, scale);
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Drawing helpers
// ────────────────────────────────────────────────────────────────────────────

fn opaque([r, g, b]: Rgb) -> Rgba<u8> {
    Rgba([r, g, b, 0xff])
}

fn px(value: f32, scale: f32) -> i32 {
    (value * scale).round() as i32
}

fn fill_rect(
    canvas: &mut RgbaImage,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    color: Rgba<u8>,
    scale: f32,
) {
    let w = (width * scale).round().max(1.0) as u32;
    let h = (height * scale).round().max(1.0) as u32;
    draw_filled_rect_mut(canvas, Rect::at(px(x, scale), px(y, scale)).of_size(w, h), color);
}

/// Draws one bar per word, as wide as the word measures in the template font.
fn greek_line(
    canvas: &mut RgbaImage,
    line: &str,
    block: &Block,
    glyph_top: f32,
    color: Rgba<u8>,
    metrics: &FontMetricTable,
    scale: f32,
) {
    let space = metrics.space_width() * block.font_px;
    let bar_height = block.font_px * 0.6;
    let bar_top = glyph_top + (block.font_px - bar_height) / 2.0;
    let mut x = block.x_px;
    for word in line.split_whitespace() {
        let width = metrics.measure_px(word, block.font_px);
        fill_rect(canvas, x, bar_top, width, bar_height, color, scale);
        x += width + space;
    }
}
