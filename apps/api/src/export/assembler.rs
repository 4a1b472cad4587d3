//! Document assembler: captured page images → one PDF, one page per image.
//!
//! Built with `printpdf` 0.8's data-oriented API: each page is a `PdfPage`
//! holding a single `Op::UseXobject` that paints its image edge to edge.
//! Page size is the image's authored size (1 CSS px = 0.75 pt); nothing is
//! rescaled to a paper format and nothing is cropped.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::capture::CapturedPage;

/// CSS reference resolution.
const CSS_DPI: f32 = 96.0;
pub const PT_PER_PX: f32 = 72.0 / CSS_DPI;
const MM_PER_PX: f32 = 25.4 / CSS_DPI;

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("no pages to assemble")]
    NoPages,

    #[error("page image {index} is missing its width or height")]
    MissingDimensions { index: usize },

    #[error("page image {index} could not be decoded: {message}")]
    Decode { index: usize, message: String },

    #[error("failed to encode output: {0}")]
    Encode(String),

    #[error("assembly worker failed: {0}")]
    Worker(String),
}

/// Where one input image ended up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagePlacement {
    /// 1-based position in the output.
    pub page_number: u32,
    /// `page_number` of the captured page it came from.
    pub source_page: u32,
    pub width_px: u32,
    pub height_px: u32,
    pub width_pt: f32,
    pub height_pt: f32,
}

#[derive(Debug, Clone)]
pub struct AssembledDocument {
    pub pages: Vec<PagePlacement>,
    pub bytes: Vec<u8>,
}

/// Composes captured pages into a PDF.
pub struct DocumentAssembler {
    title: String,
}

impl DocumentAssembler {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Assembles `pages` in input order. Every page is validated and decoded
    /// before the first PDF object is created, so a bad page yields an error
    /// and never a partial document.
    #[instrument(skip_all, fields(pages = pages.len(), title = %self.title))]
    pub fn assemble(&self, pages: &[CapturedPage]) -> Result<AssembledDocument, AssemblyError> {
        let decoded = decode_all(pages)?;

        let mut doc = PdfDocument::new(&self.title);
        let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(decoded.len());
        let mut placements: Vec<PagePlacement> = Vec::with_capacity(decoded.len());

        for (index, (captured, rgb)) in pages.iter().zip(decoded).enumerate() {
            let (img_w, img_h) = rgb.dimensions();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: img_w as usize,
                height: img_h as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            // At CSS_DPI an image pixel is PT_PER_PX points; scale the bitmap
            // down to the authored size so high-ratio captures fill the page exactly.
            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: Some(captured.width as f32 / img_w as f32),
                    scale_y: Some(captured.height as f32 / img_h as f32),
                    dpi: Some(CSS_DPI),
                    rotate: None,
                },
            }];

            pdf_pages.push(PdfPage::new(
                Mm(captured.width as f32 * MM_PER_PX),
                Mm(captured.height as f32 * MM_PER_PX),
                ops,
            ));
            placements.push(PagePlacement {
                page_number: index as u32 + 1,
                source_page: captured.page_number,
                width_px: captured.width,
                height_px: captured.height,
                width_pt: captured.width as f32 * PT_PER_PX,
                height_pt: captured.height as f32 * PT_PER_PX,
            });
        }

        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "PDF serializer reported warnings");
        }

        info!(pages = placements.len(), bytes = bytes.len(), "PDF assembled");
        Ok(AssembledDocument {
            pages: placements,
            bytes,
        })
    }
}

/// Stacks the page images vertically into a single PNG (the image export).
///
/// Pages keep their order top to bottom; narrower pages are left-aligned on white.
#[instrument(skip_all, fields(pages = pages.len()))]
pub fn stitch_png(pages: &[CapturedPage]) -> Result<Vec<u8>, AssemblyError> {
    let decoded = decode_all(pages)?;

    let width = decoded.iter().map(|img| img.width()).max().unwrap_or(0);
    let height: u32 = decoded.iter().map(|img| img.height()).sum();
    let mut canvas = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    let mut y: i64 = 0;
    for img in &decoded {
        image::imageops::overlay(&mut canvas, img, 0, y);
        y += img.height() as i64;
    }

    let mut png = Vec::new();
    DynamicImage::ImageRgb8(canvas)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|err| AssemblyError::Encode(err.to_string()))?;

    debug!(width, height, bytes = png.len(), "Pages stitched");
    Ok(png)
}

/// Validates and decodes every page up front.
fn decode_all(pages: &[CapturedPage]) -> Result<Vec<RgbImage>, AssemblyError> {
    if pages.is_empty() {
        return Err(AssemblyError::NoPages);
    }
    if let Some(index) = pages.iter().position(|p| p.width == 0 || p.height == 0) {
        return Err(AssemblyError::MissingDimensions { index });
    }

    pages
        .iter()
        .enumerate()
        .map(|(index, page)| {
            image::load_from_memory(&page.png)
                .map(|img| img.to_rgb8())
                .map_err(|err| AssemblyError::Decode {
                    index,
                    message: err.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Document, Object};

    fn blank_page(page_number: u32, width: u32, height: u32, ratio: u32) -> CapturedPage {
        let img = RgbImage::from_pixel(width * ratio, height * ratio, Rgb([255, 255, 255]));
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        CapturedPage {
            page_number,
            png,
            width,
            height,
        }
    }

    /// MediaBox of a page, looked up on the page or inherited from its parents.
    fn media_box(doc: &Document, mut id: lopdf::ObjectId) -> Vec<f32> {
        loop {
            let dict = doc.get_dictionary(id).expect("page dictionary");
            if let Ok(Object::Array(values)) = dict.get(b"MediaBox") {
                return values
                    .iter()
                    .map(|v| v.as_float().expect("numeric MediaBox entry"))
                    .collect();
            }
            id = dict
                .get(b"Parent")
                .and_then(Object::as_reference)
                .expect("MediaBox or Parent");
        }
    }

    #[test]
    fn test_two_pages_of_distinct_sizes_keep_order_and_size() {
        let pages = vec![blank_page(1, 794, 1123, 1), blank_page(2, 794, 700, 1)];
        let assembled = DocumentAssembler::new("Resume").assemble(&pages).unwrap();

        assert_eq!(assembled.pages.len(), 2);
        assert_eq!(assembled.pages[0].source_page, 1);
        assert_eq!(
            (assembled.pages[0].width_px, assembled.pages[0].height_px),
            (794, 1123)
        );
        assert_eq!(assembled.pages[1].source_page, 2);
        assert_eq!(
            (assembled.pages[1].width_px, assembled.pages[1].height_px),
            (794, 700)
        );

        let doc = Document::load_mem(&assembled.bytes).expect("valid PDF");
        let page_ids: Vec<lopdf::ObjectId> = doc.get_pages().into_values().collect();
        assert_eq!(page_ids.len(), 2);

        let first = media_box(&doc, page_ids[0]);
        let second = media_box(&doc, page_ids[1]);
        assert!((first[2] - first[0] - 595.5).abs() < 1.0, "{first:?}");
        assert!((first[3] - first[1] - 842.25).abs() < 1.0, "{first:?}");
        assert!((second[2] - second[0] - 595.5).abs() < 1.0, "{second:?}");
        assert!((second[3] - second[1] - 525.0).abs() < 1.0, "{second:?}");
    }

    #[test]
    fn test_single_page_document() {
        let assembled = DocumentAssembler::new("Resume")
            .assemble(&[blank_page(1, 794, 1123, 1)])
            .unwrap();
        assert_eq!(assembled.pages.len(), 1);
        assert!(assembled.bytes.starts_with(b"%PDF"));
        let doc = Document::load_mem(&assembled.bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_high_ratio_capture_keeps_authored_page_size() {
        let assembled = DocumentAssembler::new("Resume")
            .assemble(&[blank_page(1, 100, 50, 2)])
            .unwrap();
        let placement = &assembled.pages[0];
        assert_eq!((placement.width_px, placement.height_px), (100, 50));
        assert!((placement.width_pt - 75.0).abs() < 1e-3);
        assert!((placement.height_pt - 37.5).abs() < 1e-3);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = DocumentAssembler::new("Resume").assemble(&[]).unwrap_err();
        assert!(matches!(err, AssemblyError::NoPages));
    }

    #[test]
    fn test_missing_dimensions_abort() {
        let mut bad = blank_page(2, 10, 10, 1);
        bad.height = 0;
        let err = DocumentAssembler::new("Resume")
            .assemble(&[blank_page(1, 10, 10, 1), bad])
            .unwrap_err();
        assert!(matches!(err, AssemblyError::MissingDimensions { index: 1 }));
    }

    #[test]
    fn test_undecodable_image_aborts() {
        let mut bad = blank_page(1, 10, 10, 1);
        bad.png = b"not a png".to_vec();
        let err = DocumentAssembler::new("Resume").assemble(&[bad]).unwrap_err();
        assert!(matches!(err, AssemblyError::Decode { index: 0, .. }));
    }

    #[test]
    fn test_stitch_png_stacks_pages() {
        let pages = vec![blank_page(1, 30, 20, 1), blank_page(2, 20, 10, 1)];
        let png = stitch_png(&pages).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (30, 30));
    }
}
