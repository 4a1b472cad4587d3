// Capture stage: materialized page → opaque PNG at the page's authored size.
// Rasterization is CPU-bound; `RasterCapturer` runs it on the blocking pool.

pub mod surface;

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use thiserror::Error;
use tracing::{debug, instrument};

pub use surface::{PageSurface, RasterSurface};

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("page {page} is not attached to a surface")]
    Detached { page: u32 },

    #[error("page {page} has zero size ({width}x{height})")]
    ZeroSized { page: u32, width: u32, height: u32 },

    #[error("page {page} contains cross-origin content and cannot be read")]
    Tainted { page: u32 },

    #[error("failed to encode page {page}: {message}")]
    Encode { page: u32, message: String },

    #[error("capture worker failed: {0}")]
    Worker(String),
}

#[derive(Debug, Clone, Copy)]
pub struct CaptureOptions {
    /// Device pixels per authored pixel.
    pub pixel_ratio: f32,
    /// Forced to opaque before use.
    pub background: Rgba<u8>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            pixel_ratio: 1.0,
            background: Rgba([255, 255, 255, 255]),
        }
    }
}

/// One captured page: PNG bytes plus the authored size the page must keep.
#[derive(Debug, Clone)]
pub struct CapturedPage {
    pub page_number: u32,
    pub png: Vec<u8>,
    /// Authored width in CSS pixels; the bitmap may be wider.
    pub width: u32,
    pub height: u32,
}

/// Rasterizes one surface.
///
/// Output size depends only on the surface's authored size and
/// `options.pixel_ratio`. Detached, empty or tainted surfaces fail instead of
/// yielding a blank image.
#[instrument(skip_all, fields(page = surface.page_number()))]
pub fn capture_page(
    surface: &dyn PageSurface,
    options: &CaptureOptions,
) -> Result<CapturedPage, CaptureError> {
    let page = surface.page_number();
    if !surface.is_attached() {
        return Err(CaptureError::Detached { page });
    }
    let (width, height) = surface.authored_size();
    if width == 0 || height == 0 {
        return Err(CaptureError::ZeroSized {
            page,
            width,
            height,
        });
    }
    if !surface.is_origin_clean() {
        return Err(CaptureError::Tainted { page });
    }

    let ratio = options.pixel_ratio.max(f32::EPSILON);
    let px_width = ((width as f32 * ratio).round() as u32).max(1);
    let px_height = ((height as f32 * ratio).round() as u32).max(1);

    let mut background = options.background;
    background.0[3] = 0xff;
    let mut canvas = RgbaImage::from_pixel(px_width, px_height, background);
    surface.paint(&mut canvas, ratio);

    let flattened = DynamicImage::ImageRgb8(flatten(&canvas, background));
    let mut png = Vec::new();
    flattened
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|err| CaptureError::Encode {
            page,
            message: err.to_string(),
        })?;

    debug!(px_width, px_height, bytes = png.len(), "Page captured");

    Ok(CapturedPage {
        page_number: page,
        png,
        width,
        height,
    })
}

/// Composites the canvas over `background`, dropping the alpha channel.
fn flatten(canvas: &RgbaImage, background: Rgba<u8>) -> RgbImage {
    RgbImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        let [r, g, b, a] = canvas.get_pixel(x, y).0;
        let alpha = a as u32;
        let blend = |fg: u8, bg: u8| ((fg as u32 * alpha + bg as u32 * (255 - alpha)) / 255) as u8;
        Rgb([
            blend(r, background.0[0]),
            blend(g, background.0[1]),
            blend(b, background.0[2]),
        ])
    })
}

/// Capture backend. `AppState` holds an `Arc<dyn Capturer>`.
#[async_trait]
pub trait Capturer: Send + Sync {
    async fn capture(&self, surface: Arc<dyn PageSurface>) -> Result<CapturedPage, CaptureError>;
}

/// Default backend: `capture_page` on the blocking pool.
pub struct RasterCapturer {
    options: CaptureOptions,
}

impl RasterCapturer {
    pub fn new(options: CaptureOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl Capturer for RasterCapturer {
    async fn capture(&self, surface: Arc<dyn PageSurface>) -> Result<CapturedPage, CaptureError> {
        let options = self.options;
        tokio::task::spawn_blocking(move || capture_page(surface.as_ref(), &options))
            .await
            .map_err(|e| CaptureError::Worker(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ResumeData;
    use crate::render::{render_resume, TemplateId};

    /// Surface with fixed geometry that paints nothing, or paints transparent ink.
    struct StubSurface {
        size: (u32, u32),
        attached: bool,
        clean: bool,
        transparent_ink: bool,
    }

    impl StubSurface {
        fn new(width: u32, height: u32) -> Self {
            Self {
                size: (width, height),
                attached: true,
                clean: true,
                transparent_ink: false,
            }
        }
    }

    impl PageSurface for StubSurface {
        fn page_number(&self) -> u32 {
            7
        }
        fn authored_size(&self) -> (u32, u32) {
            self.size
        }
        fn is_attached(&self) -> bool {
            self.attached
        }
        fn is_origin_clean(&self) -> bool {
            self.clean
        }
        fn paint(&self, canvas: &mut RgbaImage, _scale: f32) {
            if self.transparent_ink {
                for pixel in canvas.pixels_mut() {
                    *pixel = Rgba([0, 0, 0, 0]);
                }
            }
        }
    }

    fn decode(page: &CapturedPage) -> DynamicImage {
        image::load_from_memory(&page.png).expect("captured PNG decodes")
    }

    #[test]
    fn test_capture_uses_authored_size() {
        let page = capture_page(&StubSurface::new(794, 700), &CaptureOptions::default()).unwrap();
        assert_eq!((page.width, page.height), (794, 700));
        let img = decode(&page);
        assert_eq!((img.width(), img.height()), (794, 700));
        assert_eq!(page.page_number, 7);
    }

    #[test]
    fn test_pixel_ratio_scales_bitmap_not_authored_size() {
        let options = CaptureOptions {
            pixel_ratio: 2.0,
            ..Default::default()
        };
        let page = capture_page(&StubSurface::new(100, 50), &options).unwrap();
        assert_eq!((page.width, page.height), (100, 50));
        let img = decode(&page);
        assert_eq!((img.width(), img.height()), (200, 100));
    }

    #[test]
    fn test_background_is_opaque_white() {
        let page = capture_page(&StubSurface::new(20, 20), &CaptureOptions::default()).unwrap();
        let img = decode(&page).to_rgba8();
        assert!(img.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_translucent_background_is_forced_opaque() {
        let options = CaptureOptions {
            background: Rgba([255, 255, 255, 0]),
            ..Default::default()
        };
        let mut surface = StubSurface::new(10, 10);
        surface.transparent_ink = true;
        let page = capture_page(&surface, &options).unwrap();
        let img = decode(&page);
        assert!(!img.color().has_alpha());
        assert!(img.to_rgb8().pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_detached_surface_fails() {
        let mut surface = StubSurface::new(10, 10);
        surface.attached = false;
        let err = capture_page(&surface, &CaptureOptions::default()).unwrap_err();
        assert!(matches!(err, CaptureError::Detached { page: 7 }));
    }

    #[test]
    fn test_zero_sized_surface_fails() {
        let err = capture_page(&StubSurface::new(794, 0), &CaptureOptions::default()).unwrap_err();
        assert!(matches!(err, CaptureError::ZeroSized { height: 0, .. }));
    }

    #[test]
    fn test_tainted_surface_fails() {
        let mut surface = StubSurface::new(10, 10);
        surface.clean = false;
        let err = capture_page(&surface, &CaptureOptions::default()).unwrap_err();
        assert!(matches!(err, CaptureError::Tainted { .. }));
    }

    #[tokio::test]
    async fn test_raster_capturer_on_rendered_page() {
        let doc = render_resume(&ResumeData::sample(), TemplateId::Classic);
        let style = TemplateId::Classic.descriptor().style;
        let page = doc.pages[0].clone();
        let surface: Arc<dyn PageSurface> =
            Arc::new(RasterSurface::materialize(page.clone(), style, None));

        let captured = RasterCapturer::new(CaptureOptions::default())
            .capture(surface)
            .await
            .unwrap();
        assert_eq!(captured.width, page.width_px);
        assert_eq!(captured.height, page.height_px);

        let img = decode(&captured).to_rgb8();
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
        assert!(img.pixels().any(|p| p.0 != [255, 255, 255]));
    }
}
