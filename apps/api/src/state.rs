use std::sync::Arc;

use ab_glyph::FontArc;
use anyhow::{Context, Result};

use crate::capture::{CaptureOptions, Capturer, RasterCapturer};
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable capture backend. Default: RasterCapturer at the configured pixel ratio.
    pub capturer: Arc<dyn Capturer>,
    /// Font used to draw text during capture; `None` means greeked text.
    pub font: Option<FontArc>,
}

impl AppState {
    /// Builds the default state: loads the configured font (if any) and the raster capturer.
    pub fn from_config(config: Config) -> Result<Self> {
        let font = match &config.font_path {
            Some(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("Failed to read font file {}", path.display()))?;
                let font = FontArc::try_from_vec(bytes)
                    .with_context(|| format!("{} is not a usable TTF/OTF font", path.display()))?;
                Some(font)
            }
            None => None,
        };

        let capturer = Arc::new(RasterCapturer::new(CaptureOptions {
            pixel_ratio: config.capture_pixel_ratio,
            ..Default::default()
        }));

        Ok(AppState {
            config,
            capturer,
            font,
        })
    }
}
