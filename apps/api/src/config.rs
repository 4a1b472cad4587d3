use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::render::TemplateId;

const PIXEL_RATIO_RANGE: std::ops::RangeInclusive<f32> = 1.0..=4.0;

/// Application configuration loaded from environment variables.
/// Startup fails if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Template used when a request names none.
    pub default_template: TemplateId,
    /// TTF/OTF used to draw text during capture. Without it text is greeked.
    pub font_path: Option<PathBuf>,
    pub capture_pixel_ratio: f32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = var("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let default_template = match var("FOLIO_DEFAULT_TEMPLATE") {
            Some(raw) => raw
                .parse::<TemplateId>()
                .context("FOLIO_DEFAULT_TEMPLATE is not a known template")?,
            None => TemplateId::Classic,
        };

        let capture_pixel_ratio = match var("FOLIO_CAPTURE_PIXEL_RATIO") {
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .context("FOLIO_CAPTURE_PIXEL_RATIO must be a number")?,
            None => 2.0,
        };
        if !PIXEL_RATIO_RANGE.contains(&capture_pixel_ratio) {
            bail!(
                "FOLIO_CAPTURE_PIXEL_RATIO must be between {} and {}, got {capture_pixel_ratio}",
                PIXEL_RATIO_RANGE.start(),
                PIXEL_RATIO_RANGE.end()
            );
        }

        Ok(Config {
            port,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            default_template,
            font_path: var("FOLIO_FONT_PATH").map(PathBuf::from),
            capture_pixel_ratio,
        })
    }
}
