//! Static font metrics for the template font families.
//!
//! Widths are in em units (relative to font size). Every family is derived from
//! one humanist sans-serif base table scaled by a per-family factor; the result
//! is accurate to a few percent of the line width, which is enough to decide
//! line breaks and page breaks for a resume-sized document.
//!
//! The base table covers ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32. Anything else measures as `AVERAGE_CHAR_EM`.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

/// Font families used by the template set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    /// Modern template: clean humanist sans-serif.
    Inter,
    /// Multi-page template: old-style serif.
    EbGaramond,
    /// Minimal template: geometric humanist sans-serif.
    Lato,
    /// Creative template: condensed display sans-serif.
    Oswald,
    /// Classic template: traditional TeX font.
    ComputerModern,
}

impl FontFamily {
    /// Width of this family relative to the base table.
    fn width_scale(self) -> f32 {
        match self {
            FontFamily::Inter => 1.00,
            FontFamily::EbGaramond => 0.85,
            FontFamily::Lato => 1.05,
            FontFamily::Oswald => 0.68,
            FontFamily::ComputerModern => 0.90,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Metric table
// ────────────────────────────────────────────────────────────────────────────

/// Fallback width for characters outside the base table (accents, dashes, bullets).
const AVERAGE_CHAR_EM: f32 = 0.52;

/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
#[rustfmt::skip]
static BASE_WIDTHS: [f32; 95] = [
    0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
    0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
    0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
    0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
    0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
    0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
    0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
    0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
    0.33, 0.26, 0.33, 0.59,
];

/// Character-width lookup for one font family.
#[derive(Debug, Clone, Copy)]
pub struct FontMetricTable {
    scale: f32,
}

impl FontMetricTable {
    /// Width of a single space in em units.
    pub fn space_width(&self) -> f32 {
        BASE_WIDTHS[0] * self.scale
    }

    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    BASE_WIDTHS[code - 32]
                } else {
                    AVERAGE_CHAR_EM
                }
            })
            .sum::<f32>()
            * self.scale
    }

    /// Measures a string in pixels at the given font size.
    pub fn measure_px(&self, s: &str, font_px: f32) -> f32 {
        self.measure_str(s) * font_px
    }
}

/// Returns the metric table for a given font family.
pub fn get_metrics(font: FontFamily) -> FontMetricTable {
    FontMetricTable {
        scale: font.width_scale(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
