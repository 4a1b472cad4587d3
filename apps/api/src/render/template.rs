//! Template descriptors: the declarative table every template is rendered from.
//!
//! A template is data, not code: its section order, its pagination policy and
//! its style tokens. `render_resume` is the only renderer and reads nothing but
//! the descriptor to decide layout.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::font_metrics::FontFamily;

/// Page width in CSS pixels (A4 at 96 dpi).
pub const PAGE_WIDTH_PX: u32 = 794;
/// A4 page height in CSS pixels.
pub const A4_HEIGHT_PX: u32 = 1123;

#[derive(Debug, Error, PartialEq)]
pub enum TemplateError {
    #[error("unknown template '{0}' (expected one of: classic, modern, minimal, creative, multi-page)")]
    Unknown(String),
}

/// The known template variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateId {
    Classic,
    Modern,
    Minimal,
    Creative,
    MultiPage,
}

impl TemplateId {
    pub const ALL: [TemplateId; 5] = [
        TemplateId::Classic,
        TemplateId::Modern,
        TemplateId::Minimal,
        TemplateId::Creative,
        TemplateId::MultiPage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Classic => "classic",
            TemplateId::Modern => "modern",
            TemplateId::Minimal => "minimal",
            TemplateId::Creative => "creative",
            TemplateId::MultiPage => "multi-page",
        }
    }

    pub fn descriptor(self) -> &'static TemplateDescriptor {
        match self {
            TemplateId::Classic => &CLASSIC,
            TemplateId::Modern => &MODERN,
            TemplateId::Minimal => &MINIMAL,
            TemplateId::Creative => &CREATIVE,
            TemplateId::MultiPage => &MULTI_PAGE,
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TemplateId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TemplateError::Unknown(s.to_string()))
    }
}

/// The sections a resume can be laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Languages,
    Certifications,
}

impl SectionKind {
    /// Heading text, or `None` for sections drawn without a heading.
    pub fn heading(self) -> Option<&'static str> {
        match self {
            SectionKind::Header | SectionKind::Contact => None,
            SectionKind::Summary => Some("Professional Summary"),
            SectionKind::Experience => Some("Experience"),
            SectionKind::Education => Some("Education"),
            SectionKind::Skills => Some("Skills"),
            SectionKind::Projects => Some("Projects"),
            SectionKind::Languages => Some("Languages"),
            SectionKind::Certifications => Some("Certifications"),
        }
    }
}

/// How sections are distributed over pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pagination {
    /// Sections follow `TemplateDescriptor::sections`; a new page starts when the
    /// next block would cross the bottom margin.
    Flow,
    /// Explicit section-to-page table. Row N lists the sections of page N+1.
    Fixed(&'static [&'static [SectionKind]]),
}

/// What to do with a section that has no content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySections {
    Omit,
    ShowHeading,
}

/// How tall a page is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageHeight {
    /// Every page is A4 height.
    A4,
    /// Page height follows its content, never below `min_px[page_index]`
    /// (the last entry applies to all further pages).
    FitContent { min_px: &'static [u32] },
}

impl PageHeight {
    pub fn resolve(&self, page_index: usize, content_bottom_px: f32) -> u32 {
        match self {
            PageHeight::A4 => A4_HEIGHT_PX,
            PageHeight::FitContent { min_px } => {
                let floor = min_px
                    .get(page_index)
                    .or_else(|| min_px.last())
                    .copied()
                    .unwrap_or(0);
                (content_bottom_px.ceil() as u32).max(floor)
            }
        }
    }
}

/// How tag lists (skills, languages, certifications) are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagStyle {
    Inline { separator: &'static str },
    Bullets,
}

pub type Rgb = [u8; 3];

/// Per-template visual tokens consumed by layout and capture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StyleTokens {
    pub font: FontFamily,
    pub name_font_px: f32,
    pub job_title_font_px: f32,
    pub heading_font_px: f32,
    pub body_font_px: f32,
    pub meta_font_px: f32,
    /// Line height as a multiple of font size.
    pub line_height: f32,
    pub margin_px: f32,
    pub section_gap_px: f32,
    pub entry_gap_px: f32,
    pub bullet_indent_px: f32,
    pub text_color: Rgb,
    pub muted_color: Rgb,
    pub accent_color: Rgb,
    /// Name and contact drawn in white on an accent band.
    pub header_band: bool,
    pub section_rule: bool,
    pub uppercase_headings: bool,
    pub tag_style: TagStyle,
    pub contact_separator: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct TemplateDescriptor {
    pub id: TemplateId,
    pub name: &'static str,
    /// Section order for `Pagination::Flow`.
    pub sections: &'static [SectionKind],
    pub pagination: Pagination,
    pub empty_sections: EmptySections,
    pub page_height: PageHeight,
    pub style: StyleTokens,
}

impl TemplateDescriptor {
    /// Sections grouped by page for fixed templates, or one group for flow.
    pub fn page_groups(&self) -> Vec<&'static [SectionKind]> {
        match self.pagination {
            Pagination::Flow => vec![self.sections],
            Pagination::Fixed(table) => table.to_vec(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Descriptor table
// ────────────────────────────────────────────────────────────────────────────

use SectionKind::*;

const BASE_STYLE: StyleTokens = StyleTokens {
    font: FontFamily::Inter,
    name_font_px: 28.0,
    job_title_font_px: 16.0,
    heading_font_px: 15.0,
    body_font_px: 13.0,
    meta_font_px: 12.0,
    line_height: 1.4,
    margin_px: 48.0,
    section_gap_px: 18.0,
    entry_gap_px: 10.0,
    bullet_indent_px: 16.0,
    text_color: [0x1f, 0x29, 0x37],
    muted_color: [0x6b, 0x72, 0x80],
    accent_color: [0x1f, 0x29, 0x37],
    header_band: false,
    section_rule: true,
    uppercase_headings: false,
    tag_style: TagStyle::Inline { separator: " • " },
    contact_separator: " | ",
};

static CLASSIC: TemplateDescriptor = TemplateDescriptor {
    id: TemplateId::Classic,
    name: "Classic",
    sections: &[
        Header,
        Contact,
        Summary,
        Experience,
        Education,
        Skills,
        Projects,
        Certifications,
        Languages,
    ],
    pagination: Pagination::Flow,
    empty_sections: EmptySections::Omit,
    page_height: PageHeight::A4,
    style: StyleTokens {
        font: FontFamily::ComputerModern,
        text_color: [0x00, 0x00, 0x00],
        accent_color: [0x00, 0x00, 0x00],
        uppercase_headings: true,
        ..BASE_STYLE
    },
};

static MODERN: TemplateDescriptor = TemplateDescriptor {
    id: TemplateId::Modern,
    name: "Modern",
    sections: &[
        Header,
        Contact,
        Summary,
        Skills,
        Experience,
        Projects,
        Education,
        Certifications,
        Languages,
    ],
    pagination: Pagination::Flow,
    empty_sections: EmptySections::Omit,
    page_height: PageHeight::A4,
    style: StyleTokens {
        font: FontFamily::Inter,
        accent_color: [0x25, 0x63, 0xeb],
        header_band: true,
        section_rule: false,
        contact_separator: "  ·  ",
        ..BASE_STYLE
    },
};

static MINIMAL: TemplateDescriptor = TemplateDescriptor {
    id: TemplateId::Minimal,
    name: "Minimal",
    sections: &[
        Header,
        Contact,
        Summary,
        Experience,
        Education,
        Projects,
        Skills,
        Languages,
        Certifications,
    ],
    pagination: Pagination::Flow,
    empty_sections: EmptySections::Omit,
    page_height: PageHeight::A4,
    style: StyleTokens {
        font: FontFamily::Lato,
        name_font_px: 24.0,
        heading_font_px: 14.0,
        margin_px: 56.0,
        section_rule: false,
        tag_style: TagStyle::Inline { separator: ", " },
        ..BASE_STYLE
    },
};

static CREATIVE: TemplateDescriptor = TemplateDescriptor {
    id: TemplateId::Creative,
    name: "Creative",
    sections: &[
        Header,
        Contact,
        Summary,
        Projects,
        Experience,
        Skills,
        Education,
        Languages,
        Certifications,
    ],
    pagination: Pagination::Flow,
    empty_sections: EmptySections::Omit,
    page_height: PageHeight::A4,
    style: StyleTokens {
        font: FontFamily::Oswald,
        name_font_px: 34.0,
        heading_font_px: 16.0,
        accent_color: [0xdb, 0x27, 0x77],
        uppercase_headings: true,
        tag_style: TagStyle::Bullets,
        ..BASE_STYLE
    },
};

static MULTI_PAGE: TemplateDescriptor = TemplateDescriptor {
    id: TemplateId::MultiPage,
    name: "Multi-page",
    sections: &[
        Header,
        Contact,
        Summary,
        Experience,
        Education,
        Projects,
        Skills,
        Certifications,
        Languages,
    ],
    pagination: Pagination::Fixed(&[
        &[Header, Contact, Summary, Experience],
        &[Education, Projects, Skills, Certifications, Languages],
    ]),
    empty_sections: EmptySections::ShowHeading,
    page_height: PageHeight::FitContent {
        min_px: &[A4_HEIGHT_PX, 400],
    },
    style: StyleTokens {
        font: FontFamily::EbGaramond,
        body_font_px: 14.0,
        accent_color: [0x0f, 0x4c, 0x5c],
        ..BASE_STYLE
    },
};
