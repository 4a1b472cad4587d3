//! Section content: turns resume records into unpositioned block specs.
//!
//! Output is grouped into *units*: runs of blocks that must stay on the same
//! page (one experience entry, one paragraph of the summary, ...).

use crate::models::resume::ResumeData;
use crate::render::format::{bullet_lines, format_date_range, join_non_empty, split_lines};
use crate::render::node::BlockKind;
use crate::render::template::{SectionKind, StyleTokens, TagStyle};

const TITLE_SEPARATOR: &str = " — ";
const INNER_GAP_PX: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BlockSpec {
    pub kind: BlockKind,
    pub text: String,
    pub gap_before_px: f32,
}

impl BlockSpec {
    fn new(kind: BlockKind, text: impl Into<String>, gap_before_px: f32) -> Self {
        Self {
            kind,
            text: text.into(),
            gap_before_px,
        }
    }
}

pub type Unit = Vec<BlockSpec>;

/// Builds the content units of one section. An empty vec means the section has
/// no content (its heading, if any, is the renderer's business).
pub fn section_units(resume: &ResumeData, kind: SectionKind, style: &StyleTokens) -> Vec<Unit> {
    match kind {
        SectionKind::Header => header_units(resume),
        SectionKind::Contact => contact_units(resume, style),
        SectionKind::Summary => split_lines(&resume.summary)
            .into_iter()
            .enumerate()
            .map(|(i, para)| {
                let gap = if i == 0 { INNER_GAP_PX } else { style.entry_gap_px / 2.0 };
                vec![BlockSpec::new(BlockKind::Paragraph, para, gap)]
            })
            .collect(),
        SectionKind::Experience => experience_units(resume, style),
        SectionKind::Education => education_units(resume, style),
        SectionKind::Projects => project_units(resume, style),
        SectionKind::Skills => tag_units(&resume.skills, style),
        SectionKind::Languages => tag_units(&resume.languages, style),
        SectionKind::Certifications => tag_units(&resume.certifications, style),
    }
}

fn header_units(resume: &ResumeData) -> Vec<Unit> {
    let info = &resume.personal_info;
    let mut unit = Vec::new();
    if !info.full_name.trim().is_empty() {
        unit.push(BlockSpec::new(BlockKind::Name, info.full_name.trim(), 0.0));
    }
    if !info.job_title.trim().is_empty() {
        unit.push(BlockSpec::new(BlockKind::JobTitle, info.job_title.trim(), INNER_GAP_PX));
    }
    non_empty(unit).into_iter().collect()
}

fn contact_units(resume: &ResumeData, style: &StyleTokens) -> Vec<Unit> {
    let info = &resume.personal_info;
    let line = join_non_empty(
        [
            info.email.as_str(),
            info.phone.as_str(),
            info.location.as_str(),
            info.linkedin.as_str(),
            info.portfolio.as_str(),
        ],
        style.contact_separator,
    );
    if line.is_empty() {
        return Vec::new();
    }
    vec![vec![BlockSpec::new(BlockKind::Contact, line, 6.0)]]
}

fn experience_units(resume: &ResumeData, style: &StyleTokens) -> Vec<Unit> {
    let units = resume
        .experience
        .iter()
        .filter_map(|exp| {
            let mut unit = Vec::new();
            let title = join_non_empty([exp.role.as_str(), exp.company.as_str()], TITLE_SEPARATOR);
            let dates = format_date_range(&exp.start_date, &exp.end_date, exp.is_current_role);
            let bullets = bullet_lines(&exp.responsibilities);

            if !title.is_empty() {
                unit.push(BlockSpec::new(BlockKind::EntryTitle, title, 0.0));
            }
            if !dates.is_empty() {
                unit.push(BlockSpec::new(BlockKind::EntryMeta, dates, 1.0));
            }
            for bullet in bullets {
                unit.push(BlockSpec::new(BlockKind::Bullet, bullet, INNER_GAP_PX));
            }
            non_empty(unit)
        })
        .collect();
    space_entries(units, style)
}

fn education_units(resume: &ResumeData, style: &StyleTokens) -> Vec<Unit> {
    let units = resume
        .education
        .iter()
        .filter_map(|edu| {
            let mut unit = Vec::new();
            let title = join_non_empty(
                [edu.degree.as_str(), edu.institution.as_str()],
                TITLE_SEPARATOR,
            );
            if !title.is_empty() {
                unit.push(BlockSpec::new(BlockKind::EntryTitle, title, 0.0));
            }
            if !edu.year.trim().is_empty() {
                unit.push(BlockSpec::new(BlockKind::EntryMeta, edu.year.trim(), 1.0));
            }
            for para in split_lines(&edu.description) {
                unit.push(BlockSpec::new(BlockKind::Paragraph, para, INNER_GAP_PX));
            }
            non_empty(unit)
        })
        .collect();
    space_entries(units, style)
}

fn project_units(resume: &ResumeData, style: &StyleTokens) -> Vec<Unit> {
    let units = resume
        .projects
        .iter()
        .filter_map(|project| {
            let mut unit = Vec::new();
            if !project.name.trim().is_empty() {
                unit.push(BlockSpec::new(BlockKind::EntryTitle, project.name.trim(), 0.0));
            }
            for para in split_lines(&project.description) {
                unit.push(BlockSpec::new(BlockKind::Paragraph, para, INNER_GAP_PX));
            }
            let stack = join_non_empty(project.tech_stack.iter().map(String::as_str), ", ");
            if !stack.is_empty() {
                unit.push(BlockSpec::new(
                    BlockKind::EntryMeta,
                    format!("Tech: {stack}"),
                    INNER_GAP_PX,
                ));
            }
            non_empty(unit)
        })
        .collect();
    space_entries(units, style)
}

fn tag_units(tags: &[String], style: &StyleTokens) -> Vec<Unit> {
    let tags: Vec<&str> = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() {
        return Vec::new();
    }

    match style.tag_style {
        TagStyle::Inline { separator } => vec![vec![BlockSpec::new(
            BlockKind::Paragraph,
            tags.join(separator),
            INNER_GAP_PX,
        )]],
        TagStyle::Bullets => tags
            .into_iter()
            .map(|tag| vec![BlockSpec::new(BlockKind::Bullet, tag, INNER_GAP_PX)])
            .collect(),
    }
}

fn non_empty(unit: Unit) -> Option<Unit> {
    (!unit.is_empty()).then_some(unit)
}

/// Spaces entries apart: the first entry hugs the heading, later ones get the entry gap.
fn space_entries(mut units: Vec<Unit>, style: &StyleTokens) -> Vec<Unit> {
    for (i, unit) in units.iter_mut().enumerate() {
        unit[0].gap_before_px = if i == 0 {
            INNER_GAP_PX * 2.0
        } else {
            style.entry_gap_px
        };
    }
    units
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Experience, Project};
    use crate::render::template::TemplateId;

    fn style() -> StyleTokens {
        TemplateId::Classic.descriptor().style
    }

    fn texts(units: &[Unit]) -> Vec<(BlockKind, String)> {
        units
            .iter()
            .flatten()
            .map(|b| (b.kind, b.text.clone()))
            .collect()
    }

    #[test]
    fn test_empty_resume_has_no_units() {
        let resume = ResumeData::default();
        for kind in TemplateId::Classic.descriptor().sections {
            assert!(
                section_units(&resume, *kind, &style()).is_empty(),
                "{kind:?} should be empty"
            );
        }
    }

    #[test]
    fn test_experience_entry_blocks() {
        let mut resume = ResumeData::default();
        resume.experience.push(Experience {
            role: "Engineer".to_string(),
            company: "Acme".to_string(),
            start_date: "2020-01".to_string(),
            end_date: "2023-04".to_string(),
            is_current_role: true,
            responsibilities: vec!["A\n\nB\n".to_string()],
            ..Default::default()
        });
        let units = section_units(&resume, SectionKind::Experience, &style());
        assert_eq!(units.len(), 1);
        assert_eq!(
            texts(&units),
            vec![
                (BlockKind::EntryTitle, "Engineer — Acme".to_string()),
                (BlockKind::EntryMeta, "Jan 2020 - Present".to_string()),
                (BlockKind::Bullet, "A".to_string()),
                (BlockKind::Bullet, "B".to_string()),
            ]
        );
    }

    #[test]
    fn test_blank_experience_record_is_skipped() {
        let mut resume = ResumeData::default();
        resume.experience.push(Experience::default());
        assert!(section_units(&resume, SectionKind::Experience, &style()).is_empty());
    }

    #[test]
    fn test_title_skips_missing_part() {
        let mut resume = ResumeData::default();
        resume.experience.push(Experience {
            company: "Acme".to_string(),
            ..Default::default()
        });
        let units = section_units(&resume, SectionKind::Experience, &style());
        assert_eq!(units[0][0].text, "Acme");
    }

    #[test]
    fn test_later_entries_get_entry_gap() {
        let mut resume = ResumeData::default();
        for name in ["one", "two"] {
            resume.projects.push(Project {
                name: name.to_string(),
                ..Default::default()
            });
        }
        let style = style();
        let units = section_units(&resume, SectionKind::Projects, &style);
        assert_eq!(units.len(), 2);
        assert_eq!(units[1][0].gap_before_px, style.entry_gap_px);
    }

    #[test]
    fn test_project_tech_stack_line() {
        let mut resume = ResumeData::default();
        resume.projects.push(Project {
            name: "tern".to_string(),
            tech_stack: vec!["Rust".to_string(), " ".to_string(), "SQL".to_string()],
            ..Default::default()
        });
        let units = section_units(&resume, SectionKind::Projects, &style());
        assert_eq!(units[0].last().unwrap().text, "Tech: Rust, SQL");
    }

    #[test]
    fn test_tag_styles() {
        let mut resume = ResumeData::default();
        resume.skills = vec!["Rust".to_string(), "Go".to_string()];

        let inline = section_units(&resume, SectionKind::Skills, &style());
        assert_eq!(texts(&inline), vec![(BlockKind::Paragraph, "Rust • Go".to_string())]);

        let bullets_style = TemplateId::Creative.descriptor().style;
        let bullets = section_units(&resume, SectionKind::Skills, &bullets_style);
        assert_eq!(bullets.len(), 2);
        assert!(bullets.iter().flatten().all(|b| b.kind == BlockKind::Bullet));
    }

    #[test]
    fn test_contact_joins_present_fields() {
        let mut resume = ResumeData::default();
        resume.personal_info.email = "a@b.c".to_string();
        resume.personal_info.location = "Oslo".to_string();
        let units = section_units(&resume, SectionKind::Contact, &style());
        assert_eq!(units[0][0].text, "a@b.c | Oslo");
    }
}
