//! Field-level edit operations emitted by the resume editing surface.
//!
//! Every mutation of a `ResumeData` goes through `ResumeData::apply`, which is
//! where record ids are assigned and the current-role invariant is enforced.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::resume::{
    new_record_id, optional_text_or_list, Education, Experience, PersonalInfo, Project,
    ResumeData,
};

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("{kind} with id '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{0} cannot be blank")]
    BlankTag(&'static str),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoPatch {
    pub full_name: Option<String>,
    pub job_title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePatch {
    pub company: Option<String>,
    pub role: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_current_role: Option<bool>,
    #[serde(default, deserialize_with = "optional_text_or_list")]
    pub responsibilities: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPatch {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub year: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "optional_text_or_list")]
    pub tech_stack: Option<Vec<String>>,
}

/// One edit emitted by a form. Serialized as `{"op": "addSkill", "tag": "Rust"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ResumeEdit {
    UpdatePersonalInfo { patch: PersonalInfoPatch },
    SetSummary { text: String },

    AddExperience { record: Experience },
    UpdateExperience { id: String, patch: ExperiencePatch },
    RemoveExperience { id: String },

    AddEducation { record: Education },
    UpdateEducation { id: String, patch: EducationPatch },
    RemoveEducation { id: String },

    AddProject { record: Project },
    UpdateProject { id: String, patch: ProjectPatch },
    RemoveProject { id: String },

    AddSkill { tag: String },
    RemoveSkill { tag: String },
    AddCertification { tag: String },
    RemoveCertification { tag: String },
    AddLanguage { tag: String },
    RemoveLanguage { tag: String },
}

impl ResumeData {
    /// Applies a single edit in place.
    pub fn apply(&mut self, edit: ResumeEdit) -> Result<(), EditError> {
        match edit {
            ResumeEdit::UpdatePersonalInfo { patch } => {
                patch_personal_info(&mut self.personal_info, patch);
            }
            ResumeEdit::SetSummary { text } => self.summary = text,

            ResumeEdit::AddExperience { mut record } => {
                record.id = new_record_id();
                enforce_current_role(&mut record);
                self.experience.push(record);
            }
            ResumeEdit::UpdateExperience { id, patch } => {
                let record = find_mut(&mut self.experience, &id, |e| &e.id, "experience")?;
                patch_experience(record, patch);
            }
            ResumeEdit::RemoveExperience { id } => {
                remove_by_id(&mut self.experience, &id, |e| &e.id, "experience")?;
            }

            ResumeEdit::AddEducation { mut record } => {
                record.id = new_record_id();
                self.education.push(record);
            }
            ResumeEdit::UpdateEducation { id, patch } => {
                let record = find_mut(&mut self.education, &id, |e| &e.id, "education")?;
                set_if_some(&mut record.degree, patch.degree);
                set_if_some(&mut record.institution, patch.institution);
                set_if_some(&mut record.year, patch.year);
                set_if_some(&mut record.description, patch.description);
            }
            ResumeEdit::RemoveEducation { id } => {
                remove_by_id(&mut self.education, &id, |e| &e.id, "education")?;
            }

            ResumeEdit::AddProject { mut record } => {
                record.id = new_record_id();
                self.projects.push(record);
            }
            ResumeEdit::UpdateProject { id, patch } => {
                let record = find_mut(&mut self.projects, &id, |p| &p.id, "project")?;
                set_if_some(&mut record.name, patch.name);
                set_if_some(&mut record.description, patch.description);
                set_if_some(&mut record.tech_stack, patch.tech_stack);
            }
            ResumeEdit::RemoveProject { id } => {
                remove_by_id(&mut self.projects, &id, |p| &p.id, "project")?;
            }

            ResumeEdit::AddSkill { tag } => add_tag(&mut self.skills, tag, "skill")?,
            ResumeEdit::RemoveSkill { tag } => remove_tag(&mut self.skills, &tag),
            ResumeEdit::AddCertification { tag } => {
                add_tag(&mut self.certifications, tag, "certification")?
            }
            ResumeEdit::RemoveCertification { tag } => remove_tag(&mut self.certifications, &tag),
            ResumeEdit::AddLanguage { tag } => add_tag(&mut self.languages, tag, "language")?,
            ResumeEdit::RemoveLanguage { tag } => remove_tag(&mut self.languages, &tag),
        }
        Ok(())
    }

    /// Applies edits in order, stopping at the first failure.
    pub fn apply_all(
        &mut self,
        edits: impl IntoIterator<Item = ResumeEdit>,
    ) -> Result<(), EditError> {
        edits.into_iter().try_for_each(|edit| self.apply(edit))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn set_if_some<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn patch_personal_info(info: &mut PersonalInfo, patch: PersonalInfoPatch) {
    set_if_some(&mut info.full_name, patch.full_name);
    set_if_some(&mut info.job_title, patch.job_title);
    set_if_some(&mut info.email, patch.email);
    set_if_some(&mut info.phone, patch.phone);
    set_if_some(&mut info.location, patch.location);
    set_if_some(&mut info.linkedin, patch.linkedin);
    set_if_some(&mut info.portfolio, patch.portfolio);
}

fn patch_experience(record: &mut Experience, patch: ExperiencePatch) {
    set_if_some(&mut record.company, patch.company);
    set_if_some(&mut record.role, patch.role);
    set_if_some(&mut record.start_date, patch.start_date);
    set_if_some(&mut record.end_date, patch.end_date);
    set_if_some(&mut record.is_current_role, patch.is_current_role);
    set_if_some(&mut record.responsibilities, patch.responsibilities);
    enforce_current_role(record);
}

/// A current role has no end date.
fn enforce_current_role(record: &mut Experience) {
    if record.is_current_role {
        record.end_date.clear();
    }
}

fn find_mut<'a, T>(
    items: &'a mut [T],
    id: &str,
    id_of: impl Fn(&T) -> &String,
    kind: &'static str,
) -> Result<&'a mut T, EditError> {
    items
        .iter_mut()
        .find(|item| id_of(item) == id)
        .ok_or_else(|| EditError::NotFound {
            kind,
            id: id.to_string(),
        })
}

fn remove_by_id<T>(
    items: &mut Vec<T>,
    id: &str,
    id_of: impl Fn(&T) -> &String,
    kind: &'static str,
) -> Result<(), EditError> {
    let index = items
        .iter()
        .position(|item| id_of(item) == id)
        .ok_or_else(|| EditError::NotFound {
            kind,
            id: id.to_string(),
        })?;
    items.remove(index);
    Ok(())
}

/// Appends a trimmed tag unless an equal one (case-insensitive) is already present.
fn add_tag(tags: &mut Vec<String>, tag: String, kind: &'static str) -> Result<(), EditError> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(EditError::BlankTag(kind));
    }
    let key = tag.to_lowercase();
    let exists = tags.iter().any(|t| t.trim().to_lowercase() == key);
    if !exists {
        tags.push(tag.to_string());
    }
    Ok(())
}

fn remove_tag(tags: &mut Vec<String>, tag: &str) {
    let key = tag.trim().to_lowercase();
    tags.retain(|t| t.trim().to_lowercase() != key);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experience(current: bool, end: &str) -> Experience {
        Experience {
            id: "client-sent".to_string(),
            company: "Acme".to_string(),
            role: "Engineer".to_string(),
            start_date: "2020-01".to_string(),
            end_date: end.to_string(),
            is_current_role: current,
            responsibilities: vec![],
        }
    }

    #[test]
    fn test_add_experience_assigns_fresh_id() {
        let mut resume = ResumeData::default();
        resume
            .apply(ResumeEdit::AddExperience {
                record: experience(false, "2021-01"),
            })
            .unwrap();
        assert_eq!(resume.experience.len(), 1);
        assert_ne!(resume.experience[0].id, "client-sent");
        assert_eq!(resume.experience[0].end_date, "2021-01");
    }

    #[test]
    fn test_current_role_clears_end_date_on_add() {
        let mut resume = ResumeData::default();
        resume
            .apply(ResumeEdit::AddExperience {
                record: experience(true, "2021-01"),
            })
            .unwrap();
        assert!(resume.experience[0].end_date.is_empty());
    }

    #[test]
    fn test_current_role_clears_end_date_on_update() {
        let mut resume = ResumeData::default();
        resume
            .apply(ResumeEdit::AddExperience {
                record: experience(false, "2021-01"),
            })
            .unwrap();
        let id = resume.experience[0].id.clone();

        resume
            .apply(ResumeEdit::UpdateExperience {
                id: id.clone(),
                patch: ExperiencePatch {
                    is_current_role: Some(true),
                    ..Default::default()
                },
            })
            .unwrap();
        assert!(resume.experience[0].end_date.is_empty());

        // Setting an end date on a current role is dropped as well.
        resume
            .apply(ResumeEdit::UpdateExperience {
                id,
                patch: ExperiencePatch {
                    end_date: Some("2022-02".to_string()),
                    ..Default::default()
                },
            })
            .unwrap();
        assert!(resume.experience[0].end_date.is_empty());
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let mut resume = ResumeData::default();
        let err = resume
            .apply(ResumeEdit::RemoveProject {
                id: "nope".to_string(),
            })
            .unwrap_err();
        assert_eq!(
            err,
            EditError::NotFound {
                kind: "project",
                id: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_remove_keeps_order_of_remaining_records() {
        let mut resume = ResumeData::default();
        for name in ["a", "b", "c"] {
            resume
                .apply(ResumeEdit::AddProject {
                    record: Project {
                        name: name.to_string(),
                        ..Default::default()
                    },
                })
                .unwrap();
        }
        let middle = resume.projects[1].id.clone();
        resume
            .apply(ResumeEdit::RemoveProject { id: middle })
            .unwrap();
        let names: Vec<&str> = resume.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_skill_tags_dedup_case_insensitive() {
        let mut resume = ResumeData::default();
        resume
            .apply_all(vec![
                ResumeEdit::AddSkill {
                    tag: "Rust".to_string(),
                },
                ResumeEdit::AddSkill {
                    tag: " rust ".to_string(),
                },
                ResumeEdit::AddSkill {
                    tag: "Go".to_string(),
                },
            ])
            .unwrap();
        assert_eq!(resume.skills, vec!["Rust", "Go"]);

        resume
            .apply(ResumeEdit::RemoveSkill {
                tag: "RUST".to_string(),
            })
            .unwrap();
        assert_eq!(resume.skills, vec!["Go"]);
    }

    #[test]
    fn test_tag_dedup_folds_non_ascii_case() {
        let mut resume = ResumeData::default();
        resume
            .apply_all(vec![
                ResumeEdit::AddLanguage {
                    tag: "Français".to_string(),
                },
                ResumeEdit::AddLanguage {
                    tag: "FRANÇAIS".to_string(),
                },
            ])
            .unwrap();
        assert_eq!(resume.languages, vec!["Français"]);

        resume
            .apply(ResumeEdit::RemoveLanguage {
                tag: "français".to_string(),
            })
            .unwrap();
        assert!(resume.languages.is_empty());
    }

    #[test]
    fn test_blank_tag_rejected() {
        let mut resume = ResumeData::default();
        let err = resume
            .apply(ResumeEdit::AddLanguage {
                tag: "   ".to_string(),
            })
            .unwrap_err();
        assert_eq!(err, EditError::BlankTag("language"));
    }

    #[test]
    fn test_personal_info_patch_is_partial() {
        let mut resume = ResumeData::sample();
        let email = resume.personal_info.email.clone();
        resume
            .apply(ResumeEdit::UpdatePersonalInfo {
                patch: PersonalInfoPatch {
                    full_name: Some("Sam Lee".to_string()),
                    ..Default::default()
                },
            })
            .unwrap();
        assert_eq!(resume.personal_info.full_name, "Sam Lee");
        assert_eq!(resume.personal_info.email, email);
    }

    #[test]
    fn test_edit_wire_format() {
        let edit: ResumeEdit =
            serde_json::from_str(r#"{"op": "addSkill", "tag": "Rust"}"#).unwrap();
        assert!(matches!(edit, ResumeEdit::AddSkill { ref tag } if tag == "Rust"));

        let edit: ResumeEdit = serde_json::from_str(
            r#"{"op": "updateExperience", "id": "abc", "patch": {"isCurrentRole": true}}"#,
        )
        .unwrap();
        assert!(matches!(edit, ResumeEdit::UpdateExperience { .. }));
    }

    #[test]
    fn test_patch_list_fields_accept_text_or_list() {
        let edit: ResumeEdit = serde_json::from_str(
            r#"{"op": "updateExperience", "id": "abc", "patch": {"responsibilities": "A\nB"}}"#,
        )
        .unwrap();
        let ResumeEdit::UpdateExperience { patch, .. } = edit else {
            panic!("expected updateExperience");
        };
        assert_eq!(patch.responsibilities, Some(vec!["A\nB".to_string()]));

        let patch: ProjectPatch = serde_json::from_str(r#"{"techStack": ["Rust", "Go"]}"#).unwrap();
        assert_eq!(patch.tech_stack, Some(vec!["Rust".to_string(), "Go".to_string()]));

        let patch: ProjectPatch = serde_json::from_str(r#"{"techStack": ""}"#).unwrap();
        assert_eq!(patch.tech_stack, Some(vec![]));

        let patch: ProjectPatch = serde_json::from_str(r#"{"name": "Folio"}"#).unwrap();
        assert_eq!(patch.tech_stack, None);
    }
}
