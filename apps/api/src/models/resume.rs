use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Length of a generated record id.
const RECORD_ID_LEN: usize = 9;

/// Generates a fresh record id: a random base-36 token (`[0-9a-z]`, 9 chars).
///
/// Ids are assigned once when a list record is created and never reassigned.
pub fn new_record_id() -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut n = Uuid::new_v4().as_u128();
    let mut id = String::with_capacity(RECORD_ID_LEN);
    for _ in 0..RECORD_ID_LEN {
        id.push(DIGITS[(n % 36) as usize] as char);
        n /= 36;
    }
    id
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub job_title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub portfolio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub role: String,
    /// `YYYY-MM`
    pub start_date: String,
    /// `YYYY-MM`; always empty while `is_current_role` is set.
    pub end_date: String,
    pub is_current_role: bool,
    #[serde(deserialize_with = "text_or_list")]
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub id: String,
    pub degree: String,
    pub institution: String,
    pub year: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "text_or_list")]
    pub tech_stack: Vec<String>,
}

/// The resume aggregate. Owns every record; records never reference each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub skills: Vec<String>,
    pub certifications: Vec<String>,
    pub languages: Vec<String>,
}

impl ResumeData {
    /// A filled-in resume used to seed new editing sessions and previews.
    pub fn sample() -> Self {
        ResumeData {
            personal_info: PersonalInfo {
                full_name: "Alex Morgan".to_string(),
                job_title: "Senior Software Engineer".to_string(),
                email: "alex.morgan@example.com".to_string(),
                phone: "+1 (555) 010-2030".to_string(),
                location: "Portland, OR".to_string(),
                linkedin: "linkedin.com/in/alexmorgan".to_string(),
                portfolio: "alexmorgan.dev".to_string(),
            },
            summary: "Backend engineer with eight years of experience building reliable \
                      services, data pipelines and developer tooling. Comfortable owning \
                      systems end to end, from design reviews to on-call."
                .to_string(),
            experience: vec![
                Experience {
                    id: new_record_id(),
                    company: "Northwind Logistics".to_string(),
                    role: "Senior Software Engineer".to_string(),
                    start_date: "2021-03".to_string(),
                    end_date: String::new(),
                    is_current_role: true,
                    responsibilities: vec![
                        "Led the migration of the shipment tracking service to an event-driven architecture".to_string(),
                        "Cut p99 API latency by 45% by introducing a read-through cache".to_string(),
                        "Mentored four engineers through their first production launches".to_string(),
                    ],
                },
                Experience {
                    id: new_record_id(),
                    company: "Brightline Analytics".to_string(),
                    role: "Software Engineer".to_string(),
                    start_date: "2017-06".to_string(),
                    end_date: "2021-02".to_string(),
                    is_current_role: false,
                    responsibilities: vec![
                        "Built ingestion jobs processing 2B events per day".to_string(),
                        "Owned the internal reporting API used by 30 client teams".to_string(),
                    ],
                },
            ],
            education: vec![Education {
                id: new_record_id(),
                degree: "B.S. Computer Science".to_string(),
                institution: "Oregon State University".to_string(),
                year: "2017".to_string(),
                description: "Minor in Mathematics. Teaching assistant for Operating Systems."
                    .to_string(),
            }],
            projects: vec![Project {
                id: new_record_id(),
                name: "tern".to_string(),
                description: "Open-source job scheduler with cron syntax and a web dashboard."
                    .to_string(),
                tech_stack: vec![
                    "Rust".to_string(),
                    "PostgreSQL".to_string(),
                    "TypeScript".to_string(),
                ],
            }],
            skills: vec![
                "Rust".to_string(),
                "Go".to_string(),
                "PostgreSQL".to_string(),
                "Kafka".to_string(),
                "Kubernetes".to_string(),
            ],
            certifications: vec!["AWS Certified Solutions Architect".to_string()],
            languages: vec!["English".to_string(), "Spanish".to_string()],
        }
    }
}

/// A list field as the editor may send it: a JSON array of strings or a single
/// (newline-delimited) string from a text area. The renderer splits lines later.
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrList {
    Text(String),
    List(Vec<String>),
    Null(()),
}

impl From<TextOrList> for Vec<String> {
    fn from(value: TextOrList) -> Self {
        match value {
            TextOrList::Text(text) if text.is_empty() => Vec::new(),
            TextOrList::Text(text) => vec![text],
            TextOrList::List(items) => items,
            TextOrList::Null(()) => Vec::new(),
        }
    }
}

fn text_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    TextOrList::deserialize(deserializer).map(Vec::from)
}

/// Like `text_or_list` for patch fields; absent or null leaves the field untouched.
pub(crate) fn optional_text_or_list<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextOrList>::deserialize(deserializer)?.map(Vec::from))
}
