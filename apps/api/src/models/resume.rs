use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Structured form input a resume is generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeInput {
    pub full_name: String,
    pub job_title: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub technologies: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl ProjectEntry {
    /// The project link, treating a blank string as absent.
    pub fn link(&self) -> Option<&str> {
        self.link
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}

/// A resume about to be persisted. Id and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResume {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub input: ResumeInput,
    pub generated_resume: Option<String>,
}

/// A persisted resume record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResume {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub input: ResumeInput,
    pub generated_resume: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update merged into a stored resume. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeUpdate {
    pub input: Option<ResumeInput>,
    pub generated_resume: Option<String>,
}

impl StoredResume {
    pub(crate) fn apply(&mut self, update: ResumeUpdate, now: DateTime<Utc>) {
        if let Some(input) = update.input {
            self.input = input;
        }
        if let Some(generated) = update.generated_resume {
            self.generated_resume = Some(generated);
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub data: Json<ResumeInput>,
    pub generated_resume: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for StoredResume {
    fn from(row: ResumeRow) -> Self {
        StoredResume {
            id: row.id,
            user_id: row.user_id,
            input: row.data.0,
            generated_resume: row.generated_resume,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::sample_input;
    use super::*;

    #[test]
    fn test_input_deserializes_camel_case_with_optional_lists() {
        let json = serde_json::json!({
            "fullName": "Jane Doe",
            "jobTitle": "Engineer",
            "summary": "s",
            "skills": ["Rust"],
            "experience": [{
                "company": "Acme", "position": "Dev",
                "startDate": "2020", "endDate": "2021", "description": "d"
            }]
        });
        let input: ResumeInput = serde_json::from_value(json).unwrap();
        assert_eq!(input.experience[0].start_date, "2020");
        assert!(input.education.is_empty());
        assert!(input.projects.is_empty());
    }

    #[test]
    fn test_blank_project_link_is_absent() {
        let project = ProjectEntry {
            name: "p".to_string(),
            description: "d".to_string(),
            technologies: "t".to_string(),
            link: Some("   ".to_string()),
        };
        assert_eq!(project.link(), None);
    }

    #[test]
    fn test_apply_merges_and_refreshes_timestamp() {
        let created = Utc::now();
        let mut stored = StoredResume {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            input: sample_input(),
            generated_resume: None,
            created_at: created,
            updated_at: created,
        };
        let later = created + chrono::Duration::seconds(5);
        stored.apply(
            ResumeUpdate {
                input: None,
                generated_resume: Some("text".to_string()),
            },
            later,
        );
        assert_eq!(stored.input, sample_input());
        assert_eq!(stored.generated_resume.as_deref(), Some("text"));
        assert_eq!(stored.created_at, created);
        assert_eq!(stored.updated_at, later);
    }
}
