//! Client for the student registry.

use async_trait::async_trait;
use serde::Deserialize;

use crate::envelope::fetch_list;
use crate::{non_blank, short_id, ClientError};

/// A student as reported by the registry.
///
/// The registry populates fields inconsistently depending on which
/// upstream system the student was imported from, hence the number of
/// optional name fields and [`StudentDto::display_name`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDto {
    pub id: Option<String>,
    pub student_id: Option<String>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub status: Option<String>,
    pub institution_id: Option<String>,
    pub classroom_id: Option<String>,
    pub personal_info: Option<PersonalInfo>,
}

/// Nested name block used by the newer student service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonalInfo {
    pub names: Option<String>,
    #[serde(rename = "lastNames")]
    pub last_names: Option<String>,
    /// Some payloads spell the key in lowercase.
    #[serde(rename = "lastnames")]
    pub lastnames: Option<String>,
}

impl PersonalInfo {
    fn last_names(&self) -> Option<&str> {
        self.last_names.as_deref().or(self.lastnames.as_deref())
    }
}

impl StudentDto {
    /// The effective identifier: `studentId` takes precedence over `id`.
    pub fn effective_id(&self) -> Option<&str> {
        non_blank(self.student_id.as_deref()).or(non_blank(self.id.as_deref()))
    }

    /// Resolve the display name from the candidate fields.
    ///
    /// Priority: personalInfo names+lastNames > fullName > name >
    /// firstName+lastName > coded fallback on the truncated id. The
    /// order is a business rule; upstream services disagree on which
    /// fields they fill in.
    pub fn display_name(&self) -> String {
        if let Some(info) = &self.personal_info {
            let names = non_blank(info.names.as_deref());
            let last_names = non_blank(info.last_names());
            match (names, last_names) {
                (Some(n), Some(l)) => return format!("{n} {l}"),
                (Some(n), None) => return n.to_string(),
                (None, Some(l)) => return l.to_string(),
                (None, None) => {}
            }
        }

        if let Some(full_name) = non_blank(self.full_name.as_deref()) {
            return full_name.to_string();
        }

        if let Some(name) = non_blank(self.name.as_deref()) {
            return name.to_string();
        }

        let first = non_blank(self.first_name.as_deref());
        let last = non_blank(self.last_name.as_deref());
        match (first, last) {
            (Some(f), Some(l)) => return format!("{f} {l}"),
            (Some(f), None) => return f.to_string(),
            _ => {}
        }

        match self.effective_id() {
            Some(id) => format!("Estudiante {}", short_id(id)),
            None => "Desconocido".to_string(),
        }
    }
}

/// Lookup operations against the student registry.
#[async_trait]
pub trait StudentDirectory: Send + Sync {
    async fn student_by_id(&self, student_id: &str) -> Result<Option<StudentDto>, ClientError>;

    async fn all_students(&self) -> Result<Vec<StudentDto>, ClientError>;

    /// Students enrolled at one institution.
    async fn students_by_institution(
        &self,
        institution_id: &str,
    ) -> Result<Vec<StudentDto>, ClientError>;
}

/// HTTP client for the student registry.
pub struct StudentClient {
    client: reqwest::Client,
    base_url: String,
}

impl StudentClient {
    /// * `base_url` - e.g. `http://localhost:9081`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl StudentDirectory for StudentClient {
    async fn student_by_id(&self, student_id: &str) -> Result<Option<StudentDto>, ClientError> {
        let url = format!("{}/api/v1/students/{student_id}", self.base_url);
        let mut students: Vec<StudentDto> = fetch_list(&self.client, &url).await?;
        if students.is_empty() {
            tracing::warn!(student_id, "No student data received");
            return Ok(None);
        }
        Ok(Some(students.remove(0)))
    }

    async fn all_students(&self) -> Result<Vec<StudentDto>, ClientError> {
        let url = format!("{}/api/v1/students", self.base_url);
        let students = fetch_list(&self.client, &url).await?;
        tracing::debug!(count = students.len(), "Fetched students");
        Ok(students)
    }

    async fn students_by_institution(
        &self,
        institution_id: &str,
    ) -> Result<Vec<StudentDto>, ClientError> {
        let url = format!(
            "{}/api/v1/students/institution/{institution_id}",
            self.base_url
        );
        match fetch_list(&self.client, &url).await {
            Ok(students) => Ok(students),
            Err(err) => {
                // The filtered endpoint is not deployed everywhere; fall
                // back to the full collection and filter locally.
                tracing::warn!(
                    error = %err,
                    institution_id,
                    "Students-by-institution endpoint failed, filtering all students"
                );
                let students = self.all_students().await?;
                Ok(students
                    .into_iter()
                    .filter(|s| s.institution_id.as_deref() == Some(institution_id))
                    .collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personal_info_wins_over_everything() {
        let student = StudentDto {
            full_name: Some("Nombre Completo".into()),
            name: Some("Nombre".into()),
            personal_info: Some(PersonalInfo {
                names: Some("  María  ".into()),
                last_names: Some("Quispe".into()),
                lastnames: None,
            }),
            ..Default::default()
        };
        assert_eq!(student.display_name(), "María Quispe");
    }

    #[test]
    fn lowercase_lastnames_spelling_is_accepted() {
        let student = StudentDto {
            personal_info: Some(PersonalInfo {
                names: Some("José".into()),
                last_names: None,
                lastnames: Some("Huamán".into()),
            }),
            ..Default::default()
        };
        assert_eq!(student.display_name(), "José Huamán");
    }

    #[test]
    fn full_name_beats_name_and_first_last() {
        let student = StudentDto {
            full_name: Some("Ana Torres".into()),
            name: Some("Ana".into()),
            first_name: Some("Ana".into()),
            last_name: Some("Torres".into()),
            ..Default::default()
        };
        assert_eq!(student.display_name(), "Ana Torres");
    }

    #[test]
    fn first_and_last_name_compose() {
        let student = StudentDto {
            first_name: Some("Luis".into()),
            last_name: Some("Rojas".into()),
            ..Default::default()
        };
        assert_eq!(student.display_name(), "Luis Rojas");
    }

    #[test]
    fn falls_back_to_truncated_id() {
        let student = StudentDto {
            student_id: Some("abcdef1234567890".into()),
            ..Default::default()
        };
        assert_eq!(student.display_name(), "Estudiante abcdef12");
    }

    #[test]
    fn no_fields_at_all_is_unknown() {
        let student = StudentDto::default();
        assert_eq!(student.display_name(), "Desconocido");
    }

    #[test]
    fn effective_id_prefers_student_id() {
        let student = StudentDto {
            id: Some("mongo-id".into()),
            student_id: Some("S-001".into()),
            ..Default::default()
        };
        assert_eq!(student.effective_id(), Some("S-001"));
    }

    #[test]
    fn blank_fields_are_skipped() {
        let student = StudentDto {
            full_name: Some("   ".into()),
            name: Some("Carla".into()),
            ..Default::default()
        };
        assert_eq!(student.display_name(), "Carla");
    }
}
