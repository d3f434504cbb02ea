//! Client for the institution/classroom registry.
//!
//! One upstream service owns both institutions and classrooms, so a
//! single client covers both entity types.

use async_trait::async_trait;
use serde::Deserialize;

use crate::envelope::fetch_list;
use crate::{non_blank, short_id, ClientError};

/// An institution as reported by the registry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionDto {
    pub id: Option<String>,
    pub institution_id: Option<String>,
    pub name: Option<String>,
    pub institution_name: Option<String>,
    pub code: Option<String>,
    pub institution_information: Option<InstitutionInformation>,
}

/// Nested block used by the newer institution service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionInformation {
    pub institution_name: Option<String>,
    pub code_institution: Option<String>,
}

impl InstitutionDto {
    pub fn effective_id(&self) -> Option<&str> {
        non_blank(self.id.as_deref()).or(non_blank(self.institution_id.as_deref()))
    }

    /// Priority: institutionInformation.institutionName >
    /// institutionName > name > code > truncated id.
    pub fn display_name(&self) -> String {
        if let Some(info) = &self.institution_information {
            if let Some(name) = non_blank(info.institution_name.as_deref()) {
                return name.to_string();
            }
        }

        if let Some(name) = non_blank(self.institution_name.as_deref()) {
            return name.to_string();
        }

        if let Some(name) = non_blank(self.name.as_deref()) {
            return name.to_string();
        }

        if let Some(code) = non_blank(self.code.as_deref()) {
            return code.to_string();
        }

        match self.effective_id() {
            Some(id) => format!("Institución {}", short_id(id)),
            None => "Desconocido".to_string(),
        }
    }
}

/// A classroom as reported by the registry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomDto {
    pub id: Option<String>,
    pub classroom_id: Option<String>,
    pub name: Option<String>,
    pub classroom_name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub institution_id: Option<String>,
    pub institution: Option<InstitutionRef>,
}

/// Institution summary embedded in classroom payloads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionRef {
    pub id: Option<String>,
    pub institution_id: Option<String>,
    pub name: Option<String>,
    pub institution_name: Option<String>,
}

impl ClassroomDto {
    pub fn effective_id(&self) -> Option<&str> {
        non_blank(self.id.as_deref()).or(non_blank(self.classroom_id.as_deref()))
    }

    /// The owning institution id, falling back to the embedded
    /// institution object when the flat field is absent.
    pub fn effective_institution_id(&self) -> Option<&str> {
        if let Some(id) = non_blank(self.institution_id.as_deref()) {
            return Some(id);
        }
        let institution = self.institution.as_ref()?;
        non_blank(institution.institution_id.as_deref()).or(non_blank(institution.id.as_deref()))
    }

    /// Priority: classroomName > name > "Aula {code}" > truncated id.
    pub fn display_name(&self) -> String {
        if let Some(name) = non_blank(self.classroom_name.as_deref()) {
            return name.to_string();
        }

        if let Some(name) = non_blank(self.name.as_deref()) {
            return name.to_string();
        }

        if let Some(code) = non_blank(self.code.as_deref()) {
            return format!("Aula {code}");
        }

        match self.effective_id() {
            Some(id) => format!("Aula {}", short_id(id)),
            None => "Desconocido".to_string(),
        }
    }
}

/// Lookup operations against the institution/classroom registry.
#[async_trait]
pub trait InstitutionDirectory: Send + Sync {
    async fn institution_by_id(
        &self,
        institution_id: &str,
    ) -> Result<Option<InstitutionDto>, ClientError>;

    async fn all_institutions(&self) -> Result<Vec<InstitutionDto>, ClientError>;

    async fn classroom_by_id(
        &self,
        classroom_id: &str,
    ) -> Result<Option<ClassroomDto>, ClientError>;

    async fn all_classrooms(&self) -> Result<Vec<ClassroomDto>, ClientError>;

    async fn classrooms_by_institution(
        &self,
        institution_id: &str,
    ) -> Result<Vec<ClassroomDto>, ClientError>;
}

/// HTTP client for the institution/classroom registry.
pub struct InstitutionClient {
    client: reqwest::Client,
    base_url: String,
}

impl InstitutionClient {
    /// * `base_url` - e.g. `http://localhost:9080`.
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
impl InstitutionDirectory for InstitutionClient {
    async fn institution_by_id(
        &self,
        institution_id: &str,
    ) -> Result<Option<InstitutionDto>, ClientError> {
        let url = format!("{}/api/v1/institutions/{institution_id}", self.base_url);
        let mut institutions: Vec<InstitutionDto> = fetch_list(&self.client, &url).await?;
        if institutions.is_empty() {
            tracing::warn!(institution_id, "No institution data received");
            return Ok(None);
        }
        Ok(Some(institutions.remove(0)))
    }

    async fn all_institutions(&self) -> Result<Vec<InstitutionDto>, ClientError> {
        let url = format!("{}/api/v1/institutions", self.base_url);
        let institutions = fetch_list(&self.client, &url).await?;
        tracing::debug!(count = institutions.len(), "Fetched institutions");
        Ok(institutions)
    }

    async fn classroom_by_id(
        &self,
        classroom_id: &str,
    ) -> Result<Option<ClassroomDto>, ClientError> {
        let url = format!("{}/api/v1/classrooms/{classroom_id}", self.base_url);
        let mut classrooms: Vec<ClassroomDto> = fetch_list(&self.client, &url).await?;
        if classrooms.is_empty() {
            tracing::warn!(classroom_id, "No classroom data received");
            return Ok(None);
        }
        Ok(Some(classrooms.remove(0)))
    }

    async fn all_classrooms(&self) -> Result<Vec<ClassroomDto>, ClientError> {
        let url = format!("{}/api/v1/classrooms", self.base_url);
        let classrooms = fetch_list(&self.client, &url).await?;
        tracing::debug!(count = classrooms.len(), "Fetched classrooms");
        Ok(classrooms)
    }

    async fn classrooms_by_institution(
        &self,
        institution_id: &str,
    ) -> Result<Vec<ClassroomDto>, ClientError> {
        let url = format!(
            "{}/api/v1/classrooms/institution/{institution_id}",
            self.base_url
        );
        match fetch_list(&self.client, &url).await {
            Ok(classrooms) => Ok(classrooms),
            Err(err) => {
                // Same availability trade as the student client: a
                // larger transfer beats a failed filtered endpoint.
                tracing::warn!(
                    error = %err,
                    institution_id,
                    "Classrooms-by-institution endpoint failed, filtering all classrooms"
                );
                let classrooms = self.all_classrooms().await?;
                Ok(classrooms
                    .into_iter()
                    .filter(|c| c.effective_institution_id() == Some(institution_id))
                    .collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn institution_information_wins() {
        let institution = InstitutionDto {
            name: Some("Colegio A".into()),
            institution_name: Some("Colegio B".into()),
            institution_information: Some(InstitutionInformation {
                institution_name: Some("I.E. Valle Grande".into()),
                code_institution: None,
            }),
            ..Default::default()
        };
        assert_eq!(institution.display_name(), "I.E. Valle Grande");
    }

    #[test]
    fn institution_code_is_last_named_fallback() {
        let institution = InstitutionDto {
            code: Some("IE-0042".into()),
            ..Default::default()
        };
        assert_eq!(institution.display_name(), "IE-0042");
    }

    #[test]
    fn institution_truncated_id_fallback() {
        let institution = InstitutionDto {
            institution_id: Some("0123456789".into()),
            ..Default::default()
        };
        assert_eq!(institution.display_name(), "Institución 01234567");
    }

    #[test]
    fn classroom_name_priority() {
        let classroom = ClassroomDto {
            name: Some("Salón 3".into()),
            classroom_name: Some("Tercero A".into()),
            ..Default::default()
        };
        assert_eq!(classroom.display_name(), "Tercero A");
    }

    #[test]
    fn classroom_code_gets_aula_prefix() {
        let classroom = ClassroomDto {
            code: Some("3A".into()),
            ..Default::default()
        };
        assert_eq!(classroom.display_name(), "Aula 3A");
    }

    #[test]
    fn classroom_institution_id_falls_back_to_embedded_object() {
        let classroom = ClassroomDto {
            institution: Some(InstitutionRef {
                id: Some("inst-9".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(classroom.effective_institution_id(), Some("inst-9"));
    }

    #[test]
    fn flat_institution_id_wins_over_embedded() {
        let classroom = ClassroomDto {
            institution_id: Some("inst-1".into()),
            institution: Some(InstitutionRef {
                id: Some("inst-9".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(classroom.effective_institution_id(), Some("inst-1"));
    }
}
