//! Localized content service
//!
//! Reads and writes the site's projects and personal profile, resolving
//! translation rows per language. Handlers talk to this service, never
//! to the repositories directly.

use std::collections::HashMap;

use tracing::{debug, info};
use vitrine_db::{
    Database, LocalizedProfile, LocalizedProject, NewProject, ProjectStatus, ProjectTranslation,
    TranslationUpsert,
};

use crate::error::CoreError;

/// Translation fields submitted for one language, keyed by code.
#[derive(Debug, Clone)]
pub struct TranslationInput {
    pub language_code: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub skills: Option<String>,
}

/// A project create/update submission.
#[derive(Debug, Clone)]
pub struct ProjectInput {
    pub status: ProjectStatus,
    pub project_type: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub repo_url: Option<String>,
    pub translations: Vec<TranslationInput>,
}

/// A profile update submission.
#[derive(Debug, Clone)]
pub struct ProfileInput {
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    /// (language_code, headline, bio) per language.
    pub translations: Vec<(String, Option<String>, Option<String>)>,
}

/// Content operations over the database.
#[derive(Clone)]
pub struct ContentService {
    db: Database,
}

impl ContentService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // ==================== Public Reads ====================

    pub async fn list_projects(
        &self,
        language_code: &str,
        status: Option<ProjectStatus>,
    ) -> Result<Vec<LocalizedProject>, CoreError> {
        Ok(self.db.list_projects_localized(language_code, status).await?)
    }

    pub async fn project(
        &self,
        id: i64,
        language_code: &str,
    ) -> Result<LocalizedProject, CoreError> {
        self.db
            .get_project_localized(id, language_code)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Project: {}", id)))
    }

    pub async fn project_translations(&self, id: i64) -> Result<Vec<ProjectTranslation>, CoreError> {
        if self.db.get_project(id).await?.is_none() {
            return Err(CoreError::NotFound(format!("Project: {}", id)));
        }
        Ok(self.db.project_translations(id).await?)
    }

    pub async fn profile(&self, language_code: &str) -> Result<LocalizedProfile, CoreError> {
        self.db
            .get_profile_localized(language_code)
            .await?
            .ok_or_else(|| CoreError::NotFound("Profile".to_string()))
    }

    // ==================== Admin Writes ====================

    /// Create a project with its translation rows. Returns the new ID.
    pub async fn create_project(&self, input: ProjectInput) -> Result<i64, CoreError> {
        let id = self
            .db
            .insert_project(NewProject {
                status: input.status,
                project_type: input.project_type,
                start_date: input.start_date,
                end_date: input.end_date,
                repo_url: input.repo_url,
            })
            .await?;

        self.store_translations(id, &input.translations).await?;

        info!(project_id = id, "Created project");
        Ok(id)
    }

    /// Update a project and upsert the submitted translation rows.
    pub async fn update_project(&self, id: i64, input: ProjectInput) -> Result<(), CoreError> {
        let updated = self
            .db
            .update_project(
                id,
                NewProject {
                    status: input.status,
                    project_type: input.project_type,
                    start_date: input.start_date,
                    end_date: input.end_date,
                    repo_url: input.repo_url,
                },
            )
            .await?;
        if !updated {
            return Err(CoreError::NotFound(format!("Project: {}", id)));
        }

        self.store_translations(id, &input.translations).await?;

        info!(project_id = id, "Updated project");
        Ok(())
    }

    pub async fn delete_project(&self, id: i64) -> Result<(), CoreError> {
        if !self.db.delete_project(id).await? {
            return Err(CoreError::NotFound(format!("Project: {}", id)));
        }
        info!(project_id = id, "Deleted project");
        Ok(())
    }

    pub async fn update_profile(&self, input: ProfileInput) -> Result<(), CoreError> {
        self.db
            .update_personal_info(&input.email, input.phone.as_deref(), input.location.as_deref())
            .await?;

        for (code, headline, bio) in &input.translations {
            let language = self.language_id(code).await?;
            self.db
                .upsert_profile_translation(language, headline.as_deref(), bio.as_deref())
                .await?;
        }

        info!("Updated profile");
        Ok(())
    }

    // ==================== UI Texts ====================

    pub async fn ui_texts(&self, language_code: &str) -> Result<HashMap<String, String>, CoreError> {
        let texts = self.db.ui_texts(language_code).await?;
        Ok(texts.into_iter().map(|t| (t.key, t.text)).collect())
    }

    pub async fn set_ui_text(
        &self,
        key: &str,
        language_code: &str,
        text: &str,
    ) -> Result<(), CoreError> {
        let language = self.language_id(language_code).await?;
        self.db.upsert_ui_text(key, language, text).await?;
        debug!(key, language_code, "Stored UI text");
        Ok(())
    }

    // ==================== Helpers ====================

    async fn store_translations(
        &self,
        project_id: i64,
        translations: &[TranslationInput],
    ) -> Result<(), CoreError> {
        for translation in translations {
            let language = self.language_id(&translation.language_code).await?;
            self.db
                .upsert_project_translation(
                    project_id,
                    &TranslationUpsert {
                        language_id: language,
                        title: translation.title.clone(),
                        subtitle: translation.subtitle.clone(),
                        description: translation.description.clone(),
                        skills: translation.skills.clone(),
                    },
                )
                .await?;
        }
        Ok(())
    }

    async fn language_id(&self, code: &str) -> Result<i64, CoreError> {
        self.db
            .get_language_by_code(code)
            .await?
            .map(|l| l.id)
            .ok_or_else(|| CoreError::InvalidInput(format!("Unknown language: {}", code)))
    }
}
