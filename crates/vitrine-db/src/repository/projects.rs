//! Project operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{
    LocalizedProject, NewProject, Project, ProjectStatus, ProjectTranslation, TranslationUpsert,
};
use crate::repository::Database;

impl Database {
    // ==================== Project Operations ====================

    /// List projects joined with translations for one language.
    ///
    /// Projects without a translation row for the language still appear,
    /// with empty translation fields.
    pub async fn list_projects_localized(
        &self,
        language_code: &str,
        status: Option<ProjectStatus>,
    ) -> Result<Vec<LocalizedProject>, DbError> {
        let mut sql = String::from(
            r#"
            SELECT p.id, p.status, p.project_type, p.start_date, p.end_date, p.repo_url,
                   p.created_at, p.updated_at,
                   pt.title, pt.subtitle, pt.description, pt.skills
            FROM projects p
            LEFT JOIN project_translations pt
              ON pt.project_id = p.id
             AND pt.language_id = (SELECT id FROM languages WHERE code = ?)
            "#,
        );
        if status.is_some() {
            sql.push_str(" WHERE p.status = ?");
        }
        sql.push_str(" ORDER BY p.start_date DESC");

        let mut query = sqlx::query(&sql).bind(language_code);
        if let Some(status) = status {
            query = query.bind(status.as_str());
        }

        let rows = query.fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| LocalizedProject::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Get one project joined with its translation for one language
    pub async fn get_project_localized(
        &self,
        id: i64,
        language_code: &str,
    ) -> Result<Option<LocalizedProject>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT p.id, p.status, p.project_type, p.start_date, p.end_date, p.repo_url,
                   p.created_at, p.updated_at,
                   pt.title, pt.subtitle, pt.description, pt.skills
            FROM projects p
            LEFT JOIN project_translations pt
              ON pt.project_id = p.id
             AND pt.language_id = (SELECT id FROM languages WHERE code = ?)
            WHERE p.id = ?
            "#,
        )
        .bind(language_code)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| LocalizedProject::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Get a project's language-independent fields
    pub async fn get_project(&self, id: i64) -> Result<Option<Project>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, status, project_type, start_date, end_date, repo_url, created_at, updated_at
            FROM projects
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Project::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// All translation rows of a project
    pub async fn project_translations(&self, id: i64) -> Result<Vec<ProjectTranslation>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT project_id, language_id, title, subtitle, description, skills
            FROM project_translations
            WHERE project_id = ?
            ORDER BY language_id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| ProjectTranslation::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Insert a project and return its ID
    pub async fn insert_project(&self, project: NewProject) -> Result<i64, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO projects (status, project_type, start_date, end_date, repo_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(project.status.as_str())
        .bind(&project.project_type)
        .bind(&project.start_date)
        .bind(&project.end_date)
        .bind(&project.repo_url)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        Ok(result.get("id"))
    }

    /// Update a project's language-independent fields
    pub async fn update_project(&self, id: i64, project: NewProject) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE projects
            SET status = ?, project_type = ?, start_date = ?, end_date = ?, repo_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(project.status.as_str())
        .bind(&project.project_type)
        .bind(&project.start_date)
        .bind(&project.end_date)
        .bind(&project.repo_url)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert or replace one language's translation of a project
    pub async fn upsert_project_translation(
        &self,
        project_id: i64,
        translation: &TranslationUpsert,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO project_translations (project_id, language_id, title, subtitle, description, skills)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(project_id, language_id) DO UPDATE SET
                title = excluded.title,
                subtitle = excluded.subtitle,
                description = excluded.description,
                skills = excluded.skills
            "#,
        )
        .bind(project_id)
        .bind(translation.language_id)
        .bind(&translation.title)
        .bind(&translation.subtitle)
        .bind(&translation.description)
        .bind(&translation.skills)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Delete a project and its translations
    pub async fn delete_project(&self, id: i64) -> Result<bool, DbError> {
        sqlx::query("DELETE FROM project_translations WHERE project_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
