//! Language operations

use crate::error::DbError;
use crate::models::Language;
use crate::repository::Database;

impl Database {
    /// Insert a language if its code is not present yet
    pub async fn upsert_language(&self, code: &str, name: &str, is_active: bool) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO languages (code, name, is_active)
            VALUES (?, ?, ?)
            ON CONFLICT(code) DO UPDATE SET name = excluded.name, is_active = excluded.is_active
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(is_active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// List active languages
    pub async fn active_languages(&self) -> Result<Vec<Language>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, code, name, is_active
            FROM languages
            WHERE is_active = 1
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Language::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Get a language by its code
    pub async fn get_language_by_code(&self, code: &str) -> Result<Option<Language>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, code, name, is_active
            FROM languages
            WHERE code = ?
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Language::try_from(&row).map_err(DbError::from)).transpose()
    }
}
