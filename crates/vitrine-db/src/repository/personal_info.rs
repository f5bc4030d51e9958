//! Personal profile operations
//!
//! The profile is a single row (id = 1) plus per-language translation
//! rows for the free-text fields.

use chrono::Utc;

use crate::error::DbError;
use crate::models::LocalizedProfile;
use crate::repository::Database;

impl Database {
    /// Get the profile joined with its translation for one language
    pub async fn get_profile_localized(
        &self,
        language_code: &str,
    ) -> Result<Option<LocalizedProfile>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT pi.email, pi.phone, pi.location, pi.updated_at,
                   pit.headline, pit.bio
            FROM personal_info pi
            LEFT JOIN personal_info_translations pit
              ON pit.personal_info_id = pi.id
             AND pit.language_id = (SELECT id FROM languages WHERE code = ?)
            WHERE pi.id = 1
            "#,
        )
        .bind(language_code)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| LocalizedProfile::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Update the profile's language-independent fields
    pub async fn update_personal_info(
        &self,
        email: &str,
        phone: Option<&str>,
        location: Option<&str>,
    ) -> Result<(), DbError> {
        let now = Utc::now();
        sqlx::query(
            r#"
            UPDATE personal_info
            SET email = ?, phone = ?, location = ?, updated_at = ?
            WHERE id = 1
            "#,
        )
        .bind(email)
        .bind(phone)
        .bind(location)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert or replace one language's translation of the profile
    pub async fn upsert_profile_translation(
        &self,
        language_id: i64,
        headline: Option<&str>,
        bio: Option<&str>,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO personal_info_translations (personal_info_id, language_id, headline, bio)
            VALUES (1, ?, ?, ?)
            ON CONFLICT(personal_info_id, language_id) DO UPDATE SET
                headline = excluded.headline,
                bio = excluded.bio
            "#,
        )
        .bind(language_id)
        .bind(headline)
        .bind(bio)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_profile_update_and_localization() {
        let db = Database::open_in_memory().await.unwrap();
        db.upsert_language("fr", "Français", true).await.unwrap();
        db.upsert_language("en", "English", true).await.unwrap();
        let fr = db.get_language_by_code("fr").await.unwrap().unwrap();

        db.update_personal_info("contact@example.org", Some("+33 1 23 45 67 89"), None)
            .await
            .unwrap();
        db.upsert_profile_translation(fr.id, Some("Développeuse"), Some("Bio en français"))
            .await
            .unwrap();

        let in_fr = db.get_profile_localized("fr").await.unwrap().unwrap();
        assert_eq!(in_fr.email, "contact@example.org");
        assert_eq!(in_fr.headline.as_deref(), Some("Développeuse"));

        let in_en = db.get_profile_localized("en").await.unwrap().unwrap();
        assert_eq!(in_en.email, "contact@example.org");
        assert_eq!(in_en.headline, None);
    }
}
