//! UI text dictionary operations

use crate::error::DbError;
use crate::models::UiText;
use crate::repository::Database;

impl Database {
    /// All dictionary entries for one language
    pub async fn ui_texts(&self, language_code: &str) -> Result<Vec<UiText>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT key, language_id, text
            FROM ui_texts
            WHERE language_id = (SELECT id FROM languages WHERE code = ?)
            ORDER BY key
            "#,
        )
        .bind(language_code)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| UiText::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Insert or replace one dictionary entry
    pub async fn upsert_ui_text(
        &self,
        key: &str,
        language_id: i64,
        text: &str,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO ui_texts (key, language_id, text)
            VALUES (?, ?, ?)
            ON CONFLICT(key, language_id) DO UPDATE SET text = excluded.text
            "#,
        )
        .bind(key)
        .bind(language_id)
        .bind(text)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dictionary_round_trip() {
        let db = Database::open_in_memory().await.unwrap();
        db.upsert_language("fr", "Français", true).await.unwrap();
        db.upsert_language("en", "English", true).await.unwrap();
        let fr = db.get_language_by_code("fr").await.unwrap().unwrap();
        let en = db.get_language_by_code("en").await.unwrap().unwrap();

        db.upsert_ui_text("nav.home", fr.id, "Accueil").await.unwrap();
        db.upsert_ui_text("nav.home", en.id, "Home").await.unwrap();
        db.upsert_ui_text("nav.home", fr.id, "Accueil !").await.unwrap();

        let in_fr = db.ui_texts("fr").await.unwrap();
        assert_eq!(in_fr.len(), 1);
        assert_eq!(in_fr[0].text, "Accueil !");

        let in_en = db.ui_texts("en").await.unwrap();
        assert_eq!(in_en[0].text, "Home");
    }
}
