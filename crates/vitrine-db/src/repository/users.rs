//! User operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewUser, User};
use crate::repository::Database;

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();

        // Check if user already exists
        let existing = self.get_user_by_email(&user.email).await?;
        if existing.is_some() {
            return Err(DbError::Duplicate(format!("User '{}' already exists", user.email)));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, acctype, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.acctype)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(User {
            id,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            acctype: user.acctype,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, email, password_hash, first_name, last_name, acctype, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, email, password_hash, first_name, last_name, acctype, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all users
    pub async fn list_users(&self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, password_hash, first_name, last_name, acctype, created_at, updated_at
            FROM users
            ORDER BY email
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| User::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Update user role
    pub async fn update_user_role(&self, id: i64, acctype: i64) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET acctype = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(acctype)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update user password
    pub async fn update_user_password(&self, id: i64, password_hash: &str) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(password_hash)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update user name fields
    pub async fn update_user_name(
        &self,
        id: i64,
        first_name: &str,
        last_name: &str,
    ) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET first_name = ?, last_name = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user
    pub async fn delete_user(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check if any users exist
    pub async fn has_users(&self) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> NewUser {
        NewUser {
            email: "jane@example.org".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            acctype: 1,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_user() {
        let db = Database::open_in_memory().await.unwrap();

        assert!(!db.has_users().await.unwrap());

        let user = db.insert_user(sample_user()).await.unwrap();
        assert!(db.has_users().await.unwrap());

        let by_email = db.get_user_by_email("jane@example.org").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.acctype, 1);

        let by_id = db.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "jane@example.org");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = Database::open_in_memory().await.unwrap();

        db.insert_user(sample_user()).await.unwrap();
        let err = db.insert_user(sample_user()).await.unwrap_err();

        assert!(matches!(err, DbError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_update_role_and_password() {
        let db = Database::open_in_memory().await.unwrap();
        let user = db.insert_user(sample_user()).await.unwrap();

        assert!(db.update_user_role(user.id, 2).await.unwrap());
        assert!(db.update_user_password(user.id, "$argon2id$new").await.unwrap());

        let updated = db.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(updated.acctype, 2);
        assert_eq!(updated.password_hash, "$argon2id$new");
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_false() {
        let db = Database::open_in_memory().await.unwrap();

        assert!(!db.delete_user(12345).await.unwrap());
    }
}
