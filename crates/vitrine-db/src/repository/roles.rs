//! Role operations

use sqlx::Row;

use crate::error::DbError;
use crate::models::Role;
use crate::repository::Database;

impl Database {
    /// Insert or replace a role definition
    pub async fn upsert_role(&self, id: i64, name: &str, permissions: i64) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO roles (id, name, permissions)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET name = excluded.name, permissions = excluded.permissions
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(permissions)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get a role by ID
    pub async fn get_role(&self, id: i64) -> Result<Option<Role>, DbError> {
        let result = sqlx::query("SELECT id, name, permissions FROM roles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| Role::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all roles
    pub async fn list_roles(&self) -> Result<Vec<Role>, DbError> {
        let rows = sqlx::query("SELECT id, name, permissions FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| Role::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Check if any roles exist
    pub async fn has_roles(&self) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM roles")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_and_fetch_role() {
        let db = Database::open_in_memory().await.unwrap();

        db.upsert_role(1, "Admin", 63).await.unwrap();
        db.upsert_role(2, "Editor", 27).await.unwrap();

        let admin = db.get_role(1).await.unwrap().unwrap();
        assert_eq!(admin.name, "Admin");
        assert_eq!(admin.permissions, 63);

        // Upsert overwrites in place.
        db.upsert_role(1, "Admin", 31).await.unwrap();
        let admin = db.get_role(1).await.unwrap().unwrap();
        assert_eq!(admin.permissions, 31);

        assert_eq!(db.list_roles().await.unwrap().len(), 2);
        assert!(db.get_role(99).await.unwrap().is_none());
    }
}
