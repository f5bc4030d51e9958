//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use std::fmt;
use std::str::FromStr;

/// Error type for parsing models from strings
#[derive(Debug, Clone)]
pub struct ParseStatusError(String);

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid project status: {}", self.0)
    }
}

impl std::error::Error for ParseStatusError {}

/// Project lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Current,
    Past,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Current => "current",
            ProjectStatus::Past => "past",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(ProjectStatus::Current),
            "past" => Ok(ProjectStatus::Past),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    /// Role/account-type identifier, resolved through the roles table.
    pub acctype: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub acctype: i64,
}

/// Role with its permission bitmask
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub permissions: i64,
}

/// Site language
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub is_active: bool,
}

/// Project model (language-independent fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub status: ProjectStatus,
    pub project_type: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub repo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New project (for insertion and update)
#[derive(Debug, Clone)]
pub struct NewProject {
    pub status: ProjectStatus,
    pub project_type: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub repo_url: Option<String>,
}

/// Per-language translation row of a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectTranslation {
    pub project_id: i64,
    pub language_id: i64,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub skills: Option<String>,
}

/// Translation fields to upsert for one language
#[derive(Debug, Clone)]
pub struct TranslationUpsert {
    pub language_id: i64,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub skills: Option<String>,
}

/// A project joined with its translation for one language.
///
/// Translation fields are `None` when the language has no translation
/// row yet (LEFT JOIN semantics).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedProject {
    pub id: i64,
    pub status: ProjectStatus,
    pub project_type: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub repo_url: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub skills: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The personal profile joined with its translation for one language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedProfile {
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// A UI text dictionary entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiText {
    pub key: String,
    pub language_id: i64,
    pub text: String,
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            acctype: row.try_get("acctype")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Role {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Role {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            permissions: row.try_get("permissions")?,
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Language {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Language {
            id: row.try_get("id")?,
            code: row.try_get("code")?,
            name: row.try_get("name")?,
            is_active: row.try_get("is_active")?,
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Project {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let status_str: String = row.try_get("status")?;
        Ok(Project {
            id: row.try_get("id")?,
            status: ProjectStatus::from_str(&status_str).unwrap_or(ProjectStatus::Past),
            project_type: row.try_get("project_type")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            repo_url: row.try_get("repo_url")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for ProjectTranslation {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(ProjectTranslation {
            project_id: row.try_get("project_id")?,
            language_id: row.try_get("language_id")?,
            title: row.try_get("title")?,
            subtitle: row.try_get("subtitle")?,
            description: row.try_get("description")?,
            skills: row.try_get("skills")?,
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for LocalizedProject {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let status_str: String = row.try_get("status")?;
        Ok(LocalizedProject {
            id: row.try_get("id")?,
            status: ProjectStatus::from_str(&status_str).unwrap_or(ProjectStatus::Past),
            project_type: row.try_get("project_type")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            repo_url: row.try_get("repo_url")?,
            title: row.try_get("title")?,
            subtitle: row.try_get("subtitle")?,
            description: row.try_get("description")?,
            skills: row.try_get("skills")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for LocalizedProfile {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(LocalizedProfile {
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            location: row.try_get("location")?,
            headline: row.try_get("headline")?,
            bio: row.try_get("bio")?,
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for UiText {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(UiText {
            key: row.try_get("key")?,
            language_id: row.try_get("language_id")?,
            text: row.try_get("text")?,
        })
    }
}
