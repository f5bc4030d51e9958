//! Vitrine Persistence Layer
//!
//! SQLite-backed storage for the site: users and roles, languages,
//! localized projects, the personal profile, and the UI text
//! dictionary.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::{
    Language, LocalizedProfile, LocalizedProject, NewProject, NewUser, Project, ProjectStatus,
    ProjectTranslation, Role, TranslationUpsert, UiText, User,
};
pub use repository::Database;
