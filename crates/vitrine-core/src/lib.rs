//! Vitrine Core Business Logic
//!
//! Localized content services, language negotiation, and form
//! validation for the site and its back office.

pub mod content;
pub mod error;
pub mod i18n;
pub mod validation;

pub use content::{ContentService, ProfileInput, ProjectInput, TranslationInput};
pub use error::CoreError;
pub use i18n::{LANG_COOKIE, negotiate_language};
pub use validation::{FieldError, FieldValidator};
