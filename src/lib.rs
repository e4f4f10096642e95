//! User Validator
//!
//! Validation and normalization of user payloads:
//! - Required, trimmed `name` and `email` with email syntax checks
//! - Optional `photo_url` and `cpf` (exactly 11 characters)
//! - `role` restricted to ADMIN, USER or EMPLOYEE, defaulting to USER
//!
//! Every violated constraint is reported, not only the first one.

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    FieldError, User, UserField, UserRole, UserValidator, ValidateJsonError, ValidationErrorKind,
    ValidationErrors,
};
