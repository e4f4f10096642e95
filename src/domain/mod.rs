//! Domain layer - Core entities and validation

pub mod user;

pub use user::{
    FieldError, User, UserField, UserRole, UserValidator, ValidateJsonError, ValidationErrorKind,
    ValidationErrors,
};
