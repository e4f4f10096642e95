//! User domain
//!
//! This module provides the user record, its field validators and the
//! validator that turns untyped payloads into normalized users.

mod entity;
mod validation;
mod validator;

pub use entity::{UnknownRole, User, UserRole};
pub use validation::{
    is_valid_email, validate_cpf, validate_email, validate_name, validate_photo_url,
    validate_role, FieldError, UserField, ValidationErrorKind, ValidationErrors,
};
pub use validator::{UserValidator, ValidateJsonError};
