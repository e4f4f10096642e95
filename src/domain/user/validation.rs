//! User validation utilities
//!
//! Each field of a user payload has its own validator taking the raw JSON
//! value (`None` when the key is absent) and returning either the normalized
//! value or a single [`FieldError`]. [`UserValidator`](super::UserValidator)
//! runs all of them and collects the failures into [`ValidationErrors`].

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::entity::UserRole;

pub const NAME_REQUIRED: &str = "Name is required";
pub const NAME_EMPTY: &str = "Name cannot be empty";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_EMPTY: &str = "Email cannot be empty";
pub const EMAIL_INVALID: &str = "Invalid email";
pub const CPF_INVALID_LENGTH: &str = "CPF must be exactly 11 characters";

const CPF_LENGTH: usize = 11;

/// Regex pattern for email addresses; leading and doubled dots are checked separately
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .unwrap()
});

/// Fields of a user payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserField {
    Name,
    Email,
    PhotoUrl,
    Cpf,
    Role,
}

impl UserField {
    /// Key of this field in the input mapping
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::PhotoUrl => "photo_url",
            Self::Cpf => "cpf",
            Self::Role => "role",
        }
    }
}

impl std::fmt::Display for UserField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of constraint a field violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// A required key is absent
    MissingField,
    /// A required value trims to nothing
    EmptyValue,
    /// The value fails a structural check
    InvalidFormat,
    /// The value has the wrong character count
    InvalidLength,
    /// The value is not one of the accepted literals
    InvalidEnum,
}

/// A single violated constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: UserField,
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: UserField, kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }

    pub fn missing(field: UserField, message: impl Into<String>) -> Self {
        Self::new(field, ValidationErrorKind::MissingField, message)
    }

    pub fn empty(field: UserField, message: impl Into<String>) -> Self {
        Self::new(field, ValidationErrorKind::EmptyValue, message)
    }

    pub fn invalid_format(field: UserField, message: impl Into<String>) -> Self {
        Self::new(field, ValidationErrorKind::InvalidFormat, message)
    }

    pub fn invalid_length(field: UserField, message: impl Into<String>) -> Self {
        Self::new(field, ValidationErrorKind::InvalidLength, message)
    }

    pub fn invalid_enum(field: UserField, message: impl Into<String>) -> Self {
        Self::new(field, ValidationErrorKind::InvalidEnum, message)
    }
}

/// All constraint violations found in one payload
///
/// Never empty when returned from validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("Validation failed for {} field(s)", .errors.len())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub(super) fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Errors reported for a single field
    pub fn for_field(&self, field: UserField) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter(move |e| e.field == field)
    }

    /// Messages grouped by field, for rendering one entry per invalid field
    pub fn field_errors(&self) -> BTreeMap<UserField, Vec<String>> {
        let mut grouped: BTreeMap<UserField, Vec<String>> = BTreeMap::new();

        for error in &self.errors {
            grouped
                .entry(error.field)
                .or_default()
                .push(error.message.clone());
        }

        grouped
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Validate and trim the `name` field
///
/// Rules:
/// - Required (an absent key is a missing field)
/// - Must be a string (`null` included)
/// - Cannot be empty after trimming
pub fn validate_name(value: Option<&Value>) -> Result<String, FieldError> {
    required_trimmed(UserField::Name, value, NAME_REQUIRED, NAME_EMPTY)
}

/// Validate and trim the `email` field
///
/// Rules:
/// - Required (an absent key is a missing field)
/// - Must be a string (`null` included)
/// - Cannot be empty after trimming
/// - Must be a syntactically valid email address
pub fn validate_email(value: Option<&Value>) -> Result<String, FieldError> {
    let email = required_trimmed(UserField::Email, value, EMAIL_REQUIRED, EMAIL_EMPTY)?;

    if !is_valid_email(&email) {
        return Err(FieldError::invalid_format(UserField::Email, EMAIL_INVALID));
    }

    Ok(email)
}

/// Trim the optional `photo_url` field; any string is accepted
pub fn validate_photo_url(value: Option<&Value>) -> Result<Option<String>, FieldError> {
    optional_trimmed(UserField::PhotoUrl, value)
}

/// Validate and trim the optional `cpf` field
///
/// Only the length is checked: exactly 11 UTF-16 code units after trimming,
/// so characters outside the Basic Multilingual Plane count twice.
pub fn validate_cpf(value: Option<&Value>) -> Result<Option<String>, FieldError> {
    let Some(cpf) = optional_trimmed(UserField::Cpf, value)? else {
        return Ok(None);
    };

    if cpf.encode_utf16().count() != CPF_LENGTH {
        return Err(FieldError::invalid_length(UserField::Cpf, CPF_INVALID_LENGTH));
    }

    Ok(Some(cpf))
}

/// Validate the `role` field
///
/// Returns `Ok(None)` when the key is absent; the caller substitutes the
/// default role. A present value, `null` included, must be one of the role
/// literals exactly.
pub fn validate_role(value: Option<&Value>) -> Result<Option<UserRole>, FieldError> {
    let Some(value) = value else {
        return Ok(None);
    };

    let received = match value {
        Value::String(s) => match s.parse::<UserRole>() {
            Ok(role) => return Ok(Some(role)),
            Err(_) => format!("'{}'", s),
        },
        other => json_type_name(other).to_string(),
    };

    Err(FieldError::invalid_enum(
        UserField::Role,
        format!(
            "Invalid enum value. Expected {}, received {}",
            expected_roles(),
            received
        ),
    ))
}

/// Check an already-trimmed string against the email grammar
///
/// Local part: letters, digits and `_ ' + - .`, not starting or ending with
/// a dot and without consecutive dots. Domain: dot-separated labels, at
/// least two, ending in an alphabetic label of two or more letters.
pub fn is_valid_email(email: &str) -> bool {
    if email.starts_with('.') || email.contains("..") {
        return false;
    }

    EMAIL_PATTERN.is_match(email)
}

fn required_trimmed(
    field: UserField,
    value: Option<&Value>,
    required_message: &str,
    empty_message: &str,
) -> Result<String, FieldError> {
    let value = match value {
        None => return Err(FieldError::missing(field, required_message)),
        Some(value) => value,
    };

    let trimmed = trim(expect_str(field, value)?);

    if trimmed.is_empty() {
        return Err(FieldError::empty(field, empty_message));
    }

    Ok(trimmed.to_string())
}

fn optional_trimmed(field: UserField, value: Option<&Value>) -> Result<Option<String>, FieldError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(trim(expect_str(field, value)?).to_string())),
    }
}

/// Strip leading and trailing whitespace as ECMAScript `String.prototype.trim`
/// does: U+FEFF is whitespace, U+0085 is not.
fn trim(value: &str) -> &str {
    value.trim_matches(|c: char| c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}'))
}

fn expect_str(field: UserField, value: &Value) -> Result<&str, FieldError> {
    value.as_str().ok_or_else(|| {
        FieldError::invalid_format(
            field,
            format!("Expected string, received {}", json_type_name(value)),
        )
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expected_roles() -> String {
    UserRole::ALL
        .iter()
        .map(|role| format!("'{}'", role))
        .collect::<Vec<_>>()
        .join(" | ")
}
