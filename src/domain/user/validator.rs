//! User payload validator

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use super::entity::User;
use super::validation::{
    validate_cpf, validate_email, validate_name, validate_photo_url, validate_role, FieldError,
    UserField, ValidationErrors,
};

/// Errors from validating a raw JSON document
#[derive(Debug, Error)]
pub enum ValidateJsonError {
    #[error("Malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

/// Validates untyped user payloads and produces normalized [`User`] values
///
/// Every field is checked on each call; a payload with several problems
/// reports all of them, in field order.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserValidator;

impl UserValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a decoded payload
    ///
    /// Anything other than a JSON object is treated as an object with no keys.
    /// Keys other than the user fields are ignored.
    pub fn validate(&self, input: &Value) -> Result<User, ValidationErrors> {
        let empty = Map::new();
        let fields = match input {
            Value::Object(map) => map,
            _ => {
                debug!("User payload is not a JSON object");
                &empty
            }
        };
        let get = |field: UserField| fields.get(field.as_str());

        let mut collector = ErrorCollector::default();
        let name = collector.check(validate_name(get(UserField::Name)));
        let email = collector.check(validate_email(get(UserField::Email)));
        let photo_url = collector.check(validate_photo_url(get(UserField::PhotoUrl)));
        let cpf = collector.check(validate_cpf(get(UserField::Cpf)));
        let role = collector.check(validate_role(get(UserField::Role)));

        let (Some(name), Some(email), Some(photo_url), Some(cpf), Some(role)) =
            (name, email, photo_url, cpf, role)
        else {
            let errors = collector.finish();
            debug!(error_count = errors.len(), "User validation failed");
            return Err(errors);
        };

        // An absent role falls back to USER
        let role = role.unwrap_or_default();

        Ok(User::new(name, email, photo_url, cpf, role))
    }

    /// Decode a JSON document and validate it
    pub fn validate_json(&self, raw: &str) -> Result<User, ValidateJsonError> {
        let input: Value = serde_json::from_str(raw)?;
        Ok(self.validate(&input)?)
    }
}

#[derive(Default)]
struct ErrorCollector {
    errors: Vec<FieldError>,
}

impl ErrorCollector {
    fn check<T>(&mut self, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.errors.push(error);
                None
            }
        }
    }

    fn finish(self) -> ValidationErrors {
        ValidationErrors::new(self.errors)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::user::{UserRole, ValidationErrorKind};

    fn kinds(errors: &ValidationErrors) -> Vec<(UserField, ValidationErrorKind)> {
        errors.iter().map(|e| (e.field, e.kind)).collect()
    }

    #[test]
    fn test_normalizes_valid_payload() {
        let input = json!({
            "name": " Alice ",
            "email": " alice@example.com ",
            "cpf": "12345678901"
        });

        let user = UserValidator::new().validate(&input).unwrap();

        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({
                "name": "Alice",
                "email": "alice@example.com",
                "cpf": "12345678901",
                "role": "USER",
                "photo_url": null
            })
        );
    }

    #[test]
    fn test_accumulates_all_errors() {
        let input = json!({ "name": "", "email": "bad", "role": "X" });

        let errors = UserValidator::new().validate(&input).unwrap_err();

        assert_eq!(
            kinds(&errors),
            vec![
                (UserField::Name, ValidationErrorKind::EmptyValue),
                (UserField::Email, ValidationErrorKind::InvalidFormat),
                (UserField::Role, ValidationErrorKind::InvalidEnum),
            ]
        );
        assert_eq!(errors.errors()[0].message, "Name cannot be empty");
        assert_eq!(errors.errors()[1].message, "Invalid email");
    }

    #[test]
    fn test_missing_required_fields() {
        let errors = UserValidator::new().validate(&json!({})).unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.errors()[0].message, "Name is required");
        assert_eq!(errors.errors()[1].message, "Email is required");
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::MissingField));
    }

    #[test]
    fn test_missing_name_only() {
        let input = json!({ "email": "a@example.com" });

        let errors = UserValidator::new().validate(&input).unwrap_err();

        assert_eq!(
            errors.errors(),
            &[FieldError::missing(UserField::Name, "Name is required")]
        );
    }

    #[test]
    fn test_null_name_is_not_missing() {
        let input = json!({ "name": null, "email": "a@example.com" });

        let errors = UserValidator::new().validate(&input).unwrap_err();

        assert_eq!(
            errors.errors(),
            &[FieldError::invalid_format(
                UserField::Name,
                "Expected string, received null"
            )]
        );
    }

    #[test]
    fn test_whitespace_name() {
        let input = json!({ "name": "   ", "email": "a@example.com" });

        let errors = UserValidator::new().validate(&input).unwrap_err();

        assert_eq!(
            errors.errors(),
            &[FieldError::empty(UserField::Name, "Name cannot be empty")]
        );
    }

    #[test]
    fn test_invalid_cpf_and_role() {
        let input = json!({
            "name": "Dan",
            "email": "dan@example.com",
            "cpf": "123",
            "role": "SUPERADMIN"
        });

        let errors = UserValidator::new().validate(&input).unwrap_err();

        assert_eq!(
            kinds(&errors),
            vec![
                (UserField::Cpf, ValidationErrorKind::InvalidLength),
                (UserField::Role, ValidationErrorKind::InvalidEnum),
            ]
        );
        assert_eq!(errors.for_field(UserField::Cpf).count(), 1);
        assert_eq!(errors.for_field(UserField::Name).count(), 0);
    }

    #[test]
    fn test_explicit_role_and_photo() {
        let input = json!({
            "name": "Eve",
            "email": "eve@example.com",
            "photo_url": "  https://example.com/eve.png ",
            "cpf": null,
            "role": "ADMIN"
        });

        let user = UserValidator::new().validate(&input).unwrap();

        assert_eq!(user.photo_url(), Some("https://example.com/eve.png"));
        assert_eq!(user.cpf(), None);
        assert_eq!(user.role(), UserRole::Admin);
    }

    #[test]
    fn test_absent_and_null_optionals_are_equivalent() {
        let absent = json!({ "name": "Fay", "email": "fay@example.com" });
        let null = json!({
            "name": "Fay",
            "email": "fay@example.com",
            "photo_url": null,
            "cpf": null
        });

        let validator = UserValidator::new();
        assert_eq!(validator.validate(&absent), validator.validate(&null));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let validator = UserValidator::new();
        let input = json!({
            "name": "  Gus ",
            "email": "gus@example.com ",
            "photo_url": " p.png",
            "cpf": "98765432100",
            "role": "EMPLOYEE"
        });

        let first = validator.validate(&input).unwrap();
        let second = validator
            .validate(&serde_json::to_value(&first).unwrap())
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let input = json!({
            "name": "Hal",
            "email": "hal@example.com",
            "password": "secret"
        });

        let user = UserValidator::new().validate(&input).unwrap();
        let value = serde_json::to_value(&user).unwrap();

        assert!(value.get("password").is_none());
    }

    #[test]
    fn test_non_object_input() {
        for input in [json!(null), json!("Alice"), json!([1, 2]), json!(7)] {
            let errors = UserValidator::new().validate(&input).unwrap_err();
            assert_eq!(
                kinds(&errors),
                vec![
                    (UserField::Name, ValidationErrorKind::MissingField),
                    (UserField::Email, ValidationErrorKind::MissingField),
                ]
            );
        }
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = json!({ "name": " Ivy ", "email": " ivy@example.com " });
        let before = input.clone();

        UserValidator::new().validate(&input).unwrap();

        assert_eq!(input, before);
    }

    #[test]
    fn test_validate_json() {
        let validator = UserValidator::new();

        let user = validator
            .validate_json(r#"{"name": "Jo", "email": "jo@example.com"}"#)
            .unwrap();
        assert_eq!(user.name(), "Jo");

        assert!(matches!(
            validator.validate_json("{not json"),
            Err(ValidateJsonError::Malformed(_))
        ));

        match validator.validate_json(r#"{"name": "Jo"}"#) {
            Err(ValidateJsonError::Invalid(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[test]
    fn test_validator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<UserValidator>();
        assert_send_sync::<User>();
        assert_send_sync::<ValidationErrors>();
    }
}
