//! User entity and related types

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::validation::ValidationErrors;
use super::validator::UserValidator;

/// Role assigned to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Full administrative access
    Admin,
    /// Regular user
    #[default]
    User,
    /// Staff member
    Employee,
}

impl UserRole {
    /// Every accepted role, in declaration order
    pub const ALL: [UserRole; 3] = [Self::Admin, Self::User, Self::Employee];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
            Self::Employee => "EMPLOYEE",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a string is not one of the accepted role literals
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown user role: '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownRole;

    /// Matching is exact: "admin" or " ADMIN " are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// A validated, normalized user record
///
/// Values are only produced by [`UserValidator`], so every `User` holds
/// trimmed, non-empty `name` and `email`, a well-formed email address and a
/// `cpf` of exactly 11 characters when one is present. Deserialization runs
/// the same validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct User {
    name: String,
    email: String,
    /// Serialized as `null` when absent
    photo_url: Option<String>,
    /// Brazilian taxpayer number; serialized as `null` when absent
    cpf: Option<String>,
    role: UserRole,
}

impl User {
    pub(super) fn new(
        name: String,
        email: String,
        photo_url: Option<String>,
        cpf: Option<String>,
        role: UserRole,
    ) -> Self {
        Self {
            name,
            email,
            photo_url,
            cpf,
            role,
        }
    }

    // Getters

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }

    pub fn cpf(&self) -> Option<&str> {
        self.cpf.as_deref()
    }

    pub fn role(&self) -> UserRole {
        self.role
    }
}

impl TryFrom<&Value> for User {
    type Error = ValidationErrors;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        UserValidator::new().validate(value)
    }
}

impl TryFrom<Value> for User {
    type Error = ValidationErrors;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::try_from(&value)
    }
}
