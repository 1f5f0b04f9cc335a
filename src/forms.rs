//! Form validation for submitted request bodies.
//!
//! Each form runs its rules in a fixed order and collects every failure
//! as a [`FieldError`]; an empty list means the form is valid. Checks
//! that consult the store (username/email uniqueness) only run when the
//! field's local checks passed, so a blank field reports "required"
//! rather than a spurious lookup result.

use rusqlite::Connection;
use serde::Deserialize;

use crate::db::users;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn required(errors: &mut Vec<FieldError>, field: &'static str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "This field is required."));
        false
    } else {
        true
    }
}

/// Minimal email shape check: one '@' splitting a non-empty local part
/// from a domain that contains a dot, no whitespace anywhere.
fn email_shape(errors: &mut Vec<FieldError>, field: &'static str, value: &str) -> bool {
    let ok = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };
    if !ok {
        errors.push(FieldError::new(field, "Invalid email address."));
    }
    ok
}

fn equals(errors: &mut Vec<FieldError>, field: &'static str, value: &str, other: &str) -> bool {
    if value != other {
        errors.push(FieldError::new(field, "Field must be equal to password."));
        false
    } else {
        true
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self, conn: &Connection) -> rusqlite::Result<Vec<FieldError>> {
        let mut errors = Vec::new();

        let username_ok = required(&mut errors, "username", &self.username);
        let email_ok = required(&mut errors, "email", &self.email)
            && email_shape(&mut errors, "email", &self.email);
        required(&mut errors, "password", &self.password);
        if required(&mut errors, "confirm_password", &self.confirm_password) {
            equals(
                &mut errors,
                "confirm_password",
                &self.confirm_password,
                &self.password,
            );
        }

        if username_ok && users::username_exists(conn, &self.username)? {
            errors.push(FieldError::new(
                "username",
                "That username is taken. Please choose a different one.",
            ));
        }
        if email_ok && users::email_exists(conn, &self.email)? {
            errors.push(FieldError::new(
                "email",
                "That email is taken. Please choose a different one.",
            ));
        }

        Ok(errors)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

impl LoginForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if required(&mut errors, "email", &self.email) {
            email_shape(&mut errors, "email", &self.email);
        }
        required(&mut errors, "password", &self.password);
        errors
    }
}

#[derive(Debug, Default)]
pub struct UploadForm {
    pub description: String,
    pub keywords: String,
    /// Client-supplied filename; the bytes themselves are not stored.
    pub image: String,
}

impl UploadForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        required(&mut errors, "description", &self.description);
        required(&mut errors, "keywords", &self.keywords);
        required(&mut errors, "image", &self.image);
        errors
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub content: String,
}

impl MessageForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        required(&mut errors, "content", &self.content);
        errors
    }
}
