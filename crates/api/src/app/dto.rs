//! Request DTOs, validation, and the public-safe user projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wicket_auth::Role;
use wicket_core::{DomainError, UserId};
use wicket_infra::UserRecord;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub contact: Option<String>,
    /// Defaults to sub-admin when omitted.
    #[serde(default)]
    pub role_id: Option<i16>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

// -------------------------
// Safe projection
// -------------------------

/// Public-safe view of a user record.
///
/// An explicit projection rather than a filtered entity: exactly these fields
/// are exposed; `password_hash` and `deleted_at` never leave the service
/// layer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SafeUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub contact: Option<String>,
    pub role_id: i16,
    /// Display label for the role, when the stored id maps into the closed
    /// role set.
    pub role: Option<&'static str>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl SafeUser {
    pub fn from_record(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            email: record.email,
            first_name: record.first_name,
            last_name: record.last_name,
            contact: record.contact,
            role_id: record.role_id,
            role: Role::from_id(record.role_id).map(|r| r.label()),
            is_active: record.is_active,
            created_at: record.created_at,
        }
    }
}

// -------------------------
// Validation
// -------------------------

pub fn validate_registration(req: &RegisterUserRequest) -> Result<(), DomainError> {
    validate_username(&req.username)?;
    validate_name("first_name", &req.first_name)?;
    validate_name("last_name", &req.last_name)?;
    validate_email(&req.email)?;
    validate_password(&req.password, 4)?;
    if let Some(contact) = &req.contact {
        validate_contact(contact)?;
    }
    if let Some(role_id) = req.role_id {
        if Role::from_id(role_id).is_none() {
            return Err(DomainError::validation("unknown role id"));
        }
    }
    Ok(())
}

pub fn validate_update(req: &UpdateUserRequest) -> Result<(), DomainError> {
    if let Some(first_name) = &req.first_name {
        validate_name("first_name", first_name)?;
    }
    if let Some(last_name) = &req.last_name {
        validate_name("last_name", last_name)?;
    }
    if let Some(email) = &req.email {
        validate_email(email)?;
    }
    if let Some(contact) = &req.contact {
        validate_contact(contact)?;
    }
    if let Some(password) = &req.password {
        validate_password(password, 6)?;
    }
    Ok(())
}

fn validate_username(username: &str) -> Result<(), DomainError> {
    if username.trim().is_empty() {
        return Err(DomainError::validation("username cannot be empty"));
    }
    if username.len() > 20 {
        return Err(DomainError::validation("username must be at most 20 characters"));
    }
    Ok(())
}

fn validate_name(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    if value.len() > 20 {
        return Err(DomainError::validation(format!(
            "{field} must be at most 20 characters"
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(DomainError::validation("invalid email format"));
    }
    Ok(())
}

/// Passwords need upper + lower case and a digit or symbol.
fn validate_password(password: &str, min_len: usize) -> Result<(), DomainError> {
    if password.len() < min_len || password.len() > 20 {
        return Err(DomainError::validation(format!(
            "password must be {min_len}-20 characters"
        )));
    }
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit_or_symbol = password.chars().any(|c| !c.is_ascii_alphabetic());
    if !(has_upper && has_lower && has_digit_or_symbol) {
        return Err(DomainError::validation(
            "password must mix upper case, lower case, and a digit or symbol",
        ));
    }
    Ok(())
}

/// Contact numbers are `+91` followed by ten digits (13 characters total).
fn validate_contact(contact: &str) -> Result<(), DomainError> {
    let digits = contact.strip_prefix("+91");
    let valid = contact.chars().count() == 13
        && digits.is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()));
    if !valid {
        return Err(DomainError::validation(
            "contact must be +91 followed by ten digits",
        ));
    }
    Ok(())
}
