//! Request DTOs for the users and passengers API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::models::UserType;

/// Shape checks run by handlers before a request reaches the repository.
pub trait Validate {
    /// Returns an error message if validation fails, None if valid.
    fn validate(&self) -> Option<String>;
}

fn check_email(email: &str) -> Option<String> {
    let plausible = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);
    if plausible {
        None
    } else {
        Some(format!("'{}' is not a valid email address", email))
    }
}

/// Request body for `POST /api/users`
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub user_type: UserType,
}

impl Validate for NewUser {
    fn validate(&self) -> Option<String> {
        check_email(&self.email)
    }
}

/// Request body for `PUT`/`PATCH /api/users/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserChanges {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub user_type: Option<UserType>,
}

impl Validate for UserChanges {
    fn validate(&self) -> Option<String> {
        self.email.as_deref().and_then(check_email)
    }
}

/// Request body for `POST /api/passengers`
#[derive(Debug, Clone, Deserialize)]
pub struct NewPassenger {
    /// Id of the owning user
    pub user: i64,
    pub passenger_id: String,
    #[serde(default)]
    pub preferred_payment_method: String,
    #[serde(default)]
    pub home_address: String,
}

impl Validate for NewPassenger {
    fn validate(&self) -> Option<String> {
        if self.passenger_id.trim().is_empty() {
            return Some("passenger_id cannot be empty".to_string());
        }
        None
    }
}

/// Request body for `PUT`/`PATCH /api/passengers/:id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PassengerChanges {
    pub user: Option<i64>,
    pub passenger_id: Option<String>,
    pub preferred_payment_method: Option<String>,
    pub home_address: Option<String>,
}

impl Validate for PassengerChanges {
    fn validate(&self) -> Option<String> {
        match &self.passenger_id {
            Some(id) if id.trim().is_empty() => Some("passenger_id cannot be empty".to_string()),
            _ => None,
        }
    }
}
