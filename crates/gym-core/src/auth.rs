// Login gate
//
// There is no credential store: the gate only checks that the credentials are
// well-formed before letting an operator into the console.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationErrors};
use crate::forms::is_valid_email;

pub const MIN_PASSWORD_CHARS: usize = 8;

/// Credentials typed into the login form
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// An operator who passed the login gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();
        if !is_valid_email(&self.email) {
            errors.push("email", "invalid email");
        }
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            errors.push(
                "password",
                format!("password must have at least {MIN_PASSWORD_CHARS} characters"),
            );
        }
        errors.into_result()
    }

    /// Open a session when the credentials are well-formed
    pub fn sign_in(&self, now: DateTime<Utc>) -> Result<Session> {
        self.validate()?;
        tracing::info!(email = %self.email.trim(), "Operator signed in");
        Ok(Session {
            email: self.email.trim().to_string(),
            signed_in_at: now,
        })
    }
}
