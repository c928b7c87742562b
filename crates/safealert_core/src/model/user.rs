//! User account model.
//!
//! # Invariants
//! - `email` is unique and compared exactly; no case folding.
//! - Password material is only ever carried as an Argon2 PHC hash string.

use crate::model::{require_non_empty, ValidationError};
use serde::{Deserialize, Serialize};

/// Storage row id for users.
pub type UserId = i64;

/// Registered account, without credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Display name shown in the dashboard greeting.
    pub name: String,
    pub email: String,
    /// Free-form phone text. May be empty.
    pub phone: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Raw registration form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl Registration {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            password: password.into(),
        }
    }

    /// Returns a trimmed copy, rejecting empty name, email or password.
    ///
    /// Phone is optional and only trimmed.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require_non_empty("name", &self.name)?,
            email: require_non_empty("email", &self.email)?,
            phone: self.phone.trim().to_string(),
            password: require_non_empty("password", &self.password)?,
        })
    }
}

/// Insert model handed to the user repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::Registration;
    use crate::model::ValidationError;

    #[test]
    fn normalized_trims_and_keeps_email_case() {
        let form = Registration::new(" Ana ", " Ana@X.com ", " 555-1 ", " pw ");
        let normalized = form.normalized().unwrap();
        assert_eq!(normalized.name, "Ana");
        assert_eq!(normalized.email, "Ana@X.com");
        assert_eq!(normalized.phone, "555-1");
        assert_eq!(normalized.password, "pw");
    }

    #[test]
    fn normalized_allows_empty_phone_but_not_empty_password() {
        assert!(Registration::new("Ana", "ana@x.com", "", "pw")
            .normalized()
            .is_ok());
        let err = Registration::new("Ana", "ana@x.com", "", "   ")
            .normalized()
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("password"));
    }
}
