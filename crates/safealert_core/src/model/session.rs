//! Persisted login session.

use serde::{Deserialize, Serialize};

/// Who is signed in on this device.
///
/// Defaults to the logged-out state, which is also what `logout` restores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub is_logged_in: bool,
    pub user_email: Option<String>,
}

impl Session {
    pub fn logged_in(email: impl Into<String>) -> Self {
        Self {
            is_logged_in: true,
            user_email: Some(email.into()),
        }
    }

    /// Returns the signed-in email, if both flags agree.
    pub fn active_email(&self) -> Option<&str> {
        if self.is_logged_in {
            self.user_email.as_deref()
        } else {
            None
        }
    }
}
