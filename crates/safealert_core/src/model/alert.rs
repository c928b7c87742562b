//! Emergency alert model.
//!
//! # Invariants
//! - One `Alert` row exists per (trigger event x destination group).
//! - Rows fanned out from one event share message, location, timestamp and photo.
//! - Alerts are append-only.

use crate::model::capture::{LocationResult, PhotoResult};
use crate::model::group::GroupId;
use serde::{Deserialize, Serialize};

/// Storage row id for alerts. Grows with insertion order.
pub type AlertId = i64;

/// Message body used when the caller does not supply one.
pub const DEFAULT_EMERGENCY_MESSAGE: &str = "EMERGENCY! I need help immediately!";

/// `chrono` format of `Alert::timestamp`.
pub const ALERT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Persisted alert as shown in the alert history screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub sender_email: String,
    pub message: String,
    pub location: LocationResult,
    /// Local wall-clock time formatted with `ALERT_TIMESTAMP_FORMAT`.
    pub timestamp: String,
    pub photo: PhotoResult,
    /// `None` once the destination group no longer exists.
    pub group_id: Option<GroupId>,
    /// Group name at send time.
    pub group_name: String,
}

/// Insert model handed to the alert repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    pub sender_email: String,
    pub message: String,
    pub location: LocationResult,
    pub timestamp: String,
    pub photo: PhotoResult,
    pub group_id: Option<GroupId>,
    pub group_name: String,
}

/// Capture snapshot shared by every alert of one fan-out.
#[derive(Debug, Clone, PartialEq)]
pub struct EmergencyAlert {
    pub message: String,
    pub location: LocationResult,
    pub photo: PhotoResult,
}

impl EmergencyAlert {
    /// Builds a snapshot with `DEFAULT_EMERGENCY_MESSAGE`.
    pub fn new(location: LocationResult, photo: PhotoResult) -> Self {
        Self {
            message: DEFAULT_EMERGENCY_MESSAGE.to_string(),
            location,
            photo,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}
