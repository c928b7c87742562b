//! Emergency alert fan-out service.
//!
//! # Responsibility
//! - Persist one alert per group owned by the sender.
//! - Report delivery counts so callers can render a status message.
//! - Expose the alert history read paths.
//!
//! # Invariants
//! - The timestamp is captured once per fan-out; all rows share it.
//! - Groups are written sequentially in listing order.
//! - A failed write for one group never stops the remaining writes.
//! - "No groups" is a distinct outcome, not a zero-success delivery.

use crate::model::alert::{Alert, AlertId, EmergencyAlert, NewAlert, ALERT_TIMESTAMP_FORMAT};
use crate::model::{require_non_empty, ValidationError};
use crate::repo::alert_repo::AlertRepository;
use crate::repo::group_repo::GroupRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors that prevent a fan-out from starting or a history read.
#[derive(Debug)]
pub enum AlertServiceError {
    Validation(ValidationError),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for AlertServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AlertServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ValidationError> for AlertServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for AlertServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// One group whose alert row could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub group_name: String,
    pub error: String,
}

/// Per-group write results of one fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanOutReport {
    /// Number of groups a write was attempted for.
    pub attempted: usize,
    pub succeeded: usize,
    /// Shared timestamp of every row written by this fan-out.
    pub timestamp: String,
    /// Ids of the written rows, in group listing order.
    pub alert_ids: Vec<AlertId>,
    pub failures: Vec<DeliveryFailure>,
}

impl FanOutReport {
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.attempted
    }
}

/// Result of one emergency trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FanOutOutcome {
    /// Sender owns no groups; nothing was written.
    NoDestinations,
    /// Writes were attempted for every owned group.
    Delivered(FanOutReport),
}

impl FanOutOutcome {
    /// Number of alert rows written.
    pub fn sent_count(&self) -> usize {
        match self {
            Self::NoDestinations => 0,
            Self::Delivered(report) => report.succeeded,
        }
    }

    /// Short status line for the dashboard.
    pub fn summary_message(&self) -> String {
        match self {
            Self::NoDestinations => "No groups found. Please create groups first.".to_string(),
            Self::Delivered(report) if report.succeeded == 0 => {
                "Failed to send alerts".to_string()
            }
            Self::Delivered(report) => {
                format!("Emergency alert sent to {} group(s)!", report.succeeded)
            }
        }
    }
}

/// Alert service facade over group and alert repositories.
pub struct AlertService<G: GroupRepository, A: AlertRepository> {
    groups: G,
    alerts: A,
}

impl<G: GroupRepository, A: AlertRepository> AlertService<G, A> {
    pub fn new(groups: G, alerts: A) -> Self {
        Self { groups, alerts }
    }

    /// Fans `alert` out to every group of `sender_email`, stamped with the
    /// current local time.
    pub fn send_alert(
        &self,
        sender_email: &str,
        alert: &EmergencyAlert,
    ) -> Result<FanOutOutcome, AlertServiceError> {
        let timestamp = chrono::Local::now()
            .format(ALERT_TIMESTAMP_FORMAT)
            .to_string();
        self.send_alert_at(sender_email, alert, timestamp)
    }

    /// Fans `alert` out using a caller-provided timestamp.
    ///
    /// # Errors
    /// - `Validation` when `sender_email` is blank.
    /// - `Repo` when the sender's groups cannot be listed. Per-group write
    ///   failures are reported in the returned `FanOutReport` instead.
    pub fn send_alert_at(
        &self,
        sender_email: &str,
        alert: &EmergencyAlert,
        timestamp: impl Into<String>,
    ) -> Result<FanOutOutcome, AlertServiceError> {
        let sender_email = require_non_empty("sender email", sender_email)?;
        let groups = self.groups.list_groups(&sender_email)?;
        if groups.is_empty() {
            info!("event=alert_fanout module=alert status=skipped reason=no_groups");
            return Ok(FanOutOutcome::NoDestinations);
        }

        let timestamp = timestamp.into();
        let mut report = FanOutReport {
            attempted: groups.len(),
            succeeded: 0,
            timestamp: timestamp.clone(),
            alert_ids: Vec::with_capacity(groups.len()),
            failures: Vec::new(),
        };
        info!(
            "event=alert_fanout module=alert status=start groups={}",
            report.attempted
        );

        for group in groups {
            let row = NewAlert {
                sender_email: sender_email.clone(),
                message: alert.message.clone(),
                location: alert.location.clone(),
                timestamp: timestamp.clone(),
                photo: alert.photo.clone(),
                group_id: Some(group.id),
                group_name: group.name,
            };
            match self.alerts.save_alert(&row) {
                Ok(alert_id) => {
                    report.succeeded += 1;
                    report.alert_ids.push(alert_id);
                }
                Err(err) => {
                    warn!(
                        "event=alert_save module=alert status=error group_id={} error={}",
                        group.id, err
                    );
                    report.failures.push(DeliveryFailure {
                        group_name: row.group_name,
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            "event=alert_fanout module=alert status=done attempted={} succeeded={}",
            report.attempted, report.succeeded
        );
        Ok(FanOutOutcome::Delivered(report))
    }

    pub fn get_alert(&self, id: AlertId) -> Result<Option<Alert>, AlertServiceError> {
        Ok(self.alerts.get_alert(id)?)
    }

    /// Lists every stored alert, newest first.
    pub fn list_all_alerts(&self) -> Result<Vec<Alert>, AlertServiceError> {
        Ok(self.alerts.list_all_alerts()?)
    }

    pub fn list_alerts_for_sender(
        &self,
        sender_email: &str,
    ) -> Result<Vec<Alert>, AlertServiceError> {
        Ok(self.alerts.list_alerts_for_sender(sender_email)?)
    }
}
