//! Core domain logic for SafeAlert.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod password;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::alert::{
    Alert, AlertId, EmergencyAlert, NewAlert, ALERT_TIMESTAMP_FORMAT, DEFAULT_EMERGENCY_MESSAGE,
};
pub use model::capture::{
    parse_coordinates, CoordinateParseError, Coordinates, LocationResult, PhotoResult,
};
pub use model::group::{Group, GroupId, MembershipChange};
pub use model::session::Session;
pub use model::user::{NewUser, Registration, User, UserId};
pub use model::ValidationError;
pub use repo::alert_repo::{AlertRepository, SqliteAlertRepository};
pub use repo::group_repo::{GroupRepository, SqliteGroupRepository};
pub use repo::session_repo::{SessionRepository, SqliteSessionRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{ConstraintKind, RepoError, RepoResult};
pub use service::account_service::{AccountService, AccountServiceError};
pub use service::alert_service::{
    AlertService, AlertServiceError, DeliveryFailure, FanOutOutcome, FanOutReport,
};
pub use service::alert_view::{map_target, resolve_photo, MapLinkError, MapTarget, PhotoDisplay};
pub use service::group_service::{GroupService, GroupServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
