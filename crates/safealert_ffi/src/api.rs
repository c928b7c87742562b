//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose account, group and alert use cases to Dart via FRB.
//! - Convert core errors into `{ ok, message }` envelopes for the UI.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens its own connection to the resolved database path.
//! - Location and photo inputs arrive already resolved; the core never
//!   talks to platform providers.

use log::warn;
use rusqlite::Connection;
use safealert_core::db::open_db;
use safealert_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, map_target,
    ping as ping_inner, resolve_photo, AccountService, Alert, AlertService, EmergencyAlert,
    FanOutOutcome, GroupService, LocationResult, MembershipChange, PhotoDisplay, PhotoResult,
    Registration, SqliteAlertRepository, SqliteGroupRepository, SqliteSessionRepository,
    SqliteUserRepository, User,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "safealert.sqlite3";
const DB_PATH_ENV: &str = "SAFEALERT_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive), or
///   empty for the environment/build default.
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Account summary shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountItem {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Response envelope for account calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountResponse {
    pub ok: bool,
    /// Set on successful register/login, and by `session_current_user`
    /// when someone is signed in.
    pub account: Option<AccountItem>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl AccountResponse {
    fn with_user(message: impl Into<String>, user: User) -> Self {
        Self {
            ok: true,
            account: Some(to_account_item(user)),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            account: None,
            message: message.into(),
        }
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Response envelope for name lists (groups, members).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameListResponse {
    pub ok: bool,
    pub items: Vec<String>,
    pub message: String,
}

/// Location as resolved by the platform provider.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    Fixed { latitude: f64, longitude: f64 },
    Denied,
    Unavailable,
    Error { reason: String },
}

/// Photo as resolved by the platform camera flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoInput {
    Captured { path: String },
    Cancelled,
    NoCamera,
}

/// Result envelope of one emergency trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertSendResponse {
    /// `true` when at least one alert row was written.
    pub ok: bool,
    pub attempted: u32,
    pub sent: u32,
    /// Shared timestamp of the written rows; empty when nothing was attempted.
    pub timestamp: String,
    /// Dashboard status line.
    pub message: String,
}

/// One row of the alert history screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertItem {
    pub alert_id: i64,
    pub sender_email: String,
    pub message: String,
    /// Coordinates or the capture status text.
    pub location_text: String,
    pub has_coordinates: bool,
    pub timestamp: String,
    /// Photo path or the capture status text.
    pub photo_text: String,
    pub has_photo: bool,
    pub group_name: String,
}

/// Alert history envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertListResponse {
    pub ok: bool,
    /// Newest first.
    pub items: Vec<AlertItem>,
    pub message: String,
}

/// Map launch envelope; `uris` are in launch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLinkResponse {
    pub ok: bool,
    pub uris: Vec<String>,
    pub message: String,
}

/// Photo viewer envelope; `path` is set only when the file exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoResponse {
    pub ok: bool,
    pub path: Option<String>,
    pub message: String,
}

/// Registers a new account.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Duplicate email and blank required fields return `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn account_register(
    name: String,
    email: String,
    phone: String,
    password: String,
) -> AccountResponse {
    let form = Registration::new(name, email, phone, password);
    match with_account_service(|service| service.register(&form).map_err(|err| err.to_string())) {
        Ok(user) => AccountResponse::with_user("Registration successful.", user),
        Err(err) => AccountResponse::failure(format!("account_register failed: {err}")),
    }
}

/// Authenticates and persists the signed-in session.
///
/// Unknown email and wrong password return the same failure message.
#[flutter_rust_bridge::frb(sync)]
pub fn account_login(email: String, password: String) -> AccountResponse {
    match with_account_service(|service| {
        service
            .login(&email, &password)
            .map_err(|err| err.to_string())
    }) {
        Ok(user) => AccountResponse::with_user("Login successful.", user),
        Err(err) => AccountResponse::failure(format!("account_login failed: {err}")),
    }
}

/// Clears the persisted session.
#[flutter_rust_bridge::frb(sync)]
pub fn account_logout() -> ActionResponse {
    match with_account_service(|service| service.logout().map_err(|err| err.to_string())) {
        Ok(()) => ActionResponse::success("Logged out."),
        Err(err) => ActionResponse::failure(format!("account_logout failed: {err}")),
    }
}

/// Returns the signed-in account, if any.
///
/// `ok=true` with `account=None` means nobody is signed in.
#[flutter_rust_bridge::frb(sync)]
pub fn session_current_user() -> AccountResponse {
    match with_account_service(|service| service.current_user().map_err(|err| err.to_string())) {
        Ok(Some(user)) => AccountResponse::with_user("Signed in.", user),
        Ok(None) => AccountResponse {
            ok: true,
            account: None,
            message: "Not signed in.".to_string(),
        },
        Err(err) => AccountResponse::failure(format!("session_current_user failed: {err}")),
    }
}

/// Creates a group owned by `owner_email`; the owner becomes its first member.
#[flutter_rust_bridge::frb(sync)]
pub fn group_create(owner_email: String, name: String) -> ActionResponse {
    match with_group_service(|service| {
        service
            .create_group(&owner_email, &name)
            .map_err(|err| err.to_string())
    }) {
        Ok(group) => ActionResponse::success(format!("Group '{}' created.", group.name)),
        Err(err) => ActionResponse::failure(format!("group_create failed: {err}")),
    }
}

/// Adds a contact to a group. Re-adding an existing member succeeds.
#[flutter_rust_bridge::frb(sync)]
pub fn group_add_member(owner_email: String, name: String, contact: String) -> ActionResponse {
    match with_group_service(|service| {
        service
            .add_member(&owner_email, &name, &contact)
            .map_err(|err| err.to_string())
    }) {
        Ok(MembershipChange::Added) => ActionResponse::success("Member added."),
        Ok(MembershipChange::AlreadyMember) => ActionResponse::success("Already a member."),
        Err(err) => ActionResponse::failure(format!("group_add_member failed: {err}")),
    }
}

/// Removes a contact from a group.
#[flutter_rust_bridge::frb(sync)]
pub fn group_remove_member(owner_email: String, name: String, contact: String) -> ActionResponse {
    match with_group_service(|service| {
        service
            .remove_member(&owner_email, &name, &contact)
            .map_err(|err| err.to_string())
    }) {
        Ok(true) => ActionResponse::success("Member removed."),
        Ok(false) => ActionResponse::success("Not a member."),
        Err(err) => ActionResponse::failure(format!("group_remove_member failed: {err}")),
    }
}

/// Lists the group names owned by `owner_email`, in creation order.
#[flutter_rust_bridge::frb(sync)]
pub fn group_list(owner_email: String) -> NameListResponse {
    name_list_response(
        "group_list",
        with_group_service(|service| {
            service
                .list_group_names(&owner_email)
                .map_err(|err| err.to_string())
        }),
    )
}

/// Lists the member contacts of one group, in insertion order.
#[flutter_rust_bridge::frb(sync)]
pub fn group_members(owner_email: String, name: String) -> NameListResponse {
    name_list_response(
        "group_members",
        with_group_service(|service| {
            service
                .list_members(&owner_email, &name)
                .map_err(|err| err.to_string())
        }),
    )
}

/// Fans an emergency alert out to every group owned by `sender_email`.
///
/// A blank `message` falls back to the default emergency text.
///
/// # FFI contract
/// - Sync call, DB-backed execution; one write per group.
/// - Never panics.
/// - `ok=false` when the sender owns no groups or every write failed.
#[flutter_rust_bridge::frb(sync)]
pub fn alert_send(
    sender_email: String,
    message: Option<String>,
    location: LocationInput,
    photo: PhotoInput,
) -> AlertSendResponse {
    let mut alert = EmergencyAlert::new(to_location_result(location), to_photo_result(photo));
    if let Some(text) = message.filter(|text| !text.trim().is_empty()) {
        alert = alert.with_message(text.trim());
    }

    let outcome = with_alert_service(|service| {
        service
            .send_alert(&sender_email, &alert)
            .map_err(|err| err.to_string())
    });

    match outcome {
        Ok(outcome) => {
            let message = outcome.summary_message();
            match outcome {
                FanOutOutcome::NoDestinations => AlertSendResponse {
                    ok: false,
                    attempted: 0,
                    sent: 0,
                    timestamp: String::new(),
                    message,
                },
                FanOutOutcome::Delivered(report) => AlertSendResponse {
                    ok: report.succeeded > 0,
                    attempted: saturating_u32(report.attempted),
                    sent: saturating_u32(report.succeeded),
                    timestamp: report.timestamp,
                    message,
                },
            }
        }
        Err(err) => AlertSendResponse {
            ok: false,
            attempted: 0,
            sent: 0,
            timestamp: String::new(),
            message: format!("alert_send failed: {err}"),
        },
    }
}

/// Lists stored alerts, newest first.
///
/// `sender_email=None` returns every alert on this device.
#[flutter_rust_bridge::frb(sync)]
pub fn alert_list(sender_email: Option<String>) -> AlertListResponse {
    let sender = sender_email
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty());
    let listed = with_alert_service(|service| {
        let alerts = match sender.as_deref() {
            Some(email) => service.list_alerts_for_sender(email),
            None => service.list_all_alerts(),
        };
        alerts.map_err(|err| err.to_string())
    });

    match listed {
        Ok(alerts) => {
            let items = alerts.into_iter().map(to_alert_item).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No alerts found.".to_string()
            } else {
                format!("Found {} alert(s).", items.len())
            };
            AlertListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => AlertListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("alert_list failed: {err}"),
        },
    }
}

/// Builds map launch URIs for one stored alert.
#[flutter_rust_bridge::frb(sync)]
pub fn alert_map_link(alert_id: i64) -> MapLinkResponse {
    let failure = |message: String| MapLinkResponse {
        ok: false,
        uris: Vec::new(),
        message,
    };
    match load_alert(alert_id) {
        Ok(alert) => match map_target(&alert.location) {
            Ok(target) => MapLinkResponse {
                ok: true,
                uris: target
                    .candidates()
                    .iter()
                    .map(|uri| (*uri).to_string())
                    .collect(),
                message: "Opening map...".to_string(),
            },
            Err(err) => failure(err.to_string()),
        },
        Err(err) => failure(format!("alert_map_link failed: {err}")),
    }
}

/// Resolves the photo of one stored alert for the full-screen viewer.
#[flutter_rust_bridge::frb(sync)]
pub fn alert_photo(alert_id: i64) -> PhotoResponse {
    match load_alert(alert_id) {
        Ok(alert) => {
            let display = resolve_photo(&alert.photo);
            let message = display.status_message();
            match display {
                PhotoDisplay::Viewable(path) => PhotoResponse {
                    ok: true,
                    path: Some(path.to_string_lossy().into_owned()),
                    message,
                },
                PhotoDisplay::Missing(_) | PhotoDisplay::NotCaptured(_) => PhotoResponse {
                    ok: false,
                    path: None,
                    message,
                },
            }
        }
        Err(err) => PhotoResponse {
            ok: false,
            path: None,
            message: format!("alert_photo failed: {err}"),
        },
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_connection<T>(f: impl FnOnce(&Connection) -> Result<T, String>) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        warn!("event=ffi_db_open module=ffi status=error error={err}");
        format!("DB open failed: {err}")
    })?;
    f(&conn)
}

fn with_account_service<T>(
    f: impl FnOnce(
        &AccountService<SqliteUserRepository<'_>, SqliteSessionRepository<'_>>,
    ) -> Result<T, String>,
) -> Result<T, String> {
    with_connection(|conn| {
        let users = SqliteUserRepository::try_new(conn)
            .map_err(|err| format!("user repo init failed: {err}"))?;
        let sessions = SqliteSessionRepository::try_new(conn)
            .map_err(|err| format!("session repo init failed: {err}"))?;
        f(&AccountService::new(users, sessions))
    })
}

fn with_group_service<T>(
    f: impl FnOnce(&GroupService<SqliteGroupRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    with_connection(|conn| {
        let groups = SqliteGroupRepository::try_new(conn)
            .map_err(|err| format!("group repo init failed: {err}"))?;
        f(&GroupService::new(groups))
    })
}

fn with_alert_service<T>(
    f: impl FnOnce(
        &AlertService<SqliteGroupRepository<'_>, SqliteAlertRepository<'_>>,
    ) -> Result<T, String>,
) -> Result<T, String> {
    with_connection(|conn| {
        let groups = SqliteGroupRepository::try_new(conn)
            .map_err(|err| format!("group repo init failed: {err}"))?;
        let alerts = SqliteAlertRepository::try_new(conn)
            .map_err(|err| format!("alert repo init failed: {err}"))?;
        f(&AlertService::new(groups, alerts))
    })
}

fn load_alert(alert_id: i64) -> Result<Alert, String> {
    with_alert_service(|service| {
        service
            .get_alert(alert_id)
            .map_err(|err| err.to_string())?
            .ok_or_else(|| format!("alert not found: {alert_id}"))
    })
}

fn name_list_response(operation: &str, listed: Result<Vec<String>, String>) -> NameListResponse {
    match listed {
        Ok(items) => NameListResponse {
            ok: true,
            message: format!("Found {} item(s).", items.len()),
            items,
        },
        Err(err) => NameListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("{operation} failed: {err}"),
        },
    }
}

fn to_account_item(user: User) -> AccountItem {
    AccountItem {
        name: user.name,
        email: user.email,
        phone: user.phone,
    }
}

fn to_location_result(input: LocationInput) -> LocationResult {
    match input {
        LocationInput::Fixed {
            latitude,
            longitude,
        } => LocationResult::from_provider(latitude, longitude),
        LocationInput::Denied => LocationResult::Denied,
        LocationInput::Unavailable => LocationResult::Unavailable,
        LocationInput::Error { reason } => LocationResult::error(reason),
    }
}

fn to_photo_result(input: PhotoInput) -> PhotoResult {
    match input {
        PhotoInput::Captured { path } => PhotoResult::captured(path),
        PhotoInput::Cancelled => PhotoResult::Cancelled,
        PhotoInput::NoCamera => PhotoResult::NoCamera,
    }
}

fn to_alert_item(alert: Alert) -> AlertItem {
    AlertItem {
        alert_id: alert.id,
        has_coordinates: alert.location.is_fixed(),
        location_text: alert.location.to_string(),
        has_photo: alert.photo.path().is_some(),
        photo_text: alert.photo.to_string(),
        sender_email: alert.sender_email,
        message: alert.message,
        timestamp: alert.timestamp,
        group_name: alert.group_name,
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        account_login, account_logout, account_register, alert_list, alert_map_link, alert_photo,
        alert_send, core_version, group_add_member, group_create, group_list, group_members,
        group_remove_member, init_logging, ping, session_current_user, LocationInput, PhotoInput,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn account_register_rejects_duplicate_email() {
        let email = unique_email("dup");
        let first = account_register(
            "Ana".to_string(),
            email.clone(),
            "555".to_string(),
            "pw".to_string(),
        );
        assert!(first.ok, "{}", first.message);
        assert_eq!(first.account.map(|account| account.email), Some(email.clone()));

        let second = account_register(
            "Other".to_string(),
            email,
            String::new(),
            "pw2".to_string(),
        );
        assert!(!second.ok);
        assert!(second.message.contains("already registered"));
    }

    #[test]
    fn account_login_persists_session_until_logout() {
        let email = unique_email("login");
        let registered = account_register(
            "Ana".to_string(),
            email.clone(),
            String::new(),
            "secret".to_string(),
        );
        assert!(registered.ok, "{}", registered.message);

        let wrong = account_login(email.clone(), "nope".to_string());
        assert!(!wrong.ok);
        let unknown = account_login(unique_email("ghost"), "secret".to_string());
        assert!(!unknown.ok);
        assert_eq!(wrong.message, unknown.message);

        let login = account_login(email.clone(), "secret".to_string());
        assert!(login.ok, "{}", login.message);
        let current = session_current_user();
        assert!(current.ok, "{}", current.message);
        assert!(current.account.is_some());

        assert!(account_logout().ok);
        let after = session_current_user();
        assert!(after.ok);
        assert!(after.account.is_none());
    }

    #[test]
    fn group_calls_manage_membership() {
        let owner = registered_owner("groups");
        let created = group_create(owner.clone(), "Family".to_string());
        assert!(created.ok, "{}", created.message);
        let duplicate = group_create(owner.clone(), "Family".to_string());
        assert!(!duplicate.ok);

        let added = group_add_member(owner.clone(), "Family".to_string(), "bob".to_string());
        assert!(added.ok, "{}", added.message);
        let again = group_add_member(owner.clone(), "Family".to_string(), "bob".to_string());
        assert_eq!(again.message, "Already a member.");

        let members = group_members(owner.clone(), "Family".to_string());
        assert_eq!(members.items, vec![owner.clone(), "bob".to_string()]);

        let removed = group_remove_member(owner.clone(), "Family".to_string(), "bob".to_string());
        assert_eq!(removed.message, "Member removed.");
        assert_eq!(group_list(owner.clone()).items, vec!["Family".to_string()]);

        let missing = group_members(owner, "Nope".to_string());
        assert!(!missing.ok);
    }

    #[test]
    fn group_create_rejects_unregistered_owner() {
        let response = group_create(unique_email("nobody"), "Family".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("not registered"));
    }

    #[test]
    fn alert_send_without_groups_reports_no_destinations() {
        let owner = registered_owner("nogroups");
        let response = alert_send(owner, None, LocationInput::Denied, PhotoInput::NoCamera);
        assert!(!response.ok);
        assert_eq!(response.sent, 0);
        assert_eq!(response.message, "No groups found. Please create groups first.");
    }

    #[test]
    fn alert_send_fans_out_and_history_links_to_map() {
        let owner = registered_owner("fanout");
        for name in ["Family", "Friends"] {
            let created = group_create(owner.clone(), name.to_string());
            assert!(created.ok, "{}", created.message);
        }

        let response = alert_send(
            owner.clone(),
            Some("  ".to_string()),
            LocationInput::Fixed {
                latitude: 12.34,
                longitude: 56.78,
            },
            PhotoInput::Cancelled,
        );
        assert!(response.ok, "{}", response.message);
        assert_eq!((response.attempted, response.sent), (2, 2));
        assert_eq!(response.message, "Emergency alert sent to 2 group(s)!");

        let history = alert_list(Some(owner));
        assert!(history.ok, "{}", history.message);
        assert_eq!(history.items.len(), 2);
        assert_eq!(history.items[0].group_name, "Friends");
        assert!(history
            .items
            .iter()
            .all(|item| item.message == "EMERGENCY! I need help immediately!"
                && item.timestamp == response.timestamp
                && item.location_text == "12.34, 56.78"
                && !item.has_photo));

        let map = alert_map_link(history.items[0].alert_id);
        assert!(map.ok, "{}", map.message);
        assert_eq!(
            map.uris[2],
            "https://www.google.com/maps/search/?api=1&query=12.34,56.78"
        );

        let photo = alert_photo(history.items[0].alert_id);
        assert!(!photo.ok);
        assert_eq!(photo.message, "Photo capture cancelled");
    }

    #[test]
    fn alert_send_keeps_history_readable_for_nan_fix() {
        let owner = registered_owner("nan");
        assert!(group_create(owner.clone(), "Family".to_string()).ok);

        let sent = alert_send(
            owner.clone(),
            None,
            LocationInput::Fixed {
                latitude: f64::NAN,
                longitude: 1.0,
            },
            PhotoInput::NoCamera,
        );
        assert!(sent.ok, "{}", sent.message);
        assert_eq!(sent.sent, 1);

        let history = alert_list(Some(owner));
        assert!(history.ok, "{}", history.message);
        assert!(!history.items[0].has_coordinates);
        assert!(history.items[0].location_text.starts_with("Location error"));
    }

    #[test]
    fn alert_map_link_refuses_denied_location() {
        let owner = registered_owner("denied");
        assert!(group_create(owner.clone(), "Family".to_string()).ok);
        let sent = alert_send(
            owner.clone(),
            Some("help".to_string()),
            LocationInput::Denied,
            PhotoInput::NoCamera,
        );
        assert!(sent.ok, "{}", sent.message);

        let history = alert_list(Some(owner));
        let map = alert_map_link(history.items[0].alert_id);
        assert!(!map.ok);
        assert_eq!(map.message, "Location permission denied");
    }

    #[test]
    fn alert_lookups_report_unknown_ids() {
        assert!(!alert_map_link(i64::MAX).ok);
        let photo = alert_photo(i64::MAX);
        assert!(!photo.ok);
        assert!(photo.message.contains("not found"));
    }

    fn registered_owner(prefix: &str) -> String {
        let email = unique_email(prefix);
        let response = account_register(
            "Owner".to_string(),
            email.clone(),
            String::new(),
            "pw".to_string(),
        );
        assert!(response.ok, "{}", response.message);
        email
    }

    fn unique_email(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}@example.test")
    }
}
