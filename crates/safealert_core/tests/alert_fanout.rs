use rusqlite::Connection;
use safealert_core::db::open_db_in_memory;
use safealert_core::{
    AccountService, AccountServiceError, Alert, AlertId, AlertRepository, AlertService,
    EmergencyAlert, FanOutOutcome, GroupService, LocationResult, NewAlert, PhotoResult,
    Registration, RepoError, RepoResult, SqliteAlertRepository, SqliteGroupRepository,
    SqliteSessionRepository, SqliteUserRepository, DEFAULT_EMERGENCY_MESSAGE,
};

const TIMESTAMP: &str = "2024-05-01 10:00:00";

fn setup_owner(conn: &Connection, email: &str, groups: &[&str]) {
    AccountService::new(
        SqliteUserRepository::try_new(conn).unwrap(),
        SqliteSessionRepository::try_new(conn).unwrap(),
    )
    .register(&Registration::new("Ana", email, "", "pw"))
    .unwrap();
    let service = GroupService::new(SqliteGroupRepository::try_new(conn).unwrap());
    for name in groups {
        service.create_group(email, name).unwrap();
    }
}

fn service(
    conn: &Connection,
) -> AlertService<SqliteGroupRepository<'_>, SqliteAlertRepository<'_>> {
    AlertService::new(
        SqliteGroupRepository::try_new(conn).unwrap(),
        SqliteAlertRepository::try_new(conn).unwrap(),
    )
}

fn snapshot() -> EmergencyAlert {
    EmergencyAlert::new(
        LocationResult::fixed(12.34, 56.78),
        PhotoResult::captured("/photos/ALERT_1.jpg"),
    )
}

/// Fails every write addressed to one group name.
struct FlakyAlertRepository<'conn> {
    inner: SqliteAlertRepository<'conn>,
    failing_group: &'static str,
}

impl AlertRepository for FlakyAlertRepository<'_> {
    fn save_alert(&self, alert: &NewAlert) -> RepoResult<AlertId> {
        if alert.group_name == self.failing_group {
            return Err(RepoError::InvalidData("disk full".to_string()));
        }
        self.inner.save_alert(alert)
    }

    fn get_alert(&self, id: AlertId) -> RepoResult<Option<Alert>> {
        self.inner.get_alert(id)
    }

    fn list_all_alerts(&self) -> RepoResult<Vec<Alert>> {
        self.inner.list_all_alerts()
    }

    fn list_alerts_for_sender(&self, sender_email: &str) -> RepoResult<Vec<Alert>> {
        self.inner.list_alerts_for_sender(sender_email)
    }
}

#[test]
fn fan_out_writes_one_row_per_group_with_shared_fields() {
    let conn = open_db_in_memory().unwrap();
    setup_owner(&conn, "a@x.com", &["Family", "Friends", "Work"]);
    let alerts = service(&conn);

    let outcome = alerts
        .send_alert_at("a@x.com", &snapshot(), TIMESTAMP)
        .unwrap();
    let FanOutOutcome::Delivered(report) = &outcome else {
        panic!("expected delivery, got {outcome:?}");
    };
    assert_eq!((report.attempted, report.succeeded), (3, 3));
    assert!(report.all_succeeded());
    assert_eq!(outcome.summary_message(), "Emergency alert sent to 3 group(s)!");

    let stored = alerts.list_alerts_for_sender("a@x.com").unwrap();
    assert_eq!(stored.len(), 3);
    for alert in &stored {
        assert_eq!(alert.message, DEFAULT_EMERGENCY_MESSAGE);
        assert_eq!(alert.location, LocationResult::fixed(12.34, 56.78));
        assert_eq!(alert.photo, PhotoResult::captured("/photos/ALERT_1.jpg"));
        assert_eq!(alert.timestamp, TIMESTAMP);
        assert!(alert.group_id.is_some());
    }
    let mut names = stored
        .iter()
        .map(|alert| alert.group_name.as_str())
        .collect::<Vec<_>>();
    names.sort_unstable();
    assert_eq!(names, vec!["Family", "Friends", "Work"]);
}

#[test]
fn fan_out_without_groups_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    setup_owner(&conn, "a@x.com", &[]);
    let alerts = service(&conn);

    let outcome = alerts.send_alert("a@x.com", &snapshot()).unwrap();
    assert_eq!(outcome, FanOutOutcome::NoDestinations);
    assert_eq!(outcome.sent_count(), 0);
    assert_eq!(
        outcome.summary_message(),
        "No groups found. Please create groups first."
    );
    assert!(alerts.list_all_alerts().unwrap().is_empty());
}

#[test]
fn failed_write_does_not_stop_remaining_groups() {
    let conn = open_db_in_memory().unwrap();
    setup_owner(&conn, "a@x.com", &["Family", "Broken", "Work"]);
    let alerts = AlertService::new(
        SqliteGroupRepository::try_new(&conn).unwrap(),
        FlakyAlertRepository {
            inner: SqliteAlertRepository::try_new(&conn).unwrap(),
            failing_group: "Broken",
        },
    );

    let outcome = alerts
        .send_alert_at("a@x.com", &snapshot(), TIMESTAMP)
        .unwrap();
    let FanOutOutcome::Delivered(report) = &outcome else {
        panic!("expected delivery, got {outcome:?}");
    };
    assert_eq!((report.attempted, report.succeeded), (3, 2));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].group_name, "Broken");
    assert_eq!(outcome.summary_message(), "Emergency alert sent to 2 group(s)!");

    let names = alerts
        .list_all_alerts()
        .unwrap()
        .into_iter()
        .map(|alert| alert.group_name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Work".to_string(), "Family".to_string()]);
}

#[test]
fn every_write_failing_reports_failure_message() {
    let conn = open_db_in_memory().unwrap();
    setup_owner(&conn, "a@x.com", &["Broken"]);
    let alerts = AlertService::new(
        SqliteGroupRepository::try_new(&conn).unwrap(),
        FlakyAlertRepository {
            inner: SqliteAlertRepository::try_new(&conn).unwrap(),
            failing_group: "Broken",
        },
    );

    let outcome = alerts.send_alert("a@x.com", &snapshot()).unwrap();
    assert_eq!(outcome.sent_count(), 0);
    assert_eq!(outcome.summary_message(), "Failed to send alerts");
}

#[test]
fn failed_captures_are_stored_as_status_variants() {
    let conn = open_db_in_memory().unwrap();
    setup_owner(&conn, "a@x.com", &["Family"]);
    let alerts = service(&conn);

    let snapshot = EmergencyAlert::new(LocationResult::error("timeout"), PhotoResult::NoCamera)
        .with_message("Car broke down");
    alerts.send_alert("a@x.com", &snapshot).unwrap();

    let stored = alerts.list_alerts_for_sender("a@x.com").unwrap().remove(0);
    assert_eq!(stored.message, "Car broke down");
    assert_eq!(stored.location, LocationResult::error("timeout"));
    assert_eq!(stored.location.to_string(), "Location error: timeout");
    assert_eq!(stored.photo, PhotoResult::NoCamera);
}

#[test]
fn history_is_newest_first() {
    let conn = open_db_in_memory().unwrap();
    setup_owner(&conn, "a@x.com", &["Family"]);
    let alerts = service(&conn);

    for (message, timestamp) in [
        ("first", "2024-05-01 10:00:00"),
        ("second", "2024-05-01 10:05:00"),
        ("third", "2024-05-01 10:10:00"),
    ] {
        let snapshot = EmergencyAlert::new(LocationResult::Denied, PhotoResult::Cancelled)
            .with_message(message);
        alerts.send_alert_at("a@x.com", &snapshot, timestamp).unwrap();
    }

    let messages = alerts
        .list_all_alerts()
        .unwrap()
        .into_iter()
        .map(|alert| alert.message)
        .collect::<Vec<_>>();
    assert_eq!(messages, vec!["third", "second", "first"]);
}

#[test]
fn live_timestamp_uses_alert_format() {
    let conn = open_db_in_memory().unwrap();
    setup_owner(&conn, "a@x.com", &["Family"]);
    let alerts = service(&conn);

    alerts.send_alert("a@x.com", &snapshot()).unwrap();
    let stored = alerts.list_all_alerts().unwrap().remove(0);
    assert!(chrono::NaiveDateTime::parse_from_str(
        &stored.timestamp,
        safealert_core::ALERT_TIMESTAMP_FORMAT
    )
    .is_ok());
}

#[test]
fn deleted_group_keeps_alert_history() {
    let conn = open_db_in_memory().unwrap();
    setup_owner(&conn, "a@x.com", &["Family"]);
    let alerts = service(&conn);
    alerts
        .send_alert_at("a@x.com", &snapshot(), TIMESTAMP)
        .unwrap();

    conn.execute("DELETE FROM contact_groups;", []).unwrap();

    let stored = alerts.list_all_alerts().unwrap().remove(0);
    assert_eq!(stored.group_id, None);
    assert_eq!(stored.group_name, "Family");
}

#[test]
fn non_finite_fix_is_rejected_without_breaking_history() {
    let conn = open_db_in_memory().unwrap();
    setup_owner(&conn, "a@x.com", &["Family"]);
    let alerts = service(&conn);

    let first = EmergencyAlert::new(LocationResult::Denied, PhotoResult::NoCamera);
    assert_eq!(alerts.send_alert("a@x.com", &first).unwrap().sent_count(), 1);

    let corrupt = EmergencyAlert::new(LocationResult::fixed(f64::NAN, 1.0), PhotoResult::NoCamera);
    let outcome = alerts.send_alert("a@x.com", &corrupt).unwrap();
    let FanOutOutcome::Delivered(report) = &outcome else {
        panic!("expected delivery attempt, got {outcome:?}");
    };
    assert_eq!((report.attempted, report.succeeded), (1, 0));
    assert_eq!(report.failures[0].group_name, "Family");
    assert_eq!(outcome.summary_message(), "Failed to send alerts");

    let history = alerts.list_all_alerts().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].location, LocationResult::Denied);
}

#[test]
fn schema_rejects_fixed_row_without_coordinates() {
    let conn = open_db_in_memory().unwrap();

    let err = conn
        .execute(
            "INSERT INTO alerts (
                sender_email, message, location_kind, timestamp, photo_kind, group_name
             ) VALUES ('a@x.com', 'help', 'fixed', '2024-05-01 10:00:00', 'no_camera', 'Family');",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("CHECK"));
}

#[test]
fn end_to_end_emergency_flow() {
    let conn = open_db_in_memory().unwrap();
    let accounts = AccountService::new(
        SqliteUserRepository::try_new(&conn).unwrap(),
        SqliteSessionRepository::try_new(&conn).unwrap(),
    );
    let groups = GroupService::new(SqliteGroupRepository::try_new(&conn).unwrap());
    let alerts = service(&conn);

    accounts
        .register(&Registration::new("Ana", "ana@x.com", "555-1", "pw"))
        .unwrap();
    let ana = accounts.login("ana@x.com", "pw").unwrap();
    assert_eq!(ana.phone, "555-1");
    assert_eq!(accounts.current_user().unwrap(), Some(ana.clone()));
    assert!(matches!(
        accounts.login("ana@x.com", "wrongpw").unwrap_err(),
        AccountServiceError::InvalidCredentials
    ));

    groups.create_group("ana@x.com", "Family").unwrap();
    assert_eq!(
        groups.list_members("ana@x.com", "Family").unwrap(),
        vec!["ana@x.com".to_string()]
    );
    groups.add_member("ana@x.com", "Family", "bob@x.com").unwrap();
    assert_eq!(
        groups.list_members("ana@x.com", "Family").unwrap(),
        vec!["ana@x.com".to_string(), "bob@x.com".to_string()]
    );

    let snapshot = EmergencyAlert::new(
        LocationResult::from_legacy("12.34, 56.78"),
        PhotoResult::from_legacy("/tmp/p.jpg"),
    );
    let outcome = alerts.send_alert("ana@x.com", &snapshot).unwrap();
    assert_eq!(outcome.sent_count(), 1);

    let history = alerts.list_all_alerts().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].group_name, "Family");
    assert_eq!(history[0].location, LocationResult::fixed(12.34, 56.78));
    assert_eq!(history[0].location.to_string(), "12.34, 56.78");
    assert_eq!(history[0].photo, PhotoResult::captured("/tmp/p.jpg"));
    let target = safealert_core::map_target(&history[0].location).unwrap();
    assert_eq!(target.generic_uri, "geo:12.34,56.78?q=12.34,56.78");

    accounts.logout().unwrap();
    assert!(accounts.current_user().unwrap().is_none());
}
