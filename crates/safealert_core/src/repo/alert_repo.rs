//! Alert repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Append alert rows and read alert history.
//! - Encode tagged location/photo results into typed columns.
//!
//! # Invariants
//! - Rows are never updated or deleted through this repository.
//! - A `Fixed` location is only written with finite coordinates.
//! - History listings are newest-first by insertion order (`id DESC`).
//! - Read paths reject rows whose tagged columns are inconsistent.

use crate::db::ensure_schema_ready;
use crate::model::alert::{Alert, AlertId, NewAlert};
use crate::model::capture::{LocationResult, PhotoResult};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const ALERT_SELECT_SQL: &str = "SELECT
    id,
    sender_email,
    message,
    location_kind,
    latitude,
    longitude,
    location_detail,
    timestamp,
    photo_kind,
    photo_path,
    group_id,
    group_name
FROM alerts";

/// Repository interface for the append-only alert log.
pub trait AlertRepository {
    /// Appends one alert row and returns its id.
    fn save_alert(&self, alert: &NewAlert) -> RepoResult<AlertId>;
    /// Loads one alert by id.
    fn get_alert(&self, id: AlertId) -> RepoResult<Option<Alert>>;
    /// Lists every alert, newest first.
    fn list_all_alerts(&self) -> RepoResult<Vec<Alert>>;
    /// Lists alerts sent by `sender_email`, newest first.
    fn list_alerts_for_sender(&self, sender_email: &str) -> RepoResult<Vec<Alert>>;
}

/// SQLite-backed alert repository.
pub struct SqliteAlertRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAlertRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["alerts"])?;
        Ok(Self { conn })
    }

    fn query_alerts(&self, sql: &str, bind: &[&dyn rusqlite::ToSql]) -> RepoResult<Vec<Alert>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut alerts = Vec::new();
        while let Some(row) = rows.next()? {
            alerts.push(parse_alert_row(row)?);
        }
        Ok(alerts)
    }
}

impl AlertRepository for SqliteAlertRepository<'_> {
    fn save_alert(&self, alert: &NewAlert) -> RepoResult<AlertId> {
        let location = LocationColumns::from(&alert.location);
        // SQLite stores NaN as NULL, which would leave an unreadable `fixed` row.
        if location.kind == "fixed"
            && !(location.latitude.is_some_and(f64::is_finite)
                && location.longitude.is_some_and(f64::is_finite))
        {
            return Err(RepoError::InvalidData(
                "fixed location requires finite coordinates".to_string(),
            ));
        }
        let (photo_kind, photo_path) = photo_to_db(&alert.photo);

        self.conn.execute(
            "INSERT INTO alerts (
                sender_email,
                message,
                location_kind,
                latitude,
                longitude,
                location_detail,
                timestamp,
                photo_kind,
                photo_path,
                group_id,
                group_name
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                alert.sender_email.as_str(),
                alert.message.as_str(),
                location.kind,
                location.latitude,
                location.longitude,
                location.detail,
                alert.timestamp.as_str(),
                photo_kind,
                photo_path,
                alert.group_id,
                alert.group_name.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_alert(&self, id: AlertId) -> RepoResult<Option<Alert>> {
        let mut alerts = self.query_alerts(&format!("{ALERT_SELECT_SQL} WHERE id = ?1;"), &[&id])?;
        Ok(alerts.pop())
    }

    fn list_all_alerts(&self) -> RepoResult<Vec<Alert>> {
        self.query_alerts(&format!("{ALERT_SELECT_SQL} ORDER BY id DESC;"), &[])
    }

    fn list_alerts_for_sender(&self, sender_email: &str) -> RepoResult<Vec<Alert>> {
        self.query_alerts(
            &format!(
                "{ALERT_SELECT_SQL}
                 WHERE sender_email = ?1
                 ORDER BY id DESC;"
            ),
            &[&sender_email],
        )
    }
}

struct LocationColumns<'a> {
    kind: &'static str,
    latitude: Option<f64>,
    longitude: Option<f64>,
    detail: Option<&'a str>,
}

impl<'a> From<&'a LocationResult> for LocationColumns<'a> {
    fn from(value: &'a LocationResult) -> Self {
        let (kind, latitude, longitude, detail) = match value {
            LocationResult::Fixed {
                latitude,
                longitude,
            } => ("fixed", Some(*latitude), Some(*longitude), None),
            LocationResult::Denied => ("denied", None, None, None),
            LocationResult::Unavailable => ("unavailable", None, None, None),
            LocationResult::Error { reason } => ("error", None, None, Some(reason.as_str())),
        };
        Self {
            kind,
            latitude,
            longitude,
            detail,
        }
    }
}

fn photo_to_db(photo: &PhotoResult) -> (&'static str, Option<&str>) {
    match photo {
        PhotoResult::Captured { path } => ("captured", Some(path.as_str())),
        PhotoResult::Cancelled => ("cancelled", None),
        PhotoResult::NoCamera => ("no_camera", None),
    }
}

fn parse_alert_row(row: &Row<'_>) -> RepoResult<Alert> {
    let id: AlertId = row.get("id")?;
    let location = parse_location(
        id,
        &row.get::<_, String>("location_kind")?,
        row.get("latitude")?,
        row.get("longitude")?,
        row.get("location_detail")?,
    )?;
    let photo = parse_photo(
        id,
        &row.get::<_, String>("photo_kind")?,
        row.get("photo_path")?,
    )?;

    Ok(Alert {
        id,
        sender_email: row.get("sender_email")?,
        message: row.get("message")?,
        location,
        timestamp: row.get("timestamp")?,
        photo,
        group_id: row.get("group_id")?,
        group_name: row.get("group_name")?,
    })
}

fn parse_location(
    id: AlertId,
    kind: &str,
    latitude: Option<f64>,
    longitude: Option<f64>,
    detail: Option<String>,
) -> RepoResult<LocationResult> {
    match (kind, latitude, longitude) {
        ("fixed", Some(latitude), Some(longitude)) => Ok(LocationResult::Fixed {
            latitude,
            longitude,
        }),
        ("fixed", _, _) => Err(RepoError::InvalidData(format!(
            "alert {id} has location_kind `fixed` without coordinates"
        ))),
        ("denied", _, _) => Ok(LocationResult::Denied),
        ("unavailable", _, _) => Ok(LocationResult::Unavailable),
        ("error", _, _) => Ok(LocationResult::Error {
            reason: detail.unwrap_or_default(),
        }),
        (other, _, _) => Err(RepoError::InvalidData(format!(
            "invalid location kind `{other}` in alerts.location_kind for alert {id}"
        ))),
    }
}

fn parse_photo(id: AlertId, kind: &str, path: Option<String>) -> RepoResult<PhotoResult> {
    match (kind, path) {
        ("captured", Some(path)) => Ok(PhotoResult::Captured { path }),
        ("captured", None) => Err(RepoError::InvalidData(format!(
            "alert {id} has photo_kind `captured` without photo_path"
        ))),
        ("cancelled", _) => Ok(PhotoResult::Cancelled),
        ("no_camera", _) => Ok(PhotoResult::NoCamera),
        (other, _) => Err(RepoError::InvalidData(format!(
            "invalid photo kind `{other}` in alerts.photo_kind for alert {id}"
        ))),
    }
}
