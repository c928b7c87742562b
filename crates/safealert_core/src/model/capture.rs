//! Resolved results of the platform location and camera collaborators.
//!
//! # Responsibility
//! - Carry capture outcomes as tagged values instead of sentinel strings.
//! - Render the user-facing status text for each outcome.
//! - Map legacy free-text values into tagged values for imports.
//! - Parse `"lat, lng"` text into validated coordinates.
//!
//! # Invariants
//! - A failed capture is a variant, never an error; alerts are still sent.
//! - `Fixed` is the only location variant that carries coordinates.
//! - `Captured` is the only photo variant that carries a path.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const LOCATION_DENIED_TEXT: &str = "Location permission denied";
const LOCATION_UNAVAILABLE_TEXT: &str = "Location not available";
const LOCATION_ERROR_TEXT: &str = "Location error";
const PHOTO_CANCELLED_TEXT: &str = "Photo capture cancelled";
const PHOTO_NO_CAMERA_TEXT: &str = "No photo captured";

/// Outcome of a single location fix request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationResult {
    /// A fix with WGS84 coordinates in decimal degrees.
    Fixed { latitude: f64, longitude: f64 },
    /// The user has not granted location permission.
    Denied,
    /// Provider returned no fix (weak signal, GPS off, never captured).
    Unavailable,
    /// Provider failed. `reason` may be empty.
    Error { reason: String },
}

impl LocationResult {
    pub fn fixed(latitude: f64, longitude: f64) -> Self {
        Self::Fixed {
            latitude,
            longitude,
        }
    }

    /// Builds a fix from provider output, downgrading non-finite values to `Error`.
    pub fn from_provider(latitude: f64, longitude: f64) -> Self {
        if latitude.is_finite() && longitude.is_finite() {
            Self::fixed(latitude, longitude)
        } else {
            Self::error(format!("non-finite coordinates {latitude}, {longitude}"))
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Self::Error {
            reason: reason.into(),
        }
    }

    /// Returns the coordinate pair of a fix.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Self::Fixed {
                latitude,
                longitude,
            } => Some(Coordinates {
                latitude: *latitude,
                longitude: *longitude,
            }),
            _ => None,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed { .. })
    }

    /// Maps a legacy `"lat, lng"` or sentinel string into a tagged value.
    ///
    /// Unrecognized text that is not a coordinate pair becomes `Error` with
    /// the original text as reason, so nothing is lost.
    pub fn from_legacy(text: &str) -> Self {
        let trimmed = text.trim();
        if let Ok(coordinates) = parse_coordinates(trimmed) {
            return Self::fixed(coordinates.latitude, coordinates.longitude);
        }

        match trimmed {
            LOCATION_DENIED_TEXT => Self::Denied,
            LOCATION_UNAVAILABLE_TEXT | "Location unavailable" | "Location not found" | "" => {
                Self::Unavailable
            }
            LOCATION_ERROR_TEXT => Self::error(""),
            other => match other.strip_prefix("Location error:") {
                Some(reason) => Self::error(reason.trim()),
                None => Self::error(other),
            },
        }
    }
}

impl Display for LocationResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed {
                latitude,
                longitude,
            } => write!(f, "{latitude}, {longitude}"),
            Self::Denied => f.write_str(LOCATION_DENIED_TEXT),
            Self::Unavailable => f.write_str(LOCATION_UNAVAILABLE_TEXT),
            Self::Error { reason } if reason.is_empty() => f.write_str(LOCATION_ERROR_TEXT),
            Self::Error { reason } => write!(f, "{LOCATION_ERROR_TEXT}: {reason}"),
        }
    }
}

/// Validated WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Why a coordinate string could not be used for a map query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinateParseError {
    Empty,
    /// Not exactly two comma-separated components.
    InvalidFormat(String),
    /// A component is not a finite number.
    InvalidNumber { latitude: String, longitude: String },
    OutOfRange { latitude: String, longitude: String },
}

impl Display for CoordinateParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("Location not available for this alert"),
            Self::InvalidFormat(_) => f.write_str("Invalid location format"),
            Self::InvalidNumber {
                latitude,
                longitude,
            } => write!(f, "Invalid coordinates: {latitude}, {longitude}"),
            Self::OutOfRange {
                latitude,
                longitude,
            } => write!(f, "Coordinates out of range: {latitude}, {longitude}"),
        }
    }
}

impl Error for CoordinateParseError {}

/// Parses `"lat, lng"` text, tolerating a leading `Location:` label.
///
/// Both components must parse as finite `f64`, latitude within +-90 and
/// longitude within +-180.
pub fn parse_coordinates(text: &str) -> Result<Coordinates, CoordinateParseError> {
    let trimmed = text.trim();
    let cleaned = trimmed
        .strip_prefix("Location:")
        .map(str::trim)
        .unwrap_or(trimmed);
    if cleaned.is_empty() {
        return Err(CoordinateParseError::Empty);
    }

    let parts = cleaned.split(',').map(str::trim).collect::<Vec<_>>();
    let [lat_text, lng_text] = parts.as_slice() else {
        return Err(CoordinateParseError::InvalidFormat(cleaned.to_string()));
    };

    let parsed = (lat_text.parse::<f64>(), lng_text.parse::<f64>());
    let (Ok(latitude), Ok(longitude)) = parsed else {
        return Err(CoordinateParseError::InvalidNumber {
            latitude: lat_text.to_string(),
            longitude: lng_text.to_string(),
        });
    };
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(CoordinateParseError::InvalidNumber {
            latitude: lat_text.to_string(),
            longitude: lng_text.to_string(),
        });
    }
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(CoordinateParseError::OutOfRange {
            latitude: lat_text.to_string(),
            longitude: lng_text.to_string(),
        });
    }

    Ok(Coordinates {
        latitude,
        longitude,
    })
}

/// Outcome of the evidence-photo capture step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhotoResult {
    /// Camera saved an image at `path`.
    Captured { path: String },
    /// User backed out of the camera screen.
    Cancelled,
    /// No camera activity could handle the capture request.
    NoCamera,
}

impl PhotoResult {
    pub fn captured(path: impl Into<String>) -> Self {
        Self::Captured { path: path.into() }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Captured { path } => Some(path.as_str()),
            _ => None,
        }
    }

    /// Maps a legacy path-or-sentinel string into a tagged value.
    pub fn from_legacy(text: &str) -> Self {
        match text.trim() {
            "" | PHOTO_NO_CAMERA_TEXT => Self::NoCamera,
            PHOTO_CANCELLED_TEXT => Self::Cancelled,
            path => Self::captured(path),
        }
    }
}

impl Display for PhotoResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Captured { path } => f.write_str(path),
            Self::Cancelled => f.write_str(PHOTO_CANCELLED_TEXT),
            Self::NoCamera => f.write_str(PHOTO_NO_CAMERA_TEXT),
        }
    }
}
