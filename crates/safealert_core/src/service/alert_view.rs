//! Alert history view helpers for the map launcher and photo viewer.
//!
//! # Responsibility
//! - Turn a stored location into map URIs, or into the status text to show.
//! - Decide whether a stored photo can be opened full-screen.
//!
//! # Invariants
//! - Map URIs are only built from coordinates that passed `parse_coordinates`.
//! - A captured photo is only `Viewable` when the file exists right now.

use crate::model::capture::{parse_coordinates, Coordinates, LocationResult, PhotoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const MAP_PIN_LABEL: &str = "Emergency Alert Location";

/// Launch candidates for one location, most specific first.
#[derive(Debug, Clone, PartialEq)]
pub struct MapTarget {
    pub coordinates: Coordinates,
    /// `geo:` URI with a labelled pin, for a dedicated maps app.
    pub app_uri: String,
    /// Plain `geo:` URI for any maps handler.
    pub generic_uri: String,
    /// Browser fallback that works without a maps app.
    pub browser_url: String,
}

impl MapTarget {
    pub fn for_coordinates(coordinates: Coordinates) -> Self {
        let Coordinates {
            latitude,
            longitude,
        } = coordinates;
        Self {
            coordinates,
            app_uri: format!("geo:0,0?q={latitude},{longitude}({MAP_PIN_LABEL})"),
            generic_uri: format!("geo:{latitude},{longitude}?q={latitude},{longitude}"),
            browser_url: format!(
                "https://www.google.com/maps/search/?api=1&query={latitude},{longitude}"
            ),
        }
    }

    /// Launch order: app URI, generic URI, browser URL.
    pub fn candidates(&self) -> [&str; 3] {
        [
            self.app_uri.as_str(),
            self.generic_uri.as_str(),
            self.browser_url.as_str(),
        ]
    }
}

/// Why no map should be launched for a location.
#[derive(Debug, Clone, PartialEq)]
pub enum MapLinkError {
    /// Capture failed; carries the status text to show instead.
    LocationNotCaptured(String),
    /// Stored coordinates do not form a usable pair.
    InvalidCoordinates(String),
}

impl Display for MapLinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocationNotCaptured(status) => f.write_str(status),
            Self::InvalidCoordinates(message) => f.write_str(message),
        }
    }
}

impl Error for MapLinkError {}

/// Builds map launch targets for a stored location.
///
/// Coordinates of a `Fixed` result are re-validated through
/// `parse_coordinates` on their display text, so out-of-range or non-finite
/// values never reach a map query.
pub fn map_target(location: &LocationResult) -> Result<MapTarget, MapLinkError> {
    if !location.is_fixed() {
        return Err(MapLinkError::LocationNotCaptured(location.to_string()));
    }
    parse_coordinates(&location.to_string())
        .map(MapTarget::for_coordinates)
        .map_err(|err| MapLinkError::InvalidCoordinates(err.to_string()))
}

/// What the photo viewer should do for one alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoDisplay {
    /// File exists and can be opened.
    Viewable(PathBuf),
    /// Photo was captured but the file is gone.
    Missing(PathBuf),
    /// No photo was captured; carries the status text.
    NotCaptured(String),
}

impl PhotoDisplay {
    /// Status line for the viewer.
    pub fn status_message(&self) -> String {
        match self {
            Self::Viewable(_) => "Opening photo...".to_string(),
            Self::Missing(path) => format!("Photo file not found at: {}", path.display()),
            Self::NotCaptured(status) => status.clone(),
        }
    }
}

/// Resolves a stored photo against the filesystem.
pub fn resolve_photo(photo: &PhotoResult) -> PhotoDisplay {
    match photo.path() {
        Some(path) => {
            let path = PathBuf::from(path);
            if path.is_file() {
                PhotoDisplay::Viewable(path)
            } else {
                PhotoDisplay::Missing(path)
            }
        }
        None => PhotoDisplay::NotCaptured(photo.to_string()),
    }
}
