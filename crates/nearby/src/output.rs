//! What the core tells the presentation layer.

use std::{fmt, sync::Arc};

use nearby_provider::{Coordinate, SearchError, Venue};

use crate::annotation::Annotation;

/// Receiver of every map output.
///
/// Injected when a coordinator is spawned and called synchronously from its
/// event loop, so implementations should hand work off rather than block.
pub trait MapListener: Send + 'static {
    fn user_location_visibility_changed(&mut self, visible: bool);

    fn zoom_requested(&mut self, level: u8, center: Coordinate);

    /// Full set of cached pins after a successful search.
    fn pins_updated(&mut self, annotations: Vec<Annotation>);

    fn error_occurred(&mut self, error: MapError);

    fn venue_details_requested(&mut self, venue: Arc<Venue>);
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapErrorKind {
    Generic,
    CannotGetLocation,
    LocationServicesNotAuthorized,
    SearchTransport,
    SearchParse,
}

/// A user-facing error, ready for an alert or toast.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapError {
    pub kind: MapErrorKind,
    pub title: Option<String>,
    pub message: String,
    pub should_block_interaction: bool,
    pub code: Option<u16>,
}

impl MapError {
    pub fn generic(message: impl Into<String>) -> Self {
        Self {
            kind: MapErrorKind::Generic,
            title: None,
            message: message.into(),
            should_block_interaction: false,
            code: None,
        }
    }

    pub fn cannot_fetch_user_location() -> Self {
        Self::generic("Cannot fetch current user location")
    }

    pub fn cannot_get_location() -> Self {
        Self {
            kind: MapErrorKind::CannotGetLocation,
            title: Some("Location".to_string()),
            message: "Cannot get your current location".to_string(),
            should_block_interaction: false,
            code: None,
        }
    }

    pub fn location_services_not_authorized() -> Self {
        Self {
            kind: MapErrorKind::LocationServicesNotAuthorized,
            title: Some("Location Services Off".to_string()),
            message: "Turn on Location Services in Settings to center the map on your position"
                .to_string(),
            should_block_interaction: true,
            code: None,
        }
    }
}

impl From<&SearchError> for MapError {
    fn from(error: &SearchError) -> Self {
        let kind = match error {
            SearchError::Transport(_) => MapErrorKind::SearchTransport,
            SearchError::Parse(_) => MapErrorKind::SearchParse,
        };
        Self {
            kind,
            title: None,
            message: error.message().to_string(),
            should_block_interaction: false,
            code: Some(error.code()),
        }
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.title, self.code) {
            (Some(title), Some(code)) => write!(f, "{title}: {} ({code})", self.message),
            (Some(title), None) => write!(f, "{title}: {}", self.message),
            (None, Some(code)) => write!(f, "{} ({code})", self.message),
            (None, None) => f.write_str(&self.message),
        }
    }
}
