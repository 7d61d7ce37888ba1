//! Map pins and their de-duplicating cache.

use std::{fmt, sync::Arc};

use nearby_provider::{Coordinate, Venue};

mod cache;

pub use cache::AnnotationCache;

/// Identity of a pin, derived from its coordinate.
///
/// Built from the bit patterns of both components after folding `-0.0` into
/// `0.0`, so numerically equal coordinates always produce the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordinateKey {
    latitude_bits: u64,
    longitude_bits: u64,
}

impl From<Coordinate> for CoordinateKey {
    fn from(coordinate: Coordinate) -> Self {
        // adding +0.0 turns -0.0 into +0.0 and leaves every other value alone
        Self {
            latitude_bits: (coordinate.latitude + 0.0).to_bits(),
            longitude_bits: (coordinate.longitude + 0.0).to_bits(),
        }
    }
}

/// A map pin.
///
/// Pins produced from search results always carry the originating venue;
/// `venue` is only `None` for pins built by hand with [`Annotation::new`].
#[derive(Debug, Clone)]
pub struct Annotation {
    identity: CoordinateKey,
    coordinate: Coordinate,
    title: String,
    venue: Option<Arc<Venue>>,
}

impl Annotation {
    /// A pin without a venue payload.
    pub fn new(coordinate: Coordinate, title: impl Into<String>) -> Self {
        Self {
            identity: coordinate.into(),
            coordinate,
            title: title.into(),
            venue: None,
        }
    }

    pub fn from_venue(venue: impl Into<Arc<Venue>>) -> Self {
        let venue = venue.into();
        Self {
            identity: venue.location.into(),
            coordinate: venue.location,
            title: venue.name.clone(),
            venue: Some(venue),
        }
    }

    pub const fn identity(&self) -> CoordinateKey {
        self.identity
    }

    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub const fn venue(&self) -> Option<&Arc<Venue>> {
        self.venue.as_ref()
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.title, self.coordinate)
    }
}
