use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
///
/// Equality is plain numeric comparison of both components, never identity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Formats as `lat,lng`, the form Foursquare expects in the `ll` parameter.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// A venue returned by a provider search.
///
/// Venues are immutable once decoded and are shared between the annotation
/// cache and the presentation layer as `Arc<Venue>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    /// Provider issued unique identifier
    pub id: String,
    /// Display name of the venue
    pub name: String,
    /// Position of the venue
    pub location: Coordinate,
    /// Single line street address, if the provider knows it
    pub address: Option<String>,
    /// Address split into display lines, if the provider knows it
    pub formatted_address: Option<Vec<String>>,
}

impl Venue {
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            address: None,
            formatted_address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_formatted_address<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formatted_address = Some(lines.into_iter().map(Into::into).collect());
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) @ {}", self.name, self.id, self.location)
    }
}

/// A photo reference for a venue. The actual image lives at [`VenuePhoto::url`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenuePhoto {
    pub id: String,
    pub prefix: String,
    pub suffix: String,
}

impl VenuePhoto {
    /// Build the image URL for a size such as `"original"` or `"300x300"`.
    pub fn url(&self, size: &str) -> String {
        format!("{}{}{}", self.prefix, size, self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_display_matches_ll_format() {
        let coordinate = Coordinate::new(40.7217, -73.988);
        assert_eq!(coordinate.to_string(), "40.7217,-73.988");
    }

    #[test]
    fn test_coordinate_equality_is_numeric() {
        assert_eq!(Coordinate::new(1.5, 2.0), Coordinate::new(1.5, 2.0));
        assert_eq!(Coordinate::new(0.0, 0.0), Coordinate::new(-0.0, 0.0));
        assert_ne!(Coordinate::new(1.5, 2.0), Coordinate::new(1.5, 2.000001));
    }

    #[test]
    fn test_photo_url() {
        let photo = VenuePhoto {
            id: "p1".into(),
            prefix: "https://fastly.4sqi.net/img/general/".into(),
            suffix: "/5163668_xXFcZo7sU8aa1ZMhiQ2kIP7NllD48m7qsSwr1mJnFj4.jpg".into(),
        };
        assert_eq!(
            photo.url("300x300"),
            "https://fastly.4sqi.net/img/general/300x300/5163668_xXFcZo7sU8aa1ZMhiQ2kIP7NllD48m7qsSwr1mJnFj4.jpg"
        );
    }

    #[test]
    fn test_venue_builders() {
        let venue = Venue::new("v1", "Mr. Purple", Coordinate::new(40.721, -73.988))
            .with_address("180 Orchard St")
            .with_formatted_address(["180 Orchard St", "New York, NY 10002"]);

        assert_eq!(venue.address.as_deref(), Some("180 Orchard St"));
        assert_eq!(venue.formatted_address.as_ref().map(Vec::len), Some(2));
    }
}
