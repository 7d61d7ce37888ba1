use crate::{Coordinate, FoursquareConfig};

/// The Foursquare endpoints this client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    VenuesSearch,
    VenuePhotos { venue_id: String },
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Self::VenuesSearch => "venues/search".to_string(),
            Self::VenuePhotos { venue_id } => format!("venues/{venue_id}/photos"),
        }
    }
}

/// A fully described GET request: path plus query parameters.
///
/// Authentication parameters are included so the request can be sent as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueRequest {
    pub path: String,
    pub parameters: Vec<(&'static str, String)>,
}

impl VenueRequest {
    pub fn venues_search(coordinate: Coordinate, config: &FoursquareConfig) -> Self {
        let mut parameters = auth_parameters(config);
        parameters.push(("ll", coordinate.to_string()));
        parameters.push(("query", config.query.clone()));
        parameters.push(("limit", config.limit.to_string()));

        Self {
            path: Endpoint::VenuesSearch.path(),
            parameters,
        }
    }

    pub fn venue_photos(venue_id: &str, config: &FoursquareConfig) -> Self {
        let mut parameters = auth_parameters(config);
        parameters.push(("limit", "1".to_string()));

        Self {
            path: Endpoint::VenuePhotos {
                venue_id: venue_id.to_string(),
            }
            .path(),
            parameters,
        }
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn auth_parameters(config: &FoursquareConfig) -> Vec<(&'static str, String)> {
    vec![
        ("client_id", config.client_id.clone()),
        ("client_secret", config.client_secret.clone()),
        ("v", config.api_version.clone()),
    ]
}
