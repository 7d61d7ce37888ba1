//! Decoding of Foursquare v2 response envelopes.
//!
//! Every v2 response has the shape `{"meta": {...}, "response": {...}}`. The wire
//! structs here mirror that shape and are converted into the crate's model types.

use serde::Deserialize;

use crate::{Coordinate, SearchError, Venue, VenuePhoto};

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    meta: Meta,
    response: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Meta {
    code: u16,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    error_type: Option<String>,
    #[serde(default)]
    error_detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VenuesPayload {
    venues: Vec<WireVenue>,
}

#[derive(Debug, Deserialize)]
struct WireVenue {
    id: String,
    name: String,
    location: WireLocation,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLocation {
    lat: f64,
    lng: f64,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    formatted_address: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PhotosPayload {
    photos: WirePhotos,
}

#[derive(Debug, Deserialize)]
struct WirePhotos {
    #[serde(default)]
    items: Vec<WirePhoto>,
}

#[derive(Debug, Deserialize)]
struct WirePhoto {
    id: String,
    prefix: String,
    suffix: String,
}

/// Only the `meta` part, read before the payload.
#[derive(Debug, Deserialize)]
struct MetaOnly {
    meta: Meta,
}

impl From<WireVenue> for Venue {
    fn from(wire: WireVenue) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            location: Coordinate::new(wire.location.lat, wire.location.lng),
            address: wire.location.address,
            formatted_address: wire.location.formatted_address,
        }
    }
}

impl From<WirePhoto> for VenuePhoto {
    fn from(wire: WirePhoto) -> Self {
        Self {
            id: wire.id,
            prefix: wire.prefix,
            suffix: wire.suffix,
        }
    }
}

fn decode_envelope<'a, T: Deserialize<'a>>(body: &'a [u8]) -> Result<T, SearchError> {
    // error envelopes carry an empty `response`, so the status is read on its own first
    let status: MetaOnly =
        serde_json::from_slice(body).map_err(|e| SearchError::Parse(e.to_string()))?;
    if status.meta.code != 200 {
        return Err(SearchError::Transport(describe_meta(&status.meta)));
    }

    let envelope: Envelope<T> =
        serde_json::from_slice(body).map_err(|e| SearchError::Parse(e.to_string()))?;
    Ok(envelope.response)
}

/// Decode the body of a `venues/search` response.
pub fn decode_venues(body: &[u8]) -> Result<Vec<Venue>, SearchError> {
    let payload: VenuesPayload = decode_envelope(body)?;
    Ok(payload.venues.into_iter().map(Venue::from).collect())
}

/// Decode the body of a `venues/{id}/photos` response, keeping the first photo.
pub fn decode_first_photo(body: &[u8]) -> Result<Option<VenuePhoto>, SearchError> {
    let payload: PhotosPayload = decode_envelope(body)?;
    Ok(payload.photos.items.into_iter().next().map(VenuePhoto::from))
}

/// Best effort description of an error body; falls back to `None` when the
/// body carries no readable `meta`.
pub fn error_detail(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<MetaOnly>(body)
        .ok()
        .map(|m| describe_meta(&m.meta))
}

fn describe_meta(meta: &Meta) -> String {
    let mut description = format!("provider returned code {}", meta.code);
    if let Some(error_type) = &meta.error_type {
        description.push_str(&format!(" ({error_type})"));
    }
    if let Some(detail) = &meta.error_detail {
        description.push_str(&format!(": {detail}"));
    }
    if let Some(request_id) = &meta.request_id {
        description.push_str(&format!(" [request {request_id}]"));
    }
    description
}
