//! Sample Foursquare payloads and venues for tests and examples.
//!
//! The coordinates are real Lower East Side (New York) restaurants so that the
//! fixtures stay close to what the live API returns for that area.

use crate::{Coordinate, Venue, VenuePhoto};

/// The search position used by the fixtures below.
pub const LOWER_EAST_SIDE: Coordinate = Coordinate::new(40.7217, -73.988);

/// A point on Hawaii island, far away from every fixture venue.
pub const BIG_ISLAND: Coordinate = Coordinate::new(19.820689, -155.468038);

pub const MR_PURPLE_RESPONSE: &str = r#"{
  "meta": {"code": 200, "requestId": "5ac51d7e6a607143d811cecb"},
  "response": {
    "venues": [
      {"id": "v1", "name": "Mr. Purple", "location": {"lat": 40.721, "lng": -73.988}}
    ]
  }
}"#;

pub const LOWER_EAST_SIDE_RESPONSE: &str = r#"{
  "meta": {"code": 200, "requestId": "5ac51d7e6a607143d811cecc"},
  "response": {
    "venues": [
      {
        "id": "4a4a6d83f964a520c2ab1fe3",
        "name": "Katz's Delicatessen",
        "location": {
          "address": "205 E Houston St",
          "lat": 40.722233,
          "lng": -73.987426,
          "formattedAddress": ["205 E Houston St", "New York, NY 10002"]
        }
      },
      {
        "id": "3fd66200f964a5209aeb1ee3",
        "name": "Russ & Daughters",
        "location": {
          "address": "179 E Houston St",
          "lat": 40.722645,
          "lng": -73.988281,
          "formattedAddress": ["179 E Houston St", "New York, NY 10002"]
        }
      },
      {
        "id": "4b5b6c4ef964a520f2ff28e3",
        "name": "Mr. Purple",
        "location": {"lat": 40.721, "lng": -73.988}
      }
    ]
  }
}"#;

pub const RATE_LIMITED_RESPONSE: &str = r#"{
  "meta": {
    "code": 429,
    "errorType": "rate_limit_exceeded",
    "errorDetail": "Quota exceeded",
    "requestId": "5ac51d7e6a607143d811cecd"
  },
  "response": {}
}"#;

pub const PHOTOS_RESPONSE: &str = r#"{
  "meta": {"code": 200, "requestId": "5ac51d7e6a607143d811cece"},
  "response": {
    "photos": {
      "count": 1,
      "items": [
        {
          "id": "5163668d498e3d6b8f0a2e3d",
          "prefix": "https://fastly.4sqi.net/img/general/",
          "suffix": "/5163668_xXFcZo7sU8aa1ZMhiQ2kIP7NllD48m7qsSwr1mJnFj4.jpg"
        }
      ]
    }
  }
}"#;

pub const NO_PHOTOS_RESPONSE: &str = r#"{
  "meta": {"code": 200, "requestId": "5ac51d7e6a607143d811cecf"},
  "response": {"photos": {"count": 0, "items": []}}
}"#;

pub fn mr_purple() -> Venue {
    Venue::new("v1", "Mr. Purple", Coordinate::new(40.721, -73.988))
}

pub fn katz() -> Venue {
    Venue::new(
        "4a4a6d83f964a520c2ab1fe3",
        "Katz's Delicatessen",
        Coordinate::new(40.722233, -73.987426),
    )
    .with_address("205 E Houston St")
    .with_formatted_address(["205 E Houston St", "New York, NY 10002"])
}

pub fn russ_and_daughters() -> Venue {
    Venue::new(
        "3fd66200f964a5209aeb1ee3",
        "Russ & Daughters",
        Coordinate::new(40.722645, -73.988281),
    )
    .with_address("179 E Houston St")
    .with_formatted_address(["179 E Houston St", "New York, NY 10002"])
}

pub fn sample_photo() -> VenuePhoto {
    VenuePhoto {
        id: "5163668d498e3d6b8f0a2e3d".to_string(),
        prefix: "https://fastly.4sqi.net/img/general/".to_string(),
        suffix: "/5163668_xXFcZo7sU8aa1ZMhiQ2kIP7NllD48m7qsSwr1mJnFj4.jpg".to_string(),
    }
}
