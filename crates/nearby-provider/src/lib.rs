//! Venue search provider layer for the Nearby search core.
//!
//! This crate owns everything that talks about venues in provider terms: the
//! [`Coordinate`], [`Venue`] and [`VenuePhoto`] model, the [`SearchGateway`]
//! contract the core consumes, and a Foursquare v2 implementation of that
//! contract (behind the default `http_client` feature).
//!
//! ```rust,no_run
//! use nearby_provider::{Coordinate, FoursquareClient, FoursquareConfig, SearchGateway};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = FoursquareClient::new(FoursquareConfig::from_env()?)?;
//! let venues = client
//!     .search_venues(Coordinate::new(40.7217, -73.988))
//!     .await?;
//! for venue in venues {
//!     println!("{venue}");
//! }
//! # Ok(())
//! # }
//! ```
use bytes::Bytes;
use futures::future::BoxFuture;

pub mod config;
pub mod foursquare;
mod model;
pub mod test_data;

pub use config::FoursquareConfig;
#[cfg(feature = "http_client")]
pub use foursquare::FoursquareClient;
pub use model::{Coordinate, Venue, VenuePhoto};

/// Something that can find venues around a coordinate.
///
/// Implementations must be callable concurrently: a new search may start while
/// earlier ones are still in flight, and nothing is cancelled on their behalf.
pub trait SearchGateway: Send + Sync + 'static {
    /// Search venues around `coordinate`.
    fn search_venues(
        &self,
        coordinate: Coordinate,
    ) -> BoxFuture<'_, std::result::Result<Vec<Venue>, SearchError>>;

    /// First photo of a venue. Never fails the caller: lookup errors are
    /// logged and reported as `None`.
    fn fetch_photo(&self, venue_id: &str) -> BoxFuture<'_, Option<VenuePhoto>>;

    /// Download the image behind a photo URL, with the same error policy as
    /// [`SearchGateway::fetch_photo`].
    fn fetch_image(&self, url: &str) -> BoxFuture<'_, Option<Bytes>>;

    /// Size segment used for photo URLs when the caller asks for none.
    fn photo_size(&self) -> &str {
        config::DEFAULT_PHOTO_SIZE
    }
}

mod error {
    use thiserror::Error;

    /// Failure of a venue search, classified for the UI.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum SearchError {
        /// The provider could not be reached or answered with an error status.
        #[error("Cannot download venues from Foursquare: {0}")]
        Transport(String),
        /// The provider answered but the payload could not be decoded.
        #[error("Cannot parse data about restaurants: {0}")]
        Parse(String),
    }

    impl SearchError {
        /// Stable numeric code used for diagnostics.
        pub const fn code(&self) -> u16 {
            match self {
                Self::Transport(_) => 301,
                Self::Parse(_) => 302,
            }
        }

        /// Short message suitable for showing to the user.
        pub const fn message(&self) -> &'static str {
            match self {
                Self::Transport(_) => "Cannot download venues from Foursquare",
                Self::Parse(_) => "Cannot parse data about restaurants",
            }
        }

        pub fn detail(&self) -> &str {
            match self {
                Self::Transport(detail) | Self::Parse(detail) => detail,
            }
        }
    }

    #[derive(Error, Debug)]
    pub enum ProviderError {
        #[cfg(feature = "http_client")]
        #[error("HTTP client error: {0}")]
        Http(#[from] reqwest::Error),
        #[error("Missing provider credential: {0}")]
        MissingCredential(&'static str),
        #[error("Invalid provider configuration: {0}")]
        InvalidConfig(String),
    }

    pub type Result<T> = std::result::Result<T, ProviderError>;
}

pub use error::{ProviderError, Result, SearchError};
