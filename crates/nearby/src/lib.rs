//! Nearby - location-aware venue search core
//!
//! Nearby keeps a map screen populated with restaurants around the user. It
//! glues together three asynchronous sources, each with its own failure modes:
//! the device location (and its permission), the visible map region, and a
//! places provider (Foursquare by default).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use nearby::provider::{Coordinate, FoursquareClient, FoursquareConfig};
//! use nearby::{AuthorizationState, CoordinatorConfig, ManualLocationSource, MapOutput, MapSession};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! nearby::init_logging(tracing::Level::INFO)?;
//!
//! let location = Arc::new(ManualLocationSource::new(AuthorizationState::AuthorizedWhenInUse));
//! let gateway = Arc::new(FoursquareClient::new(FoursquareConfig::from_env()?)?);
//! let (session, mut outputs) =
//!     MapSession::start(location.clone(), gateway, CoordinatorConfig::default());
//!
//! session.map().on_view_appeared()?;
//! location.push_position(Coordinate::new(40.7217, -73.988));
//!
//! while let Some(output) = outputs.recv().await {
//!     if let MapOutput::Zoom { center, .. } = output {
//!         // the platform map moved; report the new visible region
//!         session.map().on_visible_region_changed(center)?;
//!     }
//! }
//! session.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Behaviour
//!
//! - **First appearance**: the map is centred on the user once per coordinator.
//! - **Throttled search**: viewport changes trigger at most one search per
//!   window, always for the latest centre.
//! - **Accumulating pins**: results from every search are merged, keyed by
//!   coordinate; failed searches never clear the map.
//! - **Permission aware**: the user location dot follows authorization, and
//!   centring while access is denied raises a blocking error.
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod annotation;
mod config;
mod coordinator;
pub mod error;
pub mod location;
mod output;
mod session;
mod viewmodel;

pub use annotation::{Annotation, AnnotationCache, CoordinateKey};
pub use config::{CoordinatorConfig, CoordinatorConfigBuilder, MAX_ZOOM_LEVEL};
pub use coordinator::{CoordinatorHandle, LifecycleEvent, SearchCoordinator, SearchRequest};
pub use location::{AuthorizationState, LocationError, LocationSource, ManualLocationSource};
pub use nearby_provider as provider;
pub use nearby_provider::{Coordinate, SearchError, SearchGateway, Venue, VenuePhoto};
pub use output::{MapError, MapErrorKind, MapListener};
pub use session::{MapSession, VenueDetailsSession};
pub use viewmodel::{
    ChannelListener, MapOutput, MapViewModel, TextDetails, VenueDetailsListener,
    VenueDetailsViewModel,
};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the Nearby library.
///
/// Installs a formatting subscriber filtered by `RUST_LOG` when set, otherwise
/// by `level`. HTTP client internals are capped at `warn`. Calling this more
/// than once is harmless.
///
/// # Examples
///
/// ```rust
/// use nearby::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), nearby::error::NearbyError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::NearbyError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("hyper_util=warn".parse()?)
            .add_directive("reqwest=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .map_err(|e| error::NearbyError::ConfigError(e.to_string()))?;
        Ok(())
    })
}
