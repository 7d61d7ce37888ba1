//! Device position and location permission.
//!
//! The coordinator only ever sees a [`LocationSource`]. A platform bridge can
//! either implement the trait directly or feed a [`ManualLocationSource`].

use futures::future::BoxFuture;
use nearby_provider::Coordinate;
use tokio::sync::{broadcast, watch};

mod manual;

pub use error::LocationError;
pub use manual::ManualLocationSource;

/// Location permission as reported by the platform.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthorizationState {
    #[default]
    NotDetermined,
    AuthorizedAlways,
    AuthorizedWhenInUse,
    Denied,
    Restricted,
}

impl AuthorizationState {
    /// The user location may be shown and read.
    pub const fn is_authorized(self) -> bool {
        matches!(self, Self::AuthorizedAlways | Self::AuthorizedWhenInUse)
    }

    /// Continuous updates may be started. Starting while the state is still
    /// undetermined is what triggers the permission prompt.
    pub const fn allows_updates(self) -> bool {
        self.is_authorized() || matches!(self, Self::NotDetermined)
    }

    /// The user or the device policy refused access.
    pub const fn is_refused(self) -> bool {
        matches!(self, Self::Denied | Self::Restricted)
    }
}

/// Source of the device position.
///
/// `start` and `stop` are idempotent. Authorization changes are pushed at any
/// time, including before the first `start`.
pub trait LocationSource: Send + Sync + 'static {
    /// Begin continuous position updates.
    fn start(&self);

    /// Stop continuous position updates.
    fn stop(&self);

    /// Obtain one position fix.
    fn fetch_once(&self) -> BoxFuture<'_, Result<Coordinate, LocationError>>;

    /// Most recent fix, if one is known and may be disclosed.
    fn last_known(&self) -> Option<Coordinate>;

    fn authorization_status(&self) -> AuthorizationState;

    fn subscribe_authorization(&self) -> watch::Receiver<AuthorizationState>;

    fn subscribe_positions(&self) -> broadcast::Receiver<Coordinate>;
}

mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum LocationError {
        #[error("Location unavailable: {0}")]
        Unavailable(String),
    }
}
