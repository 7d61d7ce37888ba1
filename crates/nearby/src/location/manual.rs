use std::{
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use futures::future::BoxFuture;
use nearby_provider::Coordinate;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    watch,
};
use tracing::{debug, info};

use super::{AuthorizationState, LocationError, LocationSource};
use crate::config::CoordinatorConfig;

const POSITION_BUFFER: usize = 16;

/// A [`LocationSource`] driven from the outside.
///
/// The host platform pushes permission changes with
/// [`set_authorization`](Self::set_authorization) and fixes with
/// [`push_position`](Self::push_position); everything else is derived here.
#[derive(Debug)]
pub struct ManualLocationSource {
    authorization: watch::Sender<AuthorizationState>,
    positions: broadcast::Sender<Coordinate>,
    last_fix: Mutex<Option<Coordinate>>,
    updating: AtomicBool,
    fix_timeout: Duration,
}

impl ManualLocationSource {
    pub fn new(authorization: AuthorizationState) -> Self {
        let (authorization, _) = watch::channel(authorization);
        let (positions, _) = broadcast::channel(POSITION_BUFFER);
        Self {
            authorization,
            positions,
            last_fix: Mutex::new(None),
            updating: AtomicBool::new(false),
            fix_timeout: Duration::from_secs(10),
        }
    }

    /// A source whose `fetch_once` waits as long as `config` allows.
    pub fn from_config(authorization: AuthorizationState, config: &CoordinatorConfig) -> Self {
        Self::new(authorization).with_fix_timeout(config.location_fix_timeout)
    }

    /// How long `fetch_once` waits for the next pushed fix.
    pub const fn with_fix_timeout(mut self, timeout: Duration) -> Self {
        self.fix_timeout = timeout;
        self
    }

    pub fn set_authorization(&self, state: AuthorizationState) {
        let previous = self.authorization.send_replace(state);
        if previous != state {
            info!(?previous, current = ?state, "Location authorization changed");
        }
    }

    /// Record a new fix and hand it to every subscriber and pending fetch.
    pub fn push_position(&self, coordinate: Coordinate) {
        *self.last_fix.lock().unwrap_or_else(PoisonError::into_inner) = Some(coordinate);
        // no receivers is fine, the fix is still remembered
        let _ = self.positions.send(coordinate);
    }

    pub fn is_updating(&self) -> bool {
        self.updating.load(Ordering::Acquire)
    }
}

impl Default for ManualLocationSource {
    fn default() -> Self {
        Self::new(AuthorizationState::NotDetermined)
    }
}

impl LocationSource for ManualLocationSource {
    fn start(&self) {
        if !self.updating.swap(true, Ordering::AcqRel) {
            debug!("Continuous location updates started");
        }
    }

    fn stop(&self) {
        if self.updating.swap(false, Ordering::AcqRel) {
            debug!("Continuous location updates stopped");
        }
    }

    fn fetch_once(&self) -> BoxFuture<'_, Result<Coordinate, LocationError>> {
        // subscribe before awaiting so a fix pushed right after the call is not missed
        let mut positions = self.positions.subscribe();
        let status = self.authorization_status();
        let timeout = self.fix_timeout;

        Box::pin(async move {
            if status.is_refused() {
                return Err(LocationError::Unavailable(format!(
                    "location access is {status:?}"
                )));
            }

            let wait_for_fix = async {
                loop {
                    match positions.recv().await {
                        Ok(coordinate) => return Ok(coordinate),
                        Err(RecvError::Lagged(_)) => {}
                        Err(RecvError::Closed) => {
                            return Err(LocationError::Unavailable(
                                "position stream closed".to_string(),
                            ));
                        }
                    }
                }
            };

            tokio::time::timeout(timeout, wait_for_fix)
                .await
                .unwrap_or_else(|_| {
                    Err(LocationError::Unavailable(format!(
                        "no fix within {}ms",
                        timeout.as_millis()
                    )))
                })
        })
    }

    fn last_known(&self) -> Option<Coordinate> {
        if !self.authorization_status().is_authorized() {
            return None;
        }
        *self.last_fix.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn authorization_status(&self) -> AuthorizationState {
        *self.authorization.borrow()
    }

    fn subscribe_authorization(&self) -> watch::Receiver<AuthorizationState> {
        self.authorization.subscribe()
    }

    fn subscribe_positions(&self) -> broadcast::Receiver<Coordinate> {
        self.positions.subscribe()
    }
}
