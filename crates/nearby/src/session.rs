//! Scoped ownership of a map screen and the detail screens opened from it.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use ahash::AHashMap as HashMap;
use nearby_provider::{SearchGateway, Venue};
use tokio::{sync::mpsc::UnboundedReceiver, task::JoinHandle};
use tracing::{debug, info};

use crate::{
    config::CoordinatorConfig,
    error::Result,
    location::LocationSource,
    viewmodel::{MapOutput, MapViewModel, VenueDetailsListener, VenueDetailsViewModel},
};

#[derive(Debug, Default)]
struct DetailsRegistry {
    next_id: u64,
    open: HashMap<u64, JoinHandle<()>>,
}

impl DetailsRegistry {
    /// Forget flows that already ran to completion.
    fn prune(&mut self) {
        self.open.retain(|_, task| !task.is_finished());
    }
}

type SharedRegistry = Arc<Mutex<DetailsRegistry>>;

fn lock(registry: &Mutex<DetailsRegistry>) -> MutexGuard<'_, DetailsRegistry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A running map screen.
///
/// Owns the map view model and every venue details flow opened from it.
/// Children only hold a weak reference back, so closing the session never
/// waits on them.
pub struct MapSession {
    map: MapViewModel,
    gateway: Arc<dyn SearchGateway>,
    details: SharedRegistry,
}

impl MapSession {
    pub fn start(
        location: Arc<dyn LocationSource>,
        gateway: Arc<dyn SearchGateway>,
        config: CoordinatorConfig,
    ) -> (Self, UnboundedReceiver<MapOutput>) {
        let (map, outputs) = MapViewModel::spawn(location, Arc::clone(&gateway), config);
        let session = Self {
            map,
            gateway,
            details: Arc::default(),
        };
        (session, outputs)
    }

    pub const fn map(&self) -> &MapViewModel {
        &self.map
    }

    /// Open the details flow for `venue` and start loading it.
    pub fn open_venue_details<L: VenueDetailsListener>(
        &self,
        venue: Arc<Venue>,
        listener: L,
    ) -> VenueDetailsSession {
        let venue_id = venue.id.clone();
        let mut view_model = VenueDetailsViewModel::new(venue, Arc::clone(&self.gateway), listener);
        let task = tokio::spawn(async move { view_model.on_view_loaded().await });

        let mut registry = lock(&self.details);
        registry.prune();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.open.insert(id, task);
        debug!(id, venue_id = %venue_id, "Venue details opened");

        VenueDetailsSession {
            id,
            venue_id,
            registry: Arc::downgrade(&self.details),
        }
    }

    /// Number of details flows still loading.
    pub fn open_details_count(&self) -> usize {
        let mut registry = lock(&self.details);
        registry.prune();
        registry.open.len()
    }

    /// Close every details flow, then stop the map coordinator.
    pub async fn close(self) -> Result<()> {
        let children: Vec<_> = lock(&self.details).open.drain().collect();
        info!(children = children.len(), "Closing map session");
        for (_, task) in children {
            task.abort();
        }
        self.map.close().await
    }
}

impl fmt::Debug for MapSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapSession")
            .field("map", &self.map)
            .field("open_details", &self.open_details_count())
            .finish_non_exhaustive()
    }
}

/// Handle to one venue details flow opened from a [`MapSession`].
#[derive(Debug)]
pub struct VenueDetailsSession {
    id: u64,
    venue_id: String,
    registry: Weak<Mutex<DetailsRegistry>>,
}

impl VenueDetailsSession {
    pub fn venue_id(&self) -> &str {
        &self.venue_id
    }

    /// Detach from the parent session, aborting the flow if it is still loading.
    pub fn close(self) {
        let Some(registry) = self.registry.upgrade() else {
            debug!(id = self.id, "Parent session already closed");
            return;
        };
        if let Some(task) = lock(&registry).open.remove(&self.id) {
            task.abort();
            debug!(id = self.id, venue_id = %self.venue_id, "Venue details closed");
        }
    }
}
