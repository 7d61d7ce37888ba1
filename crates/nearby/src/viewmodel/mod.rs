//! Presentation-facing facades over the coordinator.

use std::sync::Arc;

use nearby_provider::{Coordinate, SearchGateway, Venue};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    annotation::Annotation,
    config::CoordinatorConfig,
    coordinator::{CoordinatorHandle, LifecycleEvent, SearchCoordinator},
    error::Result,
    location::LocationSource,
    output::{MapError, MapListener},
};

mod venue_details;

pub use venue_details::{TextDetails, VenueDetailsListener, VenueDetailsViewModel};

/// One map output, as delivered by [`MapViewModel`].
#[derive(Debug, Clone)]
pub enum MapOutput {
    UserLocationVisibility(bool),
    Zoom { level: u8, center: Coordinate },
    Pins(Vec<Annotation>),
    Error(MapError),
    ShowVenueDetails(Arc<Venue>),
}

/// A [`MapListener`] that forwards every output into a channel.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    outputs: UnboundedSender<MapOutput>,
}

impl ChannelListener {
    pub fn channel() -> (Self, UnboundedReceiver<MapOutput>) {
        let (outputs, rx) = mpsc::unbounded_channel();
        (Self { outputs }, rx)
    }

    fn forward(&self, output: MapOutput) {
        // the presentation side stopped listening; nothing to tell it anymore
        let _ = self.outputs.send(output);
    }
}

impl MapListener for ChannelListener {
    fn user_location_visibility_changed(&mut self, visible: bool) {
        self.forward(MapOutput::UserLocationVisibility(visible));
    }

    fn zoom_requested(&mut self, level: u8, center: Coordinate) {
        self.forward(MapOutput::Zoom { level, center });
    }

    fn pins_updated(&mut self, annotations: Vec<Annotation>) {
        self.forward(MapOutput::Pins(annotations));
    }

    fn error_occurred(&mut self, error: MapError) {
        self.forward(MapOutput::Error(error));
    }

    fn venue_details_requested(&mut self, venue: Arc<Venue>) {
        self.forward(MapOutput::ShowVenueDetails(venue));
    }
}

/// The map screen's view model.
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use nearby::{AuthorizationState, CoordinatorConfig, ManualLocationSource, MapViewModel};
/// use nearby::provider::{FoursquareClient, FoursquareConfig};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let location = Arc::new(ManualLocationSource::new(AuthorizationState::AuthorizedWhenInUse));
/// let gateway = Arc::new(FoursquareClient::new(FoursquareConfig::from_env()?)?);
/// let (map, mut outputs) = MapViewModel::spawn(location, gateway, CoordinatorConfig::default());
///
/// map.on_view_appeared()?;
/// while let Some(output) = outputs.recv().await {
///     println!("{output:?}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MapViewModel {
    coordinator: CoordinatorHandle,
}

impl MapViewModel {
    pub fn spawn(
        location: Arc<dyn LocationSource>,
        gateway: Arc<dyn SearchGateway>,
        config: CoordinatorConfig,
    ) -> (Self, UnboundedReceiver<MapOutput>) {
        let (listener, outputs) = ChannelListener::channel();
        let coordinator = SearchCoordinator::spawn(location, gateway, listener, config);
        (Self { coordinator }, outputs)
    }

    pub fn on_view_appeared(&self) -> Result<()> {
        self.coordinator.lifecycle(LifecycleEvent::ViewAppeared)
    }

    pub fn on_view_disappeared(&self) -> Result<()> {
        self.coordinator.lifecycle(LifecycleEvent::ViewDisappeared)
    }

    pub fn on_app_activated(&self) -> Result<()> {
        self.coordinator.lifecycle(LifecycleEvent::AppActivated)
    }

    pub fn on_app_deactivated(&self) -> Result<()> {
        self.coordinator.lifecycle(LifecycleEvent::AppDeactivated)
    }

    pub fn on_visible_region_changed(&self, center: Coordinate) -> Result<()> {
        self.coordinator.viewport_changed(center)
    }

    pub fn on_centering_request(&self) -> Result<()> {
        self.coordinator.centering_requested()
    }

    /// # Panics
    ///
    /// Panics when the annotation carries no venue.
    pub fn on_show_venue_details(&self, annotation: &Annotation) -> Result<()> {
        self.coordinator.venue_selected(annotation)
    }

    pub const fn coordinator(&self) -> &CoordinatorHandle {
        &self.coordinator
    }

    pub async fn close(self) -> Result<()> {
        self.coordinator.close().await
    }
}
