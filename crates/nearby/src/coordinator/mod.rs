//! The reactive core: one task owning all map state.
//!
//! Inputs arrive over an unbounded channel from a [`CoordinatorHandle`].
//! Location fixes and venue searches run in their own tasks and report back
//! through the same channel, so every state change happens on the loop task
//! and listener callbacks are never called concurrently.
use std::{future, sync::Arc};

use chrono::{DateTime, Utc};
use nearby_provider::{Coordinate, SearchError, SearchGateway, Venue};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
    time::Instant,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    annotation::{Annotation, AnnotationCache},
    config::CoordinatorConfig,
    error::{NearbyError, Result},
    location::{AuthorizationState, LocationError, LocationSource},
    output::{MapError, MapListener},
};

mod throttle;

use throttle::Throttle;

/// Visibility changes of the map view and of the whole app.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    ViewAppeared,
    ViewDisappeared,
    AppActivated,
    AppDeactivated,
}

/// A search handed to the gateway.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub coordinate: Coordinate,
    pub issued_at: DateTime<Utc>,
    /// Strictly increasing per coordinator.
    pub sequence: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FixPurpose {
    FirstAppearance,
    Centering,
}

#[derive(Debug)]
enum Event {
    Lifecycle(LifecycleEvent),
    AuthorizationChanged(AuthorizationState),
    ViewportChanged(Coordinate),
    CenteringRequested,
    VenueSelected(Arc<Venue>),
    FixResolved {
        purpose: FixPurpose,
        result: std::result::Result<Coordinate, LocationError>,
    },
    SearchCompleted {
        request: SearchRequest,
        result: std::result::Result<Vec<Venue>, SearchError>,
    },
    Shutdown,
}

/// Owner of the map state. Lives on its own task; talk to it through the
/// [`CoordinatorHandle`] returned by [`SearchCoordinator::spawn`].
pub struct SearchCoordinator {
    config: CoordinatorConfig,
    location: Arc<dyn LocationSource>,
    gateway: Arc<dyn SearchGateway>,
    listener: Box<dyn MapListener>,
    events: UnboundedSender<Event>,

    authorization: AuthorizationState,
    last_visibility: Option<bool>,
    has_centered_on_first_appearance: bool,
    view_appeared: bool,
    app_active: bool,
    throttle: Throttle,
    cache: AnnotationCache,
    last_requested: Option<SearchRequest>,
    next_sequence: u64,
    newest_applied: Option<u64>,
}

impl SearchCoordinator {
    /// Start a coordinator on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn spawn(
        location: Arc<dyn LocationSource>,
        gateway: Arc<dyn SearchGateway>,
        listener: impl MapListener,
        config: CoordinatorConfig,
    ) -> CoordinatorHandle {
        let (events, inbox) = mpsc::unbounded_channel();
        let coordinator = Self {
            throttle: Throttle::gated(config.throttle_window),
            config,
            location,
            gateway,
            listener: Box::new(listener),
            events: events.clone(),
            authorization: AuthorizationState::NotDetermined,
            last_visibility: None,
            has_centered_on_first_appearance: false,
            view_appeared: false,
            app_active: true,
            cache: AnnotationCache::new(),
            last_requested: None,
            next_sequence: 0,
            newest_applied: None,
        };
        let task = tokio::spawn(coordinator.run(inbox));

        CoordinatorHandle {
            events,
            task: Some(task),
        }
    }

    async fn run(mut self, mut inbox: UnboundedReceiver<Event>) {
        let mut authorization = self.location.subscribe_authorization();
        let initial = *authorization.borrow_and_update();
        self.on_authorization_changed(initial);
        let mut authorization_open = true;

        loop {
            tokio::select! {
                event = inbox.recv() => match event {
                    Some(Event::Shutdown) | None => break,
                    Some(event) => self.handle(event),
                },
                changed = authorization.changed(), if authorization_open => match changed {
                    Ok(()) => {
                        let state = *authorization.borrow_and_update();
                        self.on_authorization_changed(state);
                    }
                    Err(_) => {
                        debug!("Authorization stream closed");
                        authorization_open = false;
                    }
                },
                () = sleep_until(self.throttle.deadline()) => {
                    if let Some(coordinate) = self.throttle.fire() {
                        self.dispatch_search(coordinate);
                    }
                }
            }
        }

        self.location.stop();
        info!(
            pins = self.cache.len(),
            searches = self.next_sequence,
            last_requested = ?self.last_requested.as_ref().map(|r| r.coordinate),
            "Search coordinator stopped"
        );
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Lifecycle(event) => self.on_lifecycle(event),
            Event::AuthorizationChanged(state) => self.on_authorization_changed(state),
            Event::ViewportChanged(center) => {
                debug!(%center, "Viewport changed");
                self.throttle.offer(center, Instant::now());
            }
            Event::CenteringRequested => self.on_centering_requested(),
            Event::VenueSelected(venue) => {
                info!(venue_id = %venue.id, "Venue selected");
                self.listener.venue_details_requested(venue);
            }
            Event::FixResolved { purpose, result } => self.on_fix_resolved(purpose, result),
            Event::SearchCompleted { request, result } => self.on_search_completed(request, result),
            Event::Shutdown => {}
        }
    }

    #[instrument(level = "debug", skip(self))]
    fn on_authorization_changed(&mut self, state: AuthorizationState) {
        self.authorization = state;

        let visible = state.is_authorized();
        if self.last_visibility == Some(visible) {
            debug!(visible, "Visibility unchanged, not emitted");
        } else {
            self.last_visibility = Some(visible);
            self.listener.user_location_visibility_changed(visible);
        }

        // updates resume only for a visible map in a foreground app
        if self.view_appeared && self.app_active && state.allows_updates() {
            self.location.start();
        }
    }

    #[instrument(level = "debug", skip(self))]
    fn on_lifecycle(&mut self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::ViewAppeared => {
                self.view_appeared = true;
                self.app_active = true;
                self.throttle.open_gate(Instant::now());
                if !self.has_centered_on_first_appearance {
                    self.has_centered_on_first_appearance = true;
                    info!("First appearance, centring on the user");
                    self.fetch_fix(FixPurpose::FirstAppearance);
                }
                self.start_updates_if_allowed();
            }
            LifecycleEvent::AppActivated => {
                self.app_active = true;
                self.start_updates_if_allowed();
            }
            LifecycleEvent::ViewDisappeared => {
                self.view_appeared = false;
                self.location.stop();
            }
            LifecycleEvent::AppDeactivated => {
                self.app_active = false;
                self.location.stop();
            }
        }
    }

    fn start_updates_if_allowed(&self) {
        if self.authorization.allows_updates() {
            self.location.start();
        } else {
            debug!(authorization = ?self.authorization, "Location updates not allowed");
        }
    }

    #[instrument(level = "debug", skip(self))]
    fn on_centering_requested(&mut self) {
        let denied = self.authorization == AuthorizationState::Denied;
        if denied {
            warn!("Centring requested while location access is denied");
            self.listener
                .error_occurred(MapError::location_services_not_authorized());
        }

        if let Some(center) = self.location.last_known() {
            self.listener
                .zoom_requested(self.config.centering_zoom_level, center);
            self.dispatch_search(center);
        } else if !denied {
            self.fetch_fix(FixPurpose::Centering);
        }
    }

    fn fetch_fix(&self, purpose: FixPurpose) {
        let location = Arc::clone(&self.location);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = location.fetch_once().await;
            // the loop may already be gone
            let _ = events.send(Event::FixResolved { purpose, result });
        });
    }

    fn on_fix_resolved(
        &mut self,
        purpose: FixPurpose,
        result: std::result::Result<Coordinate, LocationError>,
    ) {
        match (purpose, result) {
            (FixPurpose::FirstAppearance, Ok(center)) => {
                self.listener
                    .zoom_requested(self.config.city_zoom_level, center);
            }
            (FixPurpose::Centering, Ok(center)) => {
                self.listener
                    .zoom_requested(self.config.centering_zoom_level, center);
            }
            (FixPurpose::FirstAppearance, Err(e)) => {
                warn!(error = %e, "Cannot fetch current user location");
                self.listener
                    .error_occurred(MapError::cannot_fetch_user_location());
            }
            (FixPurpose::Centering, Err(e)) => {
                warn!(error = %e, "Cannot get location for centring");
                self.listener.error_occurred(MapError::cannot_get_location());
            }
        }
    }

    #[instrument(skip_all, fields(%coordinate))]
    fn dispatch_search(&mut self, coordinate: Coordinate) {
        self.next_sequence += 1;
        let request = SearchRequest {
            coordinate,
            issued_at: Utc::now(),
            sequence: self.next_sequence,
        };
        info!(sequence = request.sequence, "Dispatching venue search");
        self.last_requested = Some(request.clone());

        let gateway = Arc::clone(&self.gateway);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = gateway.search_venues(request.coordinate).await;
            let _ = events.send(Event::SearchCompleted { request, result });
        });
    }

    fn on_search_completed(
        &mut self,
        request: SearchRequest,
        result: std::result::Result<Vec<Venue>, SearchError>,
    ) {
        let elapsed_ms = (Utc::now() - request.issued_at).num_milliseconds();
        match result {
            Ok(venues) => {
                if self.config.discard_stale_responses
                    && self
                        .newest_applied
                        .is_some_and(|newest| request.sequence < newest)
                {
                    debug!(
                        sequence = request.sequence,
                        newest = self.newest_applied,
                        "Discarding stale search response"
                    );
                    return;
                }
                self.newest_applied = Some(
                    self.newest_applied
                        .map_or(request.sequence, |newest| newest.max(request.sequence)),
                );

                info!(
                    sequence = request.sequence,
                    venues = venues.len(),
                    elapsed_ms,
                    "Search completed"
                );
                let snapshot = self
                    .cache
                    .upsert_all(venues.into_iter().map(Annotation::from_venue));
                self.listener.pins_updated(snapshot);
            }
            Err(e) => {
                warn!(
                    sequence = request.sequence,
                    code = e.code(),
                    error = %e,
                    elapsed_ms,
                    "Search failed"
                );
                self.listener.error_occurred(MapError::from(&e));
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}

/// Input side of a running [`SearchCoordinator`].
///
/// Every method fails with [`NearbyError::CoordinatorClosed`] once the
/// coordinator has stopped. Dropping the handle aborts the coordinator task;
/// use [`close`](Self::close) for an orderly shutdown.
#[derive(Debug)]
pub struct CoordinatorHandle {
    events: UnboundedSender<Event>,
    task: Option<JoinHandle<()>>,
}

impl CoordinatorHandle {
    fn send(&self, event: Event) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| NearbyError::CoordinatorClosed)
    }

    pub fn lifecycle(&self, event: LifecycleEvent) -> Result<()> {
        self.send(Event::Lifecycle(event))
    }

    pub fn authorization_changed(&self, state: AuthorizationState) -> Result<()> {
        self.send(Event::AuthorizationChanged(state))
    }

    pub fn viewport_changed(&self, center: Coordinate) -> Result<()> {
        self.send(Event::ViewportChanged(center))
    }

    pub fn centering_requested(&self) -> Result<()> {
        self.send(Event::CenteringRequested)
    }

    /// Ask for the details of the venue behind a pin.
    ///
    /// # Panics
    ///
    /// Panics when the annotation carries no venue. Pins created from search
    /// results always do, so this indicates a caller bug.
    pub fn venue_selected(&self, annotation: &Annotation) -> Result<()> {
        let Some(venue) = annotation.venue() else {
            panic!("selected annotation {annotation} carries no venue");
        };
        self.send(Event::VenueSelected(Arc::clone(venue)))
    }

    pub fn is_closed(&self) -> bool {
        self.events.is_closed()
    }

    /// Stop the coordinator and wait for it to finish.
    ///
    /// Location updates are stopped and the authorization subscription is
    /// released. Searches already in flight are left to complete and their
    /// results are ignored.
    pub async fn close(mut self) -> Result<()> {
        // a loop that already exited has nothing left to stop
        let _ = self.events.send(Event::Shutdown);
        if let Some(task) = self.task.take() {
            task.await.map_err(|_| NearbyError::CoordinatorClosed)?;
        }
        Ok(())
    }
}

impl Drop for CoordinatorHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
