//! Scripted collaborators shared by the integration tests.
#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use bytes::Bytes;
use futures::future::BoxFuture;
use nearby::{
    AuthorizationState, LocationError, LocationSource, MapOutput, TextDetails,
    VenueDetailsListener,
    provider::{Coordinate, SearchError, SearchGateway, Venue, VenuePhoto, test_data},
};
use tokio::sync::{
    broadcast,
    mpsc::{self, UnboundedReceiver, UnboundedSender},
    watch,
};

pub fn setup_test_env() {
    let _ = nearby::init_logging(tracing::Level::WARN);
}

/// Let the coordinator and its spawned tasks run; with a paused clock this
/// also advances time by `millis`.
pub async fn advance(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

pub fn drain(outputs: &mut UnboundedReceiver<MapOutput>) -> Vec<MapOutput> {
    let mut drained = Vec::new();
    while let Ok(output) = outputs.try_recv() {
        drained.push(output);
    }
    drained
}

pub fn zooms(outputs: &[MapOutput]) -> Vec<(u8, Coordinate)> {
    outputs
        .iter()
        .filter_map(|o| match o {
            MapOutput::Zoom { level, center } => Some((*level, *center)),
            _ => None,
        })
        .collect()
}

pub fn visibility(outputs: &[MapOutput]) -> Vec<bool> {
    outputs
        .iter()
        .filter_map(|o| match o {
            MapOutput::UserLocationVisibility(visible) => Some(*visible),
            _ => None,
        })
        .collect()
}

pub fn errors(outputs: &[MapOutput]) -> Vec<nearby::MapError> {
    outputs
        .iter()
        .filter_map(|o| match o {
            MapOutput::Error(error) => Some(error.clone()),
            _ => None,
        })
        .collect()
}

pub fn pin_updates(outputs: &[MapOutput]) -> Vec<Vec<nearby::Annotation>> {
    outputs
        .iter()
        .filter_map(|o| match o {
            MapOutput::Pins(pins) => Some(pins.clone()),
            _ => None,
        })
        .collect()
}

pub struct MockLocation {
    authorization: watch::Sender<AuthorizationState>,
    positions: broadcast::Sender<Coordinate>,
    last_known: Mutex<Option<Coordinate>>,
    fetch_result: Mutex<Result<Coordinate, LocationError>>,
    pub start_calls: AtomicUsize,
    pub stop_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
}

impl MockLocation {
    pub fn new(authorization: AuthorizationState) -> Arc<Self> {
        let (authorization, _) = watch::channel(authorization);
        let (positions, _) = broadcast::channel(8);
        Arc::new(Self {
            authorization,
            positions,
            last_known: Mutex::new(None),
            fetch_result: Mutex::new(Ok(test_data::LOWER_EAST_SIDE)),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
        })
    }

    pub fn with_last_known(self: Arc<Self>, coordinate: Coordinate) -> Arc<Self> {
        *self.last_known.lock().unwrap() = Some(coordinate);
        self
    }

    pub fn failing_fetch(self: Arc<Self>) -> Arc<Self> {
        *self.fetch_result.lock().unwrap() =
            Err(LocationError::Unavailable("no satellites".to_string()));
        self
    }

    pub fn set_authorization(&self, state: AuthorizationState) {
        self.authorization.send_replace(state);
    }

    pub fn authorization_subscribers(&self) -> usize {
        self.authorization.receiver_count()
    }

    pub fn starts(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

impl LocationSource for MockLocation {
    fn start(&self) {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn fetch_once(&self) -> BoxFuture<'_, Result<Coordinate, LocationError>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.fetch_result.lock().unwrap().clone();
        Box::pin(async move { result })
    }

    fn last_known(&self) -> Option<Coordinate> {
        *self.last_known.lock().unwrap()
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

type ScriptedSearch = (Duration, Result<Vec<Venue>, SearchError>);

#[derive(Default)]
pub struct MockGateway {
    responses: Mutex<VecDeque<ScriptedSearch>>,
    calls: Mutex<Vec<Coordinate>>,
    photo: Option<VenuePhoto>,
    photo_delay: Duration,
    image: Option<Bytes>,
    image_urls: Mutex<Vec<String>>,
    photo_size: Option<String>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next search, delivered after `delay`.
    pub fn respond(self, delay: Duration, result: Result<Vec<Venue>, SearchError>) -> Self {
        self.responses.lock().unwrap().push_back((delay, result));
        self
    }

    pub fn with_photo(mut self, photo: VenuePhoto, image: Option<Bytes>) -> Self {
        self.photo = Some(photo);
        self.image = image;
        self
    }

    pub fn with_photo_delay(mut self, delay: Duration) -> Self {
        self.photo_delay = delay;
        self
    }

    pub fn with_photo_size(mut self, size: &str) -> Self {
        self.photo_size = Some(size.to_string());
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<Coordinate> {
        self.calls.lock().unwrap().clone()
    }

    pub fn image_urls(&self) -> Vec<String> {
        self.image_urls.lock().unwrap().clone()
    }
}

impl SearchGateway for MockGateway {
    fn search_venues(
        &self,
        coordinate: Coordinate,
    ) -> BoxFuture<'_, Result<Vec<Venue>, SearchError>> {
        self.calls.lock().unwrap().push(coordinate);
        let (delay, result) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((Duration::ZERO, Ok(Vec::new())));
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            result
        })
    }

    fn fetch_photo(&self, _venue_id: &str) -> BoxFuture<'_, Option<VenuePhoto>> {
        let photo = self.photo.clone();
        let delay = self.photo_delay;
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            photo
        })
    }

    fn fetch_image(&self, url: &str) -> BoxFuture<'_, Option<Bytes>> {
        self.image_urls.lock().unwrap().push(url.to_string());
        let image = self.image.clone();
        Box::pin(async move { image })
    }

    fn photo_size(&self) -> &str {
        self.photo_size.as_deref().unwrap_or("original")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsOutput {
    Text(TextDetails),
    StartSpinner,
    StopSpinner,
    Image(Option<Bytes>),
}

pub struct RecordingDetailsListener {
    outputs: UnboundedSender<DetailsOutput>,
}

impl RecordingDetailsListener {
    pub fn channel() -> (Self, UnboundedReceiver<DetailsOutput>) {
        let (outputs, rx) = mpsc::unbounded_channel();
        (Self { outputs }, rx)
    }
}

impl VenueDetailsListener for RecordingDetailsListener {
    fn show_text_details(&mut self, details: TextDetails) {
        let _ = self.outputs.send(DetailsOutput::Text(details));
    }

    fn start_spinner(&mut self) {
        let _ = self.outputs.send(DetailsOutput::StartSpinner);
    }

    fn stop_spinner(&mut self) {
        let _ = self.outputs.send(DetailsOutput::StopSpinner);
    }

    fn show_venue_image(&mut self, image: Option<Bytes>) {
        let _ = self.outputs.send(DetailsOutput::Image(image));
    }
}
