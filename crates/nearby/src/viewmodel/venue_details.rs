use std::{fmt, sync::Arc};

use bytes::Bytes;
use nearby_provider::{SearchGateway, Venue};
use tracing::{debug, instrument};

/// Receiver of the venue details screen outputs.
pub trait VenueDetailsListener: Send + 'static {
    fn show_text_details(&mut self, details: TextDetails);

    fn start_spinner(&mut self);

    fn stop_spinner(&mut self);

    /// `None` when the venue has no photo or it could not be downloaded.
    fn show_venue_image(&mut self, image: Option<Bytes>);
}

/// Text shown at the top of the details screen.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDetails {
    pub title: String,
    pub address: String,
}

impl From<&Venue> for TextDetails {
    fn from(venue: &Venue) -> Self {
        let address = match (&venue.formatted_address, &venue.address) {
            (Some(lines), _) if !lines.is_empty() => lines.join("\n"),
            (_, Some(address)) => address.clone(),
            _ => String::new(),
        };
        Self {
            title: venue.name.clone(),
            address,
        }
    }
}

/// Drives the details screen of one venue.
pub struct VenueDetailsViewModel<L> {
    venue: Arc<Venue>,
    gateway: Arc<dyn SearchGateway>,
    listener: L,
    photo_size: String,
}

impl<L: VenueDetailsListener> VenueDetailsViewModel<L> {
    /// Photos are requested at the gateway's configured size.
    pub fn new(venue: Arc<Venue>, gateway: Arc<dyn SearchGateway>, listener: L) -> Self {
        let photo_size = gateway.photo_size().to_string();
        Self {
            venue,
            gateway,
            listener,
            photo_size,
        }
    }

    /// Override the photo size requested from the provider, e.g. `"300x300"`.
    pub fn photo_size(mut self, size: impl Into<String>) -> Self {
        self.photo_size = size.into();
        self
    }

    pub fn venue(&self) -> &Venue {
        &self.venue
    }

    /// Show the venue text, then load and show its first photo.
    ///
    /// There is no error path: a missing photo and a failed download both end
    /// with `show_venue_image(None)`.
    #[instrument(skip(self), fields(venue_id = %self.venue.id))]
    pub async fn on_view_loaded(&mut self) {
        self.listener
            .show_text_details(TextDetails::from(self.venue.as_ref()));
        self.listener.start_spinner();

        let image = match self.gateway.fetch_photo(&self.venue.id).await {
            Some(photo) => self.gateway.fetch_image(&photo.url(&self.photo_size)).await,
            None => {
                debug!("Venue has no photo");
                None
            }
        };

        self.listener.stop_spinner();
        self.listener.show_venue_image(image);
    }

    pub fn into_listener(self) -> L {
        self.listener
    }
}

impl<L> fmt::Debug for VenueDetailsViewModel<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VenueDetailsViewModel")
            .field("venue", &self.venue.id)
            .field("photo_size", &self.photo_size)
            .finish_non_exhaustive()
    }
}
