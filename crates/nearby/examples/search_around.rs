//! Restaurants around a fixed position
//!
//! This example drives a map session the way a platform map screen would:
//! - The location permission is granted and a position fix arrives
//! - The map zooms onto the user and reports its new visible region
//! - Pins arrive from Foursquare and the first venue's details are opened
//!
//! Requires `FOURSQUARE_CLIENT_ID` and `FOURSQUARE_CLIENT_SECRET`.

use std::{sync::Arc, time::Duration};

use bytes::Bytes;
use nearby::{
    AuthorizationState, CoordinatorConfigBuilder, ManualLocationSource, MapOutput, MapSession,
    TextDetails, VenueDetailsListener,
    provider::{Coordinate, FoursquareClient, FoursquareConfig},
};
use tokio::sync::oneshot;

struct PrintingDetails {
    done: Option<oneshot::Sender<()>>,
}

impl VenueDetailsListener for PrintingDetails {
    fn show_text_details(&mut self, details: TextDetails) {
        println!("\n{}\n{}", details.title, details.address);
    }

    fn start_spinner(&mut self) {
        println!("  loading photo...");
    }

    fn stop_spinner(&mut self) {}

    fn show_venue_image(&mut self, image: Option<Bytes>) {
        match image {
            Some(bytes) => println!("  photo: {} bytes", bytes.len()),
            None => println!("  no photo"),
        }
        if let Some(done) = self.done.take() {
            let _ = done.send(());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nearby::init_logging(tracing::Level::INFO)?;

    let gateway = Arc::new(FoursquareClient::new(FoursquareConfig::from_env()?)?);
    let config = CoordinatorConfigBuilder::responsive().build();
    let location = Arc::new(ManualLocationSource::from_config(
        AuthorizationState::NotDetermined,
        &config,
    ));

    let (session, mut outputs) = MapSession::start(location.clone(), gateway, config);
    session.map().on_view_appeared()?;

    // the platform asks for permission and gets a fix shortly after
    location.set_authorization(AuthorizationState::AuthorizedWhenInUse);
    tokio::time::sleep(Duration::from_millis(50)).await;
    location.push_position(Coordinate::new(40.7217, -73.988));

    let deadline = tokio::time::sleep(Duration::from_secs(20));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            () = &mut deadline => {
                println!("No results in time");
                break;
            }
            output = outputs.recv() => match output {
                Some(MapOutput::Zoom { level, center }) => {
                    println!("Zoom to {center} at level {level}");
                    session.map().on_visible_region_changed(center)?;
                }
                Some(MapOutput::Pins(pins)) => {
                    println!("{} restaurants nearby:", pins.len());
                    for pin in pins.iter().take(10) {
                        println!("  {pin}");
                    }
                    if let Some(venue) = pins.first().and_then(|pin| pin.venue()) {
                        let (done, finished) = oneshot::channel();
                        let listener = PrintingDetails { done: Some(done) };
                        let details = session.open_venue_details(Arc::clone(venue), listener);
                        let _ = finished.await;
                        details.close();
                    }
                    break;
                }
                Some(MapOutput::Error(error)) => println!("Error: {error}"),
                Some(_) => {}
                None => break,
            }
        }
    }

    session.close().await?;
    Ok(())
}
