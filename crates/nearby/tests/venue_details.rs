//! Integration tests for the venue details flow and the map session
//! that owns it.

mod common;

use std::time::Duration;

use bytes::Bytes;
use common::{
    DetailsOutput, MockGateway, MockLocation, RecordingDetailsListener, advance, setup_test_env,
};
use nearby::{
    AuthorizationState, CoordinatorConfig, MapSession, TextDetails, VenueDetailsViewModel,
    provider::{Venue, test_data},
};
use tokio::sync::mpsc::UnboundedReceiver;

fn drain(outputs: &mut UnboundedReceiver<DetailsOutput>) -> Vec<DetailsOutput> {
    let mut drained = Vec::new();
    while let Ok(output) = outputs.try_recv() {
        drained.push(output);
    }
    drained
}

#[tokio::test]
async fn test_venue_without_photo_stops_spinner_and_shows_nothing() {
    setup_test_env();
    let gateway = MockGateway::new().shared();
    let (listener, mut outputs) = RecordingDetailsListener::channel();
    let mut details =
        VenueDetailsViewModel::new(test_data::mr_purple().shared(), gateway.clone(), listener);

    details.on_view_loaded().await;

    assert_eq!(
        drain(&mut outputs),
        vec![
            DetailsOutput::Text(TextDetails {
                title: "Mr. Purple".to_string(),
                address: String::new(),
            }),
            DetailsOutput::StartSpinner,
            DetailsOutput::StopSpinner,
            DetailsOutput::Image(None),
        ]
    );
    assert!(gateway.image_urls().is_empty(), "No download without a photo");
}

#[tokio::test]
async fn test_venue_photo_is_downloaded_at_requested_size() {
    setup_test_env();
    let image = Bytes::from_static(b"\xff\xd8\xff\xe0 jpeg");
    let gateway = MockGateway::new()
        .with_photo(test_data::sample_photo(), Some(image.clone()))
        .shared();
    let (listener, mut outputs) = RecordingDetailsListener::channel();
    let mut details =
        VenueDetailsViewModel::new(test_data::katz().shared(), gateway.clone(), listener)
            .photo_size("300x300");

    details.on_view_loaded().await;

    let outputs = drain(&mut outputs);
    assert_eq!(outputs.len(), 4);
    assert_eq!(outputs[1], DetailsOutput::StartSpinner);
    assert_eq!(outputs[2], DetailsOutput::StopSpinner);
    assert_eq!(outputs[3], DetailsOutput::Image(Some(image)));
    assert_eq!(
        gateway.image_urls(),
        vec![test_data::sample_photo().url("300x300")]
    );
}

#[tokio::test]
async fn test_failed_download_still_stops_spinner() {
    setup_test_env();
    let gateway = MockGateway::new()
        .with_photo(test_data::sample_photo(), None)
        .shared();
    let (listener, mut outputs) = RecordingDetailsListener::channel();
    let mut details =
        VenueDetailsViewModel::new(test_data::katz().shared(), gateway.clone(), listener);

    details.on_view_loaded().await;

    let outputs = drain(&mut outputs);
    assert_eq!(outputs.last(), Some(&DetailsOutput::Image(None)));
    assert!(outputs.contains(&DetailsOutput::StopSpinner));
    assert_eq!(
        gateway.image_urls(),
        vec![test_data::sample_photo().url("original")]
    );
}

#[tokio::test(start_paused = true)]
async fn test_session_runs_details_flow() -> anyhow::Result<()> {
    setup_test_env();
    let (session, _map_outputs) = MapSession::start(
        MockLocation::new(AuthorizationState::AuthorizedWhenInUse),
        MockGateway::new().shared(),
        CoordinatorConfig::default(),
    );
    let (listener, mut outputs) = RecordingDetailsListener::channel();

    let details = session.open_venue_details(test_data::katz().shared(), listener);
    assert_eq!(details.venue_id(), "4a4a6d83f964a520c2ab1fe3");
    advance(10).await;

    assert_eq!(drain(&mut outputs).last(), Some(&DetailsOutput::Image(None)));
    details.close();
    assert_eq!(session.open_details_count(), 0);

    session.close().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_closing_details_detaches_and_aborts() -> anyhow::Result<()> {
    setup_test_env();
    let gateway = MockGateway::new()
        .with_photo(test_data::sample_photo(), None)
        .with_photo_delay(Duration::from_secs(10))
        .shared();
    let (session, _map_outputs) = MapSession::start(
        MockLocation::new(AuthorizationState::AuthorizedWhenInUse),
        gateway.clone(),
        CoordinatorConfig::default(),
    );

    let (first_listener, mut first) = RecordingDetailsListener::channel();
    let (second_listener, _second) = RecordingDetailsListener::channel();
    let first_details = session.open_venue_details(test_data::katz().shared(), first_listener);
    let second_details =
        session.open_venue_details(test_data::russ_and_daughters().shared(), second_listener);
    advance(10).await;
    assert_eq!(session.open_details_count(), 2);

    first_details.close();
    assert_eq!(session.open_details_count(), 1);

    advance(20_000).await;
    let first = drain(&mut first);
    assert_eq!(first.last(), Some(&DetailsOutput::StartSpinner), "Aborted mid-load");
    assert_eq!(gateway.image_urls().len(), 1, "Only the open flow downloads");

    session.close().await?;
    // the parent is gone, closing the child is a no-op
    second_details.close();
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_session_close_aborts_unfinished_children() -> anyhow::Result<()> {
    setup_test_env();
    let gateway = MockGateway::new()
        .with_photo(test_data::sample_photo(), None)
        .with_photo_delay(Duration::from_secs(10))
        .shared();
    let location = MockLocation::new(AuthorizationState::AuthorizedWhenInUse);
    let (session, _map_outputs) =
        MapSession::start(location.clone(), gateway.clone(), CoordinatorConfig::default());

    let (listener, mut outputs) = RecordingDetailsListener::channel();
    let venue = Venue::new("x", "Late Night Dumplings", test_data::LOWER_EAST_SIDE).shared();
    let _details = session.open_venue_details(venue, listener);
    advance(10).await;

    session.close().await?;
    advance(20_000).await;

    assert_eq!(drain(&mut outputs).last(), Some(&DetailsOutput::StartSpinner));
    assert!(gateway.image_urls().is_empty());
    assert_eq!(location.stops(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_finished_flows_leave_the_session() -> anyhow::Result<()> {
    setup_test_env();
    let (session, _map_outputs) = MapSession::start(
        MockLocation::new(AuthorizationState::AuthorizedWhenInUse),
        MockGateway::new().shared(),
        CoordinatorConfig::default(),
    );

    let mut receivers = Vec::new();
    for _ in 0..100 {
        let (listener, outputs) = RecordingDetailsListener::channel();
        // the handle is dropped right away
        let _ = session.open_venue_details(test_data::katz().shared(), listener);
        receivers.push(outputs);
    }
    advance(1000).await;

    assert_eq!(session.open_details_count(), 0);
    for outputs in &mut receivers {
        assert_eq!(drain(outputs).last(), Some(&DetailsOutput::Image(None)));
    }

    session.close().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_session_details_use_gateway_photo_size() -> anyhow::Result<()> {
    setup_test_env();
    let gateway = MockGateway::new()
        .with_photo(test_data::sample_photo(), Some(Bytes::from_static(b"jpeg")))
        .with_photo_size("100x100")
        .shared();
    let (session, _map_outputs) = MapSession::start(
        MockLocation::new(AuthorizationState::AuthorizedWhenInUse),
        gateway.clone(),
        CoordinatorConfig::default(),
    );
    let (listener, _outputs) = RecordingDetailsListener::channel();

    let _details = session.open_venue_details(test_data::katz().shared(), listener);
    advance(10).await;

    assert_eq!(
        gateway.image_urls(),
        vec![test_data::sample_photo().url("100x100")]
    );
    session.close().await?;
    Ok(())
}
