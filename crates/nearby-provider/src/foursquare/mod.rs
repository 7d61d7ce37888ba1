//! Foursquare v2 venues API client.
//!
//! Request construction and response decoding are plain functions in
//! [`request`] and [`response`]; [`FoursquareClient`] only moves bytes.

pub mod request;
pub mod response;

pub use request::{Endpoint, VenueRequest};

#[cfg(feature = "http_client")]
pub use client::FoursquareClient;

#[cfg(feature = "http_client")]
mod client {
    use std::time::Instant;

    use bytes::{Bytes, BytesMut};
    use futures::{StreamExt, future::BoxFuture};
    use reqwest::Client;
    use tracing::{debug, info, instrument, warn};

    use super::{VenueRequest, response};
    use crate::{
        Coordinate, FoursquareConfig, ProviderError, SearchError, SearchGateway, Venue,
        VenuePhoto,
    };

    /// HTTP implementation of [`SearchGateway`] backed by `reqwest`.
    ///
    /// Cloning is cheap; clones share the underlying connection pool.
    #[derive(Debug, Clone)]
    pub struct FoursquareClient {
        http: Client,
        config: FoursquareConfig,
    }

    impl FoursquareClient {
        pub fn new(config: FoursquareConfig) -> Result<Self, ProviderError> {
            if config.client_id.is_empty() {
                return Err(ProviderError::MissingCredential(crate::config::CLIENT_ID_ENV));
            }
            if config.client_secret.is_empty() {
                return Err(ProviderError::MissingCredential(
                    crate::config::CLIENT_SECRET_ENV,
                ));
            }

            let http = Client::builder()
                .timeout(config.timeout)
                .user_agent(concat!("nearby/", env!("CARGO_PKG_VERSION")))
                .build()?;
            Ok(Self { http, config })
        }

        pub const fn config(&self) -> &FoursquareConfig {
            &self.config
        }

        async fn get(&self, request: &VenueRequest) -> Result<Bytes, SearchError> {
            let url = self.config.endpoint(&request.path);
            let response = self
                .http
                .get(&url)
                .query(&request.parameters)
                .send()
                .await
                .map_err(|e| SearchError::Transport(e.to_string()))?;

            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|e| SearchError::Transport(e.to_string()))?;

            if !status.is_success() {
                let detail = response::error_detail(&body)
                    .unwrap_or_else(|| "no error detail in body".to_string());
                return Err(SearchError::Transport(format!("HTTP {status}: {detail}")));
            }
            Ok(body)
        }

        /// Search restaurants around `coordinate`.
        #[instrument(name = "Foursquare venues search", skip_all, fields(%coordinate), level = "info")]
        pub async fn search(&self, coordinate: Coordinate) -> Result<Vec<Venue>, SearchError> {
            let t_request = Instant::now();
            let request = VenueRequest::venues_search(coordinate, &self.config);
            let body = self.get(&request).await?;
            let venues = response::decode_venues(&body)?;

            info!(
                venues = venues.len(),
                elapsed_ms = t_request.elapsed().as_millis(),
                "Venues search complete"
            );
            Ok(venues)
        }

        /// First photo of a venue, if it has any.
        #[instrument(name = "Foursquare venue photos", skip(self), level = "debug")]
        pub async fn first_photo(&self, venue_id: &str) -> Result<Option<VenuePhoto>, SearchError> {
            let request = VenueRequest::venue_photos(venue_id, &self.config);
            let body = self.get(&request).await?;
            response::decode_first_photo(&body)
        }

        /// Download an image, refusing bodies larger than `max_image_bytes`.
        #[instrument(name = "Download venue image", skip(self), level = "debug")]
        pub async fn download_image(&self, url: &str) -> Result<Bytes, SearchError> {
            let response = self
                .http
                .get(url)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|e| SearchError::Transport(e.to_string()))?;

            let max = self.config.max_image_bytes;
            if response.content_length().is_some_and(|len| len > max as u64) {
                return Err(SearchError::Transport(format!(
                    "image larger than {max} bytes"
                )));
            }

            let mut image = BytesMut::new();
            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(|e| SearchError::Transport(e.to_string()))?;
                if image.len() + chunk.len() > max {
                    return Err(SearchError::Transport(format!(
                        "image larger than {max} bytes"
                    )));
                }
                image.extend_from_slice(&chunk);
            }
            debug!(bytes = image.len(), "Image downloaded");
            Ok(image.freeze())
        }
    }

    impl SearchGateway for FoursquareClient {
        fn search_venues(
            &self,
            coordinate: Coordinate,
        ) -> BoxFuture<'_, Result<Vec<Venue>, SearchError>> {
            Box::pin(self.search(coordinate))
        }

        fn fetch_photo(&self, venue_id: &str) -> BoxFuture<'_, Option<VenuePhoto>> {
            let venue_id = venue_id.to_string();
            Box::pin(async move {
                match self.first_photo(&venue_id).await {
                    Ok(photo) => photo,
                    Err(e) => {
                        warn!(venue_id = %venue_id, code = e.code(), error = %e, "Photo lookup failed");
                        None
                    }
                }
            })
        }

        fn fetch_image(&self, url: &str) -> BoxFuture<'_, Option<Bytes>> {
            let url = url.to_string();
            Box::pin(async move {
                match self.download_image(&url).await {
                    Ok(image) => Some(image),
                    Err(e) => {
                        warn!(url = %url, error = %e, "Image download failed");
                        None
                    }
                }
            })
        }

        fn photo_size(&self) -> &str {
            &self.config.photo_size
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_client_requires_credentials() {
            let result = FoursquareClient::new(FoursquareConfig::default());
            assert!(matches!(result, Err(ProviderError::MissingCredential(_))));

            let result = FoursquareClient::new(FoursquareConfig::new("id", ""));
            assert!(matches!(
                result,
                Err(ProviderError::MissingCredential(crate::config::CLIENT_SECRET_ENV))
            ));
        }

        #[test]
        fn test_client_keeps_config() {
            let client =
                FoursquareClient::new(FoursquareConfig::new("id", "secret").query("pizza")).unwrap();
            assert_eq!(client.config().query, "pizza");
        }

        #[test]
        fn test_client_reports_configured_photo_size() {
            let client = FoursquareClient::new(FoursquareConfig::new("id", "secret")).unwrap();
            assert_eq!(client.photo_size(), "original");

            let client =
                FoursquareClient::new(FoursquareConfig::new("id", "secret").photo_size("300x300"))
                    .unwrap();
            assert_eq!(client.photo_size(), "300x300");
        }

        #[tokio::test]
        async fn test_unreachable_host_is_transport_error() {
            let config = FoursquareConfig::new("id", "secret")
                .base_url("http://127.0.0.1:9")
                .timeout(std::time::Duration::from_secs(2));
            let client = FoursquareClient::new(config).unwrap();

            let err = client
                .search_venues(Coordinate::new(40.7217, -73.988))
                .await
                .unwrap_err();
            assert_eq!(err.code(), 301);

            assert!(client.fetch_photo("v1").await.is_none());
        }
    }
}
