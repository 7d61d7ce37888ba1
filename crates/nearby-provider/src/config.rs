use std::time::Duration;

use crate::{ProviderError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.foursquare.com/v2";
pub const DEFAULT_API_VERSION: &str = "20210207";
pub const DEFAULT_QUERY: &str = "restaurant";
pub const DEFAULT_LIMIT: u32 = 50;
pub const DEFAULT_PHOTO_SIZE: &str = "original";
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub const CLIENT_ID_ENV: &str = "FOURSQUARE_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "FOURSQUARE_CLIENT_SECRET";
pub const API_VERSION_ENV: &str = "FOURSQUARE_API_VERSION";

/// Settings for talking to the Foursquare v2 venues API.
#[derive(Debug, Clone)]
pub struct FoursquareConfig {
    /// API root, without a trailing slash
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Version date sent as the `v` parameter (`YYYYMMDD`)
    pub api_version: String,
    /// Free text sent as the `query` parameter
    pub query: String,
    /// Maximum number of venues per search (`limit` parameter, 1..=50)
    pub limit: u32,
    /// Size segment used when building photo URLs
    pub photo_size: String,
    /// Per request timeout
    pub timeout: Duration,
    /// Images larger than this are dropped rather than shown
    pub max_image_bytes: usize,
}

impl Default for FoursquareConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
            query: DEFAULT_QUERY.to_string(),
            limit: DEFAULT_LIMIT,
            photo_size: DEFAULT_PHOTO_SIZE.to_string(),
            timeout: Duration::from_secs(15),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl FoursquareConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            ..Self::default()
        }
    }

    /// Read credentials from `FOURSQUARE_CLIENT_ID` / `FOURSQUARE_CLIENT_SECRET`
    /// and an optional `FOURSQUARE_API_VERSION`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`FoursquareConfig::from_env`] but with a caller supplied lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let client_id =
            non_empty(CLIENT_ID_ENV).ok_or(ProviderError::MissingCredential(CLIENT_ID_ENV))?;
        let client_secret = non_empty(CLIENT_SECRET_ENV)
            .ok_or(ProviderError::MissingCredential(CLIENT_SECRET_ENV))?;

        let mut config = Self::new(client_id, client_secret);
        if let Some(version) = non_empty(API_VERSION_ENV) {
            config = config.api_version(version)?;
        }
        Ok(config)
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Result<Self> {
        let version = version.into();
        if version.len() != 8 || !version.chars().all(|c| c.is_ascii_digit()) {
            return Err(ProviderError::InvalidConfig(format!(
                "API version must be a YYYYMMDD date, got '{version}'"
            )));
        }
        self.api_version = version;
        Ok(self)
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Foursquare caps search results at 50.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, DEFAULT_LIMIT);
        self
    }

    pub fn photo_size(mut self, size: impl Into<String>) -> Self {
        self.photo_size = size.into();
        self
    }

    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub const fn max_image_bytes(mut self, max: usize) -> Self {
        self.max_image_bytes = max;
        self
    }

    /// Full URL for an API path such as `venues/search`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
