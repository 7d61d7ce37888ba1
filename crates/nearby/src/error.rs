use thiserror::Error;

#[derive(Error, Debug)]
pub enum NearbyError {
    #[error("Provider error: {0}")]
    Provider(#[from] nearby_provider::ProviderError),
    #[error("Location error: {0}")]
    Location(#[from] crate::location::LocationError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Search coordinator is no longer running")]
    CoordinatorClosed,
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),
}

pub type Result<T> = std::result::Result<T, NearbyError>;
