use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },
    #[error("{var} is not a valid duration ({value:?}): {source}")]
    InvalidDuration {
        var: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid request uri {uri:?}: {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: hyper::http::uri::InvalidUri,
    },
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error(transparent)]
    Hyper(#[from] hyper::Error),
    #[error("request failed: {0}")]
    Request(String),
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
