/// Errors surfaced to callers that look up a single geolocation.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found for key {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Invalid IP address: {0:?}")]
    InvalidIpAddress(String),
}

/// The import source could not be decoded at all, so no batch exists.
#[derive(Debug, thiserror::Error)]
#[error("Cannot decode source: {0}")]
pub struct StreamError(pub String);
