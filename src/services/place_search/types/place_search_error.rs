use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaceSearchError {
    #[error("Failed to send request: {0}")]
    Request(String),

    #[error("Lookup returned status {0}")]
    Status(u16),

    #[error("Failed to get response body: {0}")]
    Body(String),
}
