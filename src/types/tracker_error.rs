use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("location permission denied (fine and coarse)")]
    PermissionDenied,

    #[error("invalid coordinate ({x}, {y}): {reason}")]
    InvalidCoordinate {
        x: String,
        y: String,
        reason: String,
    },

    #[error("alert side effect failed: {0}")]
    NotificationSideEffectFailure(String),

    #[error("failed to register for location updates: {0}")]
    LocationRegistration(String),

    #[error("failed to enter foreground: {0}")]
    Foreground(String),
}
