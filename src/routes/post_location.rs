use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use validator::Validate;

use crate::{
    types::{app_state::AppState, location_fix::LocationFix},
    utils::{app_error::AppError, validated_query::ValidatedJson},
};

#[derive(Validate, Serialize, Deserialize)]
pub struct PostLocationPayload {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize)]
pub struct PostLocationResponse {
    pub accepted: bool,
}

/// Device report of a new fix. Handed to the running tracking service.
pub async fn post_location(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PostLocationPayload>,
) -> Result<Response, AppError> {
    let running = state
        .tracking
        .current()
        .map(|s| s.is_running())
        .unwrap_or(false);

    if !running {
        warn!("Location reported while tracking is stopped");
        return Err(AppError::TrackingStopped);
    }

    let mut fix = LocationFix::new(payload.latitude, payload.longitude);
    if let Some(timestamp) = payload.timestamp {
        fix.timestamp = timestamp;
    }
    debug!("Location reported: {}, {}", fix.latitude, fix.longitude);

    let accepted = state.location_source.push(fix);

    Ok((StatusCode::ACCEPTED, Json(PostLocationResponse { accepted })).into_response())
}
