use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    services::tracking::{alert_trigger::AlertState, tracking_service::StartMode},
    types::app_state::AppState,
    utils::app_error::AppError,
};

#[derive(Serialize, Deserialize)]
pub struct PostTrackingRestartResponseData {
    pub start_mode: StartMode,
    pub alert_state: AlertState,
}

#[derive(Serialize, Deserialize)]
pub struct PostTrackingRestartResponse {
    pub data: PostTrackingRestartResponseData,
}

/// Kills the running service and lets it come back the way a sticky service
/// does after the host reclaims it. The new instance is armed again.
pub async fn post_tracking_restart(State(state): State<AppState>) -> Result<Response, AppError> {
    if state.tracking.current().is_none() {
        warn!("Restart requested while tracking is stopped");
        return Err(AppError::TrackingStopped);
    }

    let start_mode = state.tracking.restart().await;
    let alert_state = state
        .tracking
        .current()
        .map(|s| s.alert_state())
        .ok_or(AppError::Internal)?;

    Ok(Json(PostTrackingRestartResponse {
        data: PostTrackingRestartResponseData {
            start_mode,
            alert_state,
        },
    })
    .into_response())
}
