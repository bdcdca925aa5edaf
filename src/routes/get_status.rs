use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    services::{
        map_view::map_screen::TrackingMode,
        tracking::{
            alert_trigger::AlertState,
            foreground::{ForegroundNotification, NotificationChannel},
        },
    },
    types::app_state::AppState,
};

#[derive(Serialize, Deserialize)]
pub struct GetStatusResponseData {
    pub has_location_access: bool,
    pub service_running: bool,
    pub alert_state: Option<AlertState>,
    pub foreground: Option<ForegroundNotification>,
    pub notification_channels: Vec<NotificationChannel>,
    pub map_attached: bool,
    pub tracking_mode: TrackingMode,
}

#[derive(Serialize, Deserialize)]
pub struct GetStatusResponse {
    pub data: GetStatusResponseData,
}

pub async fn get_status(State(state): State<AppState>) -> Response {
    let service = state.tracking.current();
    let screen = state.screen.read().await;

    Json(GetStatusResponse {
        data: GetStatusResponseData {
            has_location_access: state.permission_gate.has_required_access(),
            service_running: service.as_ref().map(|s| s.is_running()).unwrap_or(false),
            alert_state: service.as_ref().map(|s| s.alert_state()),
            foreground: state.notification_host.foreground(),
            notification_channels: state.notification_host.channels(),
            map_attached: screen.map.attached,
            tracking_mode: screen.map.tracking_mode,
        },
    })
    .into_response()
}
