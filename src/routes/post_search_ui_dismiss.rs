use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use super::get_search_ui::SearchUiResponse;
use crate::types::app_state::AppState;

/// Tap on the map surface: closes the search box without searching.
pub async fn post_search_ui_dismiss(State(state): State<AppState>) -> Response {
    let mut screen = state.screen.write().await;
    screen.search_ui.on_map_tap();

    Json(SearchUiResponse::from_screen(&screen)).into_response()
}
