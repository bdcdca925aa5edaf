use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
#[cfg(test)]
use axum_macros::debug_handler;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use validator::Validate;

use super::get_search_ui::{SearchUiResponse, SearchUiResponseData};
use crate::{
    services::map_view::search_result_sync::SyncReport,
    types::app_state::AppState,
    utils::{app_error::AppError, validated_query::ValidatedQuery},
};

#[derive(Validate, Deserialize)]
pub struct GetPlaceSearchPayload {
    #[validate(length(min = 1, message = "Must be at least 1 character"))]
    pub query: String,
}

#[derive(Serialize, Deserialize)]
pub struct GetPlaceSearchResponse {
    pub data: SearchUiResponseData,
    pub rendered: usize,
    pub skipped: usize,
}

/// Submit from the search box: hides it, runs the lookup and redraws the
/// markers and list from the response.
#[cfg_attr(test, debug_handler)]
pub async fn get_place_search(
    State(state): State<AppState>,
    ValidatedQuery(payload): ValidatedQuery<GetPlaceSearchPayload>,
) -> Result<Response, AppError> {
    if payload.query.trim().is_empty() {
        return Err(AppError::BadRequest("Query must not be blank".to_string()));
    }

    let request = state.screen.write().await.search_ui.on_submit_tap(&payload.query);

    let response = state
        .place_lookup
        .search(&request.query)
        .await
        .map_err(|e| {
            error!("Failed to search places: {}", e);
            AppError::Upstream("Failed to search places".to_string())
        })?;

    let mut screen = state.screen.write().await;
    let SyncReport { rendered, skipped } = state.search_sync.on_results(response, &mut screen);
    info!("Search {:?}: {} markers, {} skipped", request.query, rendered, skipped);

    Ok(Json(GetPlaceSearchResponse {
        data: SearchUiResponse::from_screen(&screen).data,
        rendered,
        skipped,
    })
    .into_response())
}
