use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use validator::Validate;

use crate::{
    types::app_state::AppState,
    utils::{app_error::AppError, validated_query::ValidatedJson},
};

#[derive(Validate, Serialize, Deserialize)]
pub struct SavedPlace {
    #[validate(length(max = 256, message = "Must be at most 256 characters"))]
    pub place: String,
}

#[derive(Serialize, Deserialize)]
pub struct SavedPlaceResponse {
    pub data: SavedPlace,
}

pub async fn get_saved_place(State(state): State<AppState>) -> Response {
    Json(SavedPlaceResponse {
        data: SavedPlace {
            place: state.place_store.get().await,
        },
    })
    .into_response()
}

pub async fn put_saved_place(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SavedPlace>,
) -> Result<Response, AppError> {
    state.place_store.set(&payload.place).await.map_err(|e| {
        error!("Failed to save place: {}", e);
        AppError::Internal
    })?;

    Ok(Json(SavedPlaceResponse { data: payload }).into_response())
}
