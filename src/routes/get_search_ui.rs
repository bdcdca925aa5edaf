use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    services::map_view::{map_screen::MapScreen, search_ui::SearchUiVisibility},
    types::{app_state::AppState, place::MapMarker},
};

#[derive(Serialize, Deserialize)]
pub struct SearchUiResponseDataRow {
    pub row: usize,
    pub name: String,
}

#[derive(Serialize, Deserialize)]
pub struct SearchUiResponseData {
    pub search_box: SearchUiVisibility,
    pub results_visible: bool,
    pub summary: String,
    pub rows: Vec<SearchUiResponseDataRow>,
    pub markers: Vec<MapMarker>,
}

#[derive(Serialize, Deserialize)]
pub struct SearchUiResponse {
    pub data: SearchUiResponseData,
}

impl SearchUiResponse {
    pub fn from_screen(screen: &MapScreen) -> Self {
        SearchUiResponse {
            data: SearchUiResponseData {
                search_box: screen.search_ui.visibility(),
                results_visible: screen.results.visible,
                summary: screen.results.summary.clone(),
                rows: screen
                    .results
                    .places
                    .iter()
                    .map(|p| SearchUiResponseDataRow {
                        row: p.index + 1,
                        name: p.name.clone(),
                    })
                    .collect(),
                markers: screen.map.markers.clone(),
            },
        }
    }
}

pub async fn get_search_ui(State(state): State<AppState>) -> Response {
    let screen = state.screen.read().await;

    Json(SearchUiResponse::from_screen(&screen)).into_response()
}
