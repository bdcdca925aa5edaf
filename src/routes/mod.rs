use axum::{
    routing::{get, post},
    Router,
};

use crate::types::app_state::AppState;

mod get_place_search;
mod get_search_ui;
mod get_status;
mod post_location;
mod post_search_ui_dismiss;
mod post_search_ui_open;
mod post_tracking_restart;
mod saved_place;

pub fn apply_routes(app: Router<AppState>) -> Router<AppState> {
    app.route("/locations", post(post_location::post_location))
        .route("/status", get(get_status::get_status))
        .route("/search-ui", get(get_search_ui::get_search_ui))
        .route(
            "/search-ui/open",
            post(post_search_ui_open::post_search_ui_open),
        )
        .route(
            "/search-ui/dismiss",
            post(post_search_ui_dismiss::post_search_ui_dismiss),
        )
        .route(
            "/tracking/restart",
            post(post_tracking_restart::post_tracking_restart),
        )
        .route("/place-search", get(get_place_search::get_place_search))
        .route(
            "/saved-place",
            get(saved_place::get_saved_place).put(saved_place::put_saved_place),
        )
}
