pub mod app_state;
pub mod location_fix;
pub mod place;
pub mod tracker_error;
