pub mod map_view;
pub mod place_search;
pub mod place_store;
pub mod tracking;
