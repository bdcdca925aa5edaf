pub mod coordinate_converter;
pub mod map_screen;
pub mod search_result_sync;
pub mod search_ui;
