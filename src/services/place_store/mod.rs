pub mod saved_place_store;
