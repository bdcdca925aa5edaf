use serde::{Deserialize, Serialize};
use tracing::info;

use super::search_ui::SearchUiToggle;
use crate::types::place::{MapMarker, PlaceResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingMode {
    #[default]
    None,
    Follow,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MapSurface {
    pub attached: bool,
    pub tracking_mode: TrackingMode,
    pub markers: Vec<MapMarker>,
}

impl MapSurface {
    pub fn on_map_ready(&mut self) {
        info!("Map ready, following device location");
        self.attached = true;
        self.tracking_mode = TrackingMode::Follow;
    }
}

/// Result list and its summary line.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ResultList {
    pub places: Vec<PlaceResult>,
    pub summary: String,
    pub visible: bool,
}

/// Everything the map screen shows, updated as one unit.
#[derive(Debug, Default)]
pub struct MapScreen {
    pub map: MapSurface,
    pub results: ResultList,
    pub search_ui: SearchUiToggle,
}
