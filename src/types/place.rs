use serde::{Deserialize, Serialize};

/// Geographic position used for display on the map.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// One place returned by the lookup, with its coordinates still in the
/// lookup's native encoding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    pub name: String,
    pub native_x: String,
    pub native_y: String,
    pub index: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Total matches reported by the lookup; may exceed `items.len()`.
    pub total: i64,
    pub items: Vec<PlaceResult>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerIcon {
    Black,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerTint {
    Red,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub icon: MarkerIcon,
    pub tint: MarkerTint,
}

impl MarkerStyle {
    pub const HIGHLIGHTED: MarkerStyle = MarkerStyle {
        icon: MarkerIcon::Black,
        tint: MarkerTint::Red,
    };
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub position: LatLng,
    /// 1-based, matches the row of the same place in the result list.
    pub tag: usize,
    pub style: MarkerStyle,
}
