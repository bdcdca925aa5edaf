use std::sync::Arc;

use tokio::sync::RwLock;

use crate::services::{
    map_view::{map_screen::MapScreen, search_result_sync::SearchResultSync},
    place_search::place_search_service::PlaceLookup,
    place_store::saved_place_store::PlaceStore,
    tracking::{
        foreground::InMemoryNotificationHost, location_monitor::ChannelLocationSource,
        permission_gate::PermissionGate, tracking_service::TrackingSupervisor,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub permission_gate: PermissionGate,
    pub tracking: Arc<TrackingSupervisor>,
    pub location_source: Arc<ChannelLocationSource>,
    pub notification_host: Arc<InMemoryNotificationHost>,
    pub place_lookup: Arc<dyn PlaceLookup>,
    pub search_sync: SearchResultSync,
    pub screen: Arc<RwLock<MapScreen>>,
    pub place_store: PlaceStore,
    pub auth_key: Option<String>,
}
