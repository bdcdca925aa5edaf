use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{
    middlewares::auth::auth_middleware,
    routes::apply_routes,
    services::{
        map_view::{
            coordinate_converter::CoordinateConverter, map_screen::MapScreen,
            search_result_sync::SearchResultSync,
        },
        place_search::place_search_service::PlaceSearchService,
        place_store::saved_place_store::PlaceStore,
        tracking::{
            foreground::InMemoryNotificationHost,
            location_monitor::ChannelLocationSource,
            permission_gate::{PermissionGate, StaticPermissionProvider},
            tracking_service::TrackingSupervisor,
        },
    },
    types::{app_state::AppState, tracker_error::TrackerError},
    utils::{config::AppConfig, sms_client::SmsClient},
};

pub fn build_state(config: &AppConfig) -> AppState {
    let location_source = Arc::new(ChannelLocationSource::new());
    let notification_host = Arc::new(InMemoryNotificationHost::new());

    AppState {
        permission_gate: PermissionGate::new(Arc::new(StaticPermissionProvider::new(
            config.granted_permissions.clone(),
        ))),
        tracking: Arc::new(TrackingSupervisor::new(
            config.application_id.clone(),
            notification_host.clone(),
            location_source.clone(),
            Arc::new(SmsClient::new(config.sms.clone())),
        )),
        location_source,
        notification_host,
        place_lookup: Arc::new(PlaceSearchService::new(config.place_search.clone())),
        search_sync: SearchResultSync::new(CoordinateConverter::new(config.coordinate_system)),
        screen: Arc::new(RwLock::new(MapScreen::default())),
        place_store: PlaceStore::new(config.saved_place_path.clone()),
        auth_key: config.auth_key.clone(),
    }
}

/// Starts tracking when location access is (or becomes) available. On denial
/// nothing is started and the error is returned for logging only.
pub async fn bootstrap(state: &AppState) -> Result<(), TrackerError> {
    if !state.permission_gate.has_required_access() {
        state.permission_gate.request_access().await?;
    }

    start_service(state).await;
    Ok(())
}

async fn start_service(state: &AppState) {
    info!("Starting tracking service");
    state.tracking.start_service().await;
    state.screen.write().await.map.on_map_ready();
}

pub fn gen_app(state: AppState) -> Router {
    let cors_middleware = CorsLayer::new();

    apply_routes(Router::new())
        .route("/", get(root))
        .layer(cors_middleware)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

async fn root() -> &'static str {
    "OK"
}

#[cfg(test)]
pub struct MockApp {
    pub app: Router,
    pub state: AppState,
    pub naver_server: mockito::ServerGuard,
    pub sms_server: mockito::ServerGuard,
    _dir: tempfile::TempDir,
}

#[cfg(test)]
pub async fn gen_mock_app_with(
    granted_permissions: Vec<crate::services::tracking::permission_gate::LocationPermission>,
    auth_key: Option<String>,
) -> MockApp {
    use crate::{
        services::{
            map_view::coordinate_converter::CoordinateSystem,
            place_search::place_search_service::PlaceSearchServiceConfig,
        },
        utils::sms_client::SmsClientConfig,
    };

    let naver_server = mockito::Server::new_async().await;
    let sms_server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();

    let config = AppConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        auth_key,
        application_id: "com.example.app".to_string(),
        granted_permissions,
        sms: SmsClientConfig {
            host: sms_server.url(),
            api_key: "sms-key".to_string(),
            from: "0200000000".to_string(),
            to: "01012345678".to_string(),
            message: "device contacted".to_string(),
        },
        place_search: PlaceSearchServiceConfig {
            host: naver_server.url(),
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            display: 5,
        },
        coordinate_system: CoordinateSystem::Wgs84 { scale: 1.0 },
        saved_place_path: dir.path().join("saved_place.json"),
    };

    let state = build_state(&config);
    let _ = bootstrap(&state).await;

    MockApp {
        app: gen_app(state.clone()),
        state,
        naver_server,
        sms_server,
        _dir: dir,
    }
}

#[cfg(test)]
pub async fn gen_mock_app() -> MockApp {
    use crate::services::tracking::permission_gate::LocationPermission;

    gen_mock_app_with(
        vec![LocationPermission::Fine, LocationPermission::Coarse],
        None,
    )
    .await
}

/// Polls `condition` until it holds, failing the test after two seconds.
#[cfg(test)]
pub async fn wait_until<F, Fut>(mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    use std::time::Duration;

    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition().await {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not met in time");
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::services::tracking::{
        alert_trigger::AlertState, permission_gate::LocationPermission,
    };

    #[tokio::test]
    async fn root_responds() {
        let mock_app = gen_mock_app().await;

        let response = mock_app
            .app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn bootstrap_starts_tracking_when_granted() {
        let mock_app = gen_mock_app_with(vec![LocationPermission::Coarse], None).await;

        let service = mock_app.state.tracking.current().unwrap();
        assert!(service.is_running());
        assert_eq!(service.alert_state(), AlertState::Armed);
        assert!(mock_app.state.screen.read().await.map.attached);
    }

    #[tokio::test]
    async fn bootstrap_stays_idle_when_denied() {
        let mock_app = gen_mock_app_with(vec![], None).await;

        assert!(mock_app.state.tracking.current().is_none());
        assert!(!mock_app.state.screen.read().await.map.attached);
        assert!(mock_app.state.notification_host.foreground().is_none());
    }

    #[tokio::test]
    async fn rejects_missing_auth_header() {
        let mock_app = gen_mock_app_with(
            vec![LocationPermission::Fine],
            Some("secret".to_string()),
        )
        .await;

        let response = mock_app
            .app
            .clone()
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = mock_app
            .app
            .oneshot(
                Request::builder()
                    .uri("/status")
                    .header("authorization", "secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
