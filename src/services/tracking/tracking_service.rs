use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, RwLock,
};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::{
    alert_trigger::{AlertSender, AlertState, OneShotAlertTrigger},
    foreground::{ForegroundServiceLifecycle, NotificationHost},
    location_monitor::{LocationMonitor, LocationSource},
};

/// What the host should do if it kills the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartMode {
    /// Recreate the service without redelivering the start request.
    Sticky,
}

/// One lifetime of the background tracking service. Each instance owns a
/// fresh alert trigger.
pub struct TrackingService {
    foreground: ForegroundServiceLifecycle,
    monitor: LocationMonitor,
    trigger: Arc<OneShotAlertTrigger>,
    started: AtomicBool,
}

impl TrackingService {
    pub fn new(
        foreground: ForegroundServiceLifecycle,
        monitor: LocationMonitor,
        sender: Arc<dyn AlertSender>,
    ) -> Self {
        info!("Tracking service created");
        Self {
            foreground,
            monitor,
            trigger: Arc::new(OneShotAlertTrigger::new(sender)),
            started: AtomicBool::new(false),
        }
    }

    /// Safe to call repeatedly: the foreground notification is re-asserted
    /// but location updates are registered only once per instance.
    pub async fn on_start_command(&self) -> StartMode {
        info!("Start requested");

        if let Err(e) = self.foreground.ensure_foreground() {
            error!("Failed to start foreground: {}", e);
        }

        if !self.started.swap(true, Ordering::AcqRel) {
            if let Err(e) = self.monitor.start(self.trigger.clone()).await {
                error!("{}", e);
                self.started.store(false, Ordering::Release);
            }
        }

        StartMode::Sticky
    }

    pub fn is_running(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    pub fn alert_state(&self) -> AlertState {
        self.trigger.state()
    }

    pub fn stop(&self) {
        if self.started.swap(false, Ordering::AcqRel) {
            info!("Tracking service stopped");
            self.monitor.stop();
        }
    }
}

/// Plays the host's part: creates service instances on start and recreates
/// them after a kill.
pub struct TrackingSupervisor {
    application_id: String,
    notification_host: Arc<dyn NotificationHost>,
    location_source: Arc<dyn LocationSource>,
    alert_sender: Arc<dyn AlertSender>,
    current: RwLock<Option<Arc<TrackingService>>>,
}

impl TrackingSupervisor {
    pub fn new(
        application_id: String,
        notification_host: Arc<dyn NotificationHost>,
        location_source: Arc<dyn LocationSource>,
        alert_sender: Arc<dyn AlertSender>,
    ) -> Self {
        Self {
            application_id,
            notification_host,
            location_source,
            alert_sender,
            current: RwLock::new(None),
        }
    }

    fn create_service(&self) -> Arc<TrackingService> {
        Arc::new(TrackingService::new(
            ForegroundServiceLifecycle::new(
                self.application_id.clone(),
                self.notification_host.clone(),
            ),
            LocationMonitor::new(self.location_source.clone()),
            self.alert_sender.clone(),
        ))
    }

    pub fn current(&self) -> Option<Arc<TrackingService>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Delivers a start request, creating the service if it is not alive.
    pub async fn start_service(&self) -> StartMode {
        let service = {
            let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
            current.get_or_insert_with(|| self.create_service()).clone()
        };

        service.on_start_command().await
    }

    /// Simulates the host killing the process and recreating a sticky service.
    pub async fn restart(&self) -> StartMode {
        warn!("Service killed, recreating");
        self.stop_service();
        self.start_service().await
    }

    pub fn stop_service(&self) {
        let previous = self
            .current
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        if let Some(service) = previous {
            service.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::{
        services::tracking::{
            alert_trigger::tests::CountingSender, foreground::InMemoryNotificationHost,
            location_monitor::ChannelLocationSource,
        },
        types::location_fix::LocationFix,
    };

    struct Fixture {
        supervisor: TrackingSupervisor,
        source: Arc<ChannelLocationSource>,
        sender: Arc<CountingSender>,
        host: Arc<InMemoryNotificationHost>,
    }

    fn fixture() -> Fixture {
        let source = Arc::new(ChannelLocationSource::new());
        let sender = Arc::new(CountingSender::default());
        let host = Arc::new(InMemoryNotificationHost::new());

        Fixture {
            supervisor: TrackingSupervisor::new(
                "com.example.app".to_string(),
                host.clone(),
                source.clone(),
                sender.clone(),
            ),
            source,
            sender,
            host,
        }
    }

    #[tokio::test]
    async fn start_enters_foreground_and_listens() {
        let f = fixture();

        assert_eq!(f.supervisor.start_service().await, StartMode::Sticky);

        let service = f.supervisor.current().unwrap();
        assert!(service.is_running());
        assert_eq!(service.alert_state(), AlertState::Armed);
        assert_eq!(f.host.foreground().unwrap().id, 1);
        assert!(f.source.is_registered());
    }

    #[tokio::test]
    async fn first_fix_fires_alert_once() {
        let f = fixture();
        f.supervisor.start_service().await;

        for _ in 0..5 {
            f.source.push(LocationFix::new(37.5, 127.0));
        }
        f.sender.wait_for(1).await;

        assert_eq!(f.sender.sent.load(Ordering::SeqCst), 1);
        assert_eq!(
            f.supervisor.current().unwrap().alert_state(),
            AlertState::Fired
        );
    }

    #[tokio::test]
    async fn repeated_start_keeps_instance_and_state() {
        let f = fixture();
        f.supervisor.start_service().await;
        f.source.push(LocationFix::new(37.5, 127.0));
        f.sender.wait_for(1).await;

        let before = f.supervisor.current().unwrap();
        f.supervisor.start_service().await;
        let after = f.supervisor.current().unwrap();

        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(after.alert_state(), AlertState::Fired);
        assert_eq!(f.host.channels().len(), 1);
    }

    #[tokio::test]
    async fn restart_rearms_alert() {
        let f = fixture();
        f.supervisor.start_service().await;
        f.source.push(LocationFix::new(37.5, 127.0));
        f.sender.wait_for(1).await;

        f.supervisor.restart().await;
        let service = f.supervisor.current().unwrap();
        assert_eq!(service.alert_state(), AlertState::Armed);

        f.source.push(LocationFix::new(37.6, 127.1));
        f.sender.wait_for(2).await;

        assert_eq!(service.alert_state(), AlertState::Fired);
        assert_eq!(f.sender.sent.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn stop_tears_down_monitor() {
        let f = fixture();
        f.supervisor.start_service().await;

        f.supervisor.stop_service();

        assert!(f.supervisor.current().is_none());
        assert!(!f.source.is_registered());
    }

    #[tokio::test]
    async fn fix_queued_before_stop_does_not_fire_next_instance() {
        let f = fixture();
        f.supervisor.start_service().await;

        // Still queued when the service goes away.
        f.source.push(LocationFix::new(37.5, 127.0));
        f.supervisor.stop_service();
        f.supervisor.start_service().await;

        let service = f.supervisor.current().unwrap();
        assert_eq!(service.alert_state(), AlertState::Armed);
        assert_eq!(f.sender.sent.load(Ordering::SeqCst), 0);

        let fresh = LocationFix::new(37.6, 127.1);
        f.source.push(fresh);
        f.sender.wait_for(1).await;

        assert_eq!(service.alert_state(), AlertState::Fired);
        assert_eq!(*f.sender.fixes.lock().unwrap(), vec![fresh]);
    }
}
