use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::types::tracker_error::TrackerError;

pub const CHANNEL_NAME: &str = "Tracking";
pub const FOREGROUND_NOTIFICATION_ID: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Default,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationChannel {
    pub id: String,
    pub name: String,
    pub importance: Importance,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub channel_id: String,
    pub title: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForegroundNotification {
    pub id: u32,
    pub notification: Notification,
}

/// Host side of the foreground-execution contract.
pub trait NotificationHost: Send + Sync {
    /// Creating a channel that already exists is a no-op.
    fn create_channel(&self, channel: NotificationChannel) -> Result<(), TrackerError>;

    fn start_foreground(&self, id: u32, notification: Notification) -> Result<(), TrackerError>;
}

/// Keeps channels and the active foreground notification in memory so they
/// can be reported by the status endpoint.
#[derive(Default)]
pub struct InMemoryNotificationHost {
    channels: RwLock<Vec<NotificationChannel>>,
    foreground: RwLock<Option<ForegroundNotification>>,
}

impl InMemoryNotificationHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channels(&self) -> Vec<NotificationChannel> {
        self.channels
            .read()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    pub fn foreground(&self) -> Option<ForegroundNotification> {
        self.foreground.read().ok().and_then(|f| f.clone())
    }
}

impl NotificationHost for InMemoryNotificationHost {
    fn create_channel(&self, channel: NotificationChannel) -> Result<(), TrackerError> {
        let mut channels = self
            .channels
            .write()
            .map_err(|e| TrackerError::Foreground(e.to_string()))?;

        if !channels.iter().any(|c| c.id == channel.id) {
            channels.push(channel);
        }

        Ok(())
    }

    fn start_foreground(&self, id: u32, notification: Notification) -> Result<(), TrackerError> {
        let mut foreground = self
            .foreground
            .write()
            .map_err(|e| TrackerError::Foreground(e.to_string()))?;

        *foreground = Some(ForegroundNotification { id, notification });

        Ok(())
    }
}

pub struct ForegroundServiceLifecycle {
    channel_id: String,
    host: Arc<dyn NotificationHost>,
}

impl ForegroundServiceLifecycle {
    pub fn new(channel_id: String, host: Arc<dyn NotificationHost>) -> Self {
        Self { channel_id, host }
    }

    pub fn ensure_foreground(&self) -> Result<(), TrackerError> {
        debug!("Creating notification channel {}", self.channel_id);
        self.host.create_channel(NotificationChannel {
            id: self.channel_id.clone(),
            name: CHANNEL_NAME.to_string(),
            importance: Importance::Default,
        })?;

        // The host requires a notification object even when it carries no text.
        let notification = Notification {
            channel_id: self.channel_id.clone(),
            title: String::new(),
            text: String::new(),
        };

        self.host
            .start_foreground(FOREGROUND_NOTIFICATION_ID, notification)?;
        info!("Running in foreground");

        Ok(())
    }
}
