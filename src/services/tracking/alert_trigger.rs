use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn, Instrument};

use super::location_monitor::LocationListener;
use crate::types::{location_fix::LocationFix, tracker_error::TrackerError};

const ARMED: u8 = 0;
const FIRED: u8 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertState {
    Armed,
    Fired,
}

/// External channel notified when the device is first located.
#[async_trait]
pub trait AlertSender: Send + Sync {
    async fn send_alert(&self, fix: &LocationFix) -> Result<(), TrackerError>;
}

/// Fires the alert on the first fix only. Later fixes are ignored for the
/// lifetime of this instance.
pub struct OneShotAlertTrigger {
    state: AtomicU8,
    sender: Arc<dyn AlertSender>,
}

impl OneShotAlertTrigger {
    pub fn new(sender: Arc<dyn AlertSender>) -> Self {
        Self {
            state: AtomicU8::new(ARMED),
            sender,
        }
    }

    pub fn state(&self) -> AlertState {
        match self.state.load(Ordering::Acquire) {
            ARMED => AlertState::Armed,
            _ => AlertState::Fired,
        }
    }

    /// Returns `true` if this call fired the alert.
    pub fn on_fix(&self, fix: LocationFix) -> bool {
        if self
            .state
            .compare_exchange(ARMED, FIRED, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        info!(
            "First fix at {}, {} ({}), sending alert",
            fix.latitude, fix.longitude, fix.timestamp
        );

        let sender = self.sender.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(
                    async move {
                        if let Err(e) = sender.send_alert(&fix).await {
                            error!("Failed to send alert: {}", e);
                        }
                    }
                    .in_current_span(),
                );
            }
            Err(e) => warn!("No runtime available to send alert: {}", e),
        }

        true
    }
}

impl LocationListener for OneShotAlertTrigger {
    fn on_location_changed(&self, fix: LocationFix) {
        self.on_fix(fix);
    }
}
