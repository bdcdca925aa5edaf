use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, Instrument};

use crate::types::{location_fix::LocationFix, tracker_error::TrackerError};

/// Observer called for every fix the platform delivers.
pub trait LocationListener: Send + Sync {
    fn on_location_changed(&self, fix: LocationFix);
}

#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn register_location_updates(
        &self,
        listener: Arc<dyn LocationListener>,
    ) -> Result<(), TrackerError>;

    fn remove_location_updates(&self);
}

struct Registration {
    sender: mpsc::UnboundedSender<LocationFix>,
    token: CancellationToken,
}

/// Location source fed by device reports. Fixes are forwarded to the
/// registered listener on a background task in the order they were pushed.
///
/// Every registration owns its own queue, so fixes still pending when a
/// listener is removed are discarded with it and never reach the next one.
pub struct ChannelLocationSource {
    registration: Mutex<Option<Registration>>,
}

impl ChannelLocationSource {
    pub fn new() -> Self {
        Self {
            registration: Mutex::new(None),
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registration
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    /// Queues a fix for delivery. Returns `false` when nobody is listening,
    /// in which case the fix is dropped.
    pub fn push(&self, fix: LocationFix) -> bool {
        let Ok(slot) = self.registration.lock() else {
            return false;
        };

        match slot.as_ref() {
            Some(registration) => registration.sender.send(fix).is_ok(),
            None => {
                debug!("Dropping fix, no listener registered");
                false
            }
        }
    }
}

impl Default for ChannelLocationSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocationSource for ChannelLocationSource {
    async fn register_location_updates(
        &self,
        listener: Arc<dyn LocationListener>,
    ) -> Result<(), TrackerError> {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let token = CancellationToken::new();

        {
            let mut slot = self
                .registration
                .lock()
                .map_err(|e| TrackerError::LocationRegistration(e.to_string()))?;

            let previous = slot.replace(Registration {
                sender,
                token: token.clone(),
            });
            if let Some(previous) = previous {
                previous.token.cancel();
            }
        }

        tokio::spawn(
            async move {
                loop {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => break,
                        fix = receiver.recv() => match fix {
                            Some(fix) => listener.on_location_changed(fix),
                            None => break,
                        },
                    }
                }

                debug!("Location forwarding stopped");
            }
            .in_current_span(),
        );

        Ok(())
    }

    fn remove_location_updates(&self) {
        if let Ok(mut slot) = self.registration.lock() {
            if let Some(registration) = slot.take() {
                registration.token.cancel();
            }
        }
    }
}

pub struct LocationMonitor {
    source: Arc<dyn LocationSource>,
}

impl LocationMonitor {
    pub fn new(source: Arc<dyn LocationSource>) -> Self {
        Self { source }
    }

    /// Forwards every platform fix to `sink`, unfiltered.
    pub async fn start(&self, sink: Arc<dyn LocationListener>) -> Result<(), TrackerError> {
        info!("Registering for location updates");
        self.source.register_location_updates(sink).await
    }

    pub fn stop(&self) {
        info!("Removing location updates");
        self.source.remove_location_updates();
    }
}
