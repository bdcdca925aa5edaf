use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::types::tracker_error::TrackerError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationPermission {
    Fine,
    Coarse,
}

impl LocationPermission {
    pub const ALL: [LocationPermission; 2] = [LocationPermission::Fine, LocationPermission::Coarse];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fine" => Some(LocationPermission::Fine),
            "coarse" => Some(LocationPermission::Coarse),
            _ => None,
        }
    }
}

/// Host capability that grants or denies location access.
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    fn is_granted(&self, permission: LocationPermission) -> bool;

    /// Prompts for every permission in `permissions` at once.
    async fn request(
        &self,
        permissions: &[LocationPermission],
    ) -> HashMap<LocationPermission, bool>;
}

/// Grants whatever the deployment configured; a prompt resolves to the same set.
pub struct StaticPermissionProvider {
    granted: Vec<LocationPermission>,
}

impl StaticPermissionProvider {
    pub fn new(granted: Vec<LocationPermission>) -> Self {
        Self { granted }
    }
}

#[async_trait]
impl PermissionProvider for StaticPermissionProvider {
    fn is_granted(&self, permission: LocationPermission) -> bool {
        self.granted.contains(&permission)
    }

    async fn request(
        &self,
        permissions: &[LocationPermission],
    ) -> HashMap<LocationPermission, bool> {
        permissions
            .iter()
            .map(|p| (*p, self.granted.contains(p)))
            .collect()
    }
}

#[derive(Clone)]
pub struct PermissionGate {
    provider: Arc<dyn PermissionProvider>,
}

impl PermissionGate {
    pub fn new(provider: Arc<dyn PermissionProvider>) -> Self {
        Self { provider }
    }

    pub fn has_required_access(&self) -> bool {
        self.provider.is_granted(LocationPermission::Fine)
            || self.provider.is_granted(LocationPermission::Coarse)
    }

    /// One-shot prompt for fine and coarse access. Either grant is enough.
    pub async fn request_access(&self) -> Result<LocationPermission, TrackerError> {
        info!("Requesting location permissions");
        let results = self.provider.request(&LocationPermission::ALL).await;
        debug!("Permission results: {:?}", results);

        let granted = |p: LocationPermission| results.get(&p).copied().unwrap_or(false);

        if granted(LocationPermission::Fine) {
            Ok(LocationPermission::Fine)
        } else if granted(LocationPermission::Coarse) {
            Ok(LocationPermission::Coarse)
        } else {
            warn!("No location access granted");
            Err(TrackerError::PermissionDenied)
        }
    }
}
