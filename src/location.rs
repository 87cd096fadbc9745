//! Device location access.

use crate::{core::geo::LatLng, EventMapError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    #[default]
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Foreground location of the device
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Asks the user for permission, or reports the answer already given
    async fn request_permission(&self) -> Result<PermissionStatus>;

    async fn current_position(&self) -> Result<LatLng>;
}

/// Provider with a fixed answer, for tests and headless hosts
#[derive(Debug, Clone)]
pub struct FixedLocationProvider {
    permission: PermissionStatus,
    position: Option<LatLng>,
}

impl FixedLocationProvider {
    pub fn granted(position: LatLng) -> Self {
        Self {
            permission: PermissionStatus::Granted,
            position: Some(position),
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: PermissionStatus::Denied,
            position: None,
        }
    }

    /// Permission granted but no fix available
    pub fn without_fix() -> Self {
        Self {
            permission: PermissionStatus::Granted,
            position: None,
        }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn request_permission(&self) -> Result<PermissionStatus> {
        Ok(self.permission)
    }

    async fn current_position(&self) -> Result<LatLng> {
        if !self.permission.is_granted() {
            return Err(EventMapError::LocationUnavailable(
                "permission not granted".to_string(),
            ));
        }
        self.position
            .ok_or_else(|| EventMapError::LocationUnavailable("no position fix".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_provider() {
        let provider = FixedLocationProvider::granted(LatLng::new(38.72, -9.14));
        assert!(provider.request_permission().await.unwrap().is_granted());
        assert_eq!(provider.current_position().await.unwrap(), LatLng::new(38.72, -9.14));

        let provider = FixedLocationProvider::denied();
        assert_eq!(provider.request_permission().await.unwrap(), PermissionStatus::Denied);
        assert!(provider.current_position().await.is_err());

        assert!(FixedLocationProvider::without_fix().current_position().await.is_err());
    }
}
