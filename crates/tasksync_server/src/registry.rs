//! Device registry: the set of devices known for each user.

use crate::error::{ServerError, ServerResult};
use parking_lot::RwLock;
use std::collections::HashMap;

/// A client install/endpoint identity, distinct from the user identity.
///
/// A device is unique per user; the same identifier may exist for
/// different users as independent records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Owning username.
    pub username: String,
    /// Opaque device identifier (a network address, an install id).
    pub device_id: String,
    /// Platform label reported at login.
    pub platform: Option<String>,
    /// The most recently issued token for this device.
    pub last_token: Option<String>,
}

/// The two-state decision the login flow switches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceDecision {
    /// The device is already registered for the user.
    Known(Device),
    /// The device has never been seen for the user.
    Unknown,
}

/// Storage collaborator for device records, keyed by (username, device id).
pub trait DeviceRegistry: Send + Sync {
    /// Looks up a device record.
    fn lookup(&self, username: &str, device_id: &str) -> ServerResult<Option<Device>>;

    /// Creates a new device record. Fails with
    /// [`ServerError::DuplicateDevice`] if one already exists for the
    /// (user, device) pair.
    fn register(&self, device: Device) -> ServerResult<Device>;

    /// Updates platform and last-token metadata of an existing device.
    /// `None` fields are left unchanged. Fails with
    /// [`ServerError::DeviceNotFound`] if the record is absent.
    fn update(
        &self,
        username: &str,
        device_id: &str,
        platform: Option<&str>,
        last_token: Option<&str>,
    ) -> ServerResult<Device>;

    /// Returns whether the (user, device) pair is known.
    fn exists(&self, username: &str, device_id: &str) -> ServerResult<bool> {
        Ok(self.lookup(username, device_id)?.is_some())
    }

    /// The two-state decision consumed by the login flow.
    fn decide(&self, username: &str, device_id: &str) -> ServerResult<DeviceDecision> {
        Ok(match self.lookup(username, device_id)? {
            Some(device) => DeviceDecision::Known(device),
            None => DeviceDecision::Unknown,
        })
    }
}

/// In-memory device registry for tests and embedding.
#[derive(Default)]
pub struct MemoryDeviceRegistry {
    devices: RwLock<HashMap<(String, String), Device>>,
}

impl MemoryDeviceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered devices across all users.
    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    /// Returns true if no devices are registered.
    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }
}

impl DeviceRegistry for MemoryDeviceRegistry {
    fn lookup(&self, username: &str, device_id: &str) -> ServerResult<Option<Device>> {
        let key = (username.to_string(), device_id.to_string());
        Ok(self.devices.read().get(&key).cloned())
    }

    fn register(&self, device: Device) -> ServerResult<Device> {
        let key = (device.username.clone(), device.device_id.clone());
        let mut devices = self.devices.write();
        if devices.contains_key(&key) {
            return Err(ServerError::DuplicateDevice {
                user: device.username,
                device: device.device_id,
            });
        }
        devices.insert(key, device.clone());
        Ok(device)
    }

    fn update(
        &self,
        username: &str,
        device_id: &str,
        platform: Option<&str>,
        last_token: Option<&str>,
    ) -> ServerResult<Device> {
        let key = (username.to_string(), device_id.to_string());
        let mut devices = self.devices.write();
        let device = devices.get_mut(&key).ok_or_else(|| ServerError::DeviceNotFound {
            user: username.to_string(),
            device: device_id.to_string(),
        })?;

        if let Some(platform) = platform {
            device.platform = Some(platform.to_string());
        }
        if let Some(token) = last_token {
            device.last_token = Some(token.to_string());
        }
        Ok(device.clone())
    }
}
