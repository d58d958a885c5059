//! Device registry boundary
//!
//! This module handles:
//! - The registry collaborator trait (device CRUD, twin lookup)
//! - The error-policy facade that collapses registry faults to absent results

use crate::error::TransportError;
use crate::model::{Device, Twin};
use async_trait::async_trait;
use tracing::warn;

/// Registry collaborator: device identity CRUD and twin lookup
#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    /// Fetch a device by id, `None` if not registered
    async fn get_device(&self, id: &str) -> Result<Option<Device>, TransportError>;

    /// Register a new device identity
    async fn add_device(&self, id: &str) -> Result<Device, TransportError>;

    /// Remove a device identity
    async fn remove_device(&self, id: &str) -> Result<(), TransportError>;

    /// List all registered devices
    async fn query_devices(&self) -> Result<Vec<Device>, TransportError>;

    /// Fetch the stored twin for a device, `None` if not registered
    async fn get_twin(&self, id: &str) -> Result<Option<Twin>, TransportError>;
}

/// Wraps a [`DeviceRegistry`] and applies the boundary error policy: every
/// registry fault is caught here, logged, and returned as an absent result.
pub struct RegistryClient<R> {
    registry: R,
}

impl<R: DeviceRegistry> RegistryClient<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// Fetch a device; registry faults and unknown ids both yield `None`
    pub async fn device(&self, id: &str) -> Option<Device> {
        match self.registry.get_device(id).await {
            Ok(found) => found,
            Err(e) => {
                warn!("get_device {} failed: {}", id, e);
                None
            }
        }
    }

    /// Register a device; `None` when the registry call fails
    pub async fn create_device(&self, id: &str) -> Option<Device> {
        match self.registry.add_device(id).await {
            Ok(device) => Some(device),
            Err(e) => {
                warn!("add_device {} failed: {}", id, e);
                None
            }
        }
    }

    /// Remove a device; `false` when the registry call fails
    pub async fn delete_device(&self, id: &str) -> bool {
        match self.registry.remove_device(id).await {
            Ok(()) => true,
            Err(e) => {
                warn!("remove_device {} failed: {}", id, e);
                false
            }
        }
    }

    /// List devices for UI population; empty on registry fault
    pub async fn list_devices(&self) -> Vec<Device> {
        match self.registry.query_devices().await {
            Ok(devices) => devices,
            Err(e) => {
                warn!("query_devices failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetch a device twin; registry faults and unknown ids both yield `None`
    pub async fn twin(&self, id: &str) -> Option<Twin> {
        match self.registry.get_twin(id).await {
            Ok(found) => found,
            Err(e) => {
                warn!("get_twin {} failed: {}", id, e);
                None
            }
        }
    }
}
