//! The `StateStore` external collaborator. See `spec.md` §6.
//!
//! Persists and retrieves one blueprint instance's deployed state between
//! runs. Shaped after `codegraph-storage`'s `CodeSnapshotStore` port: a
//! `#[async_trait] Send + Sync` trait whose "absent" case is a dedicated
//! error (`ContainerError::NotFound`) rather than `Option` plumbing, so
//! every call site decides for itself whether "not found" is expected.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// A resource's last known provider state, tagged with its type so a
/// resource that has been removed from the blueprint (and so has no
/// `ResourceSpec` to consult) can still be torn down.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub resource_type: String,
    pub state: JsonValue,
}

/// The durable record of one deployed instance: every resource's last
/// known provider state, link states, child instance ids, export values
/// and blueprint-level metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceState {
    pub instance_id: String,
    pub resource_states: HashMap<String, ResourceRecord>,
    pub link_states: HashMap<String, JsonValue>,
    pub child_instance_ids: HashMap<String, String>,
    pub exports: HashMap<String, JsonValue>,
    pub metadata: JsonValue,
}

impl InstanceState {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait StateStore: Send + Sync {
    /// Fetch an instance's last deployed state. Returns
    /// `ContainerError::NotFound` for an instance that has never been
    /// deployed — callers that treat "new instance" as expected recover
    /// from this at the call site (§7).
    async fn get_instance_state(&self, instance_id: &str) -> Result<InstanceState>;

    async fn save_instance_state(&self, state: &InstanceState) -> Result<()>;

    /// Remove an instance's record entirely. Idempotent.
    async fn delete_instance_state(&self, instance_id: &str) -> Result<()>;
}
