//! The `Provider` external collaborator. See `spec.md` §6.
//!
//! Resource/link type implementations live behind this trait — the
//! container never talks to a cloud API or plugin host directly. Shaped
//! after the teacher's `StageHandler` port (`pipeline.rs`): an
//! `#[async_trait] Send + Sync` trait with one method per lifecycle hook,
//! implemented in-memory for tests (`testutil.rs`) and by an out-of-scope
//! real adapter in production.

use crate::error::Result;
use crate::link::{LinkKind, PriorityResource};
use async_trait::async_trait;
use serde_json::Value as JsonValue;

/// Resource and link type operations required by preparation, ordering,
/// staging and deployment.
#[async_trait]
pub trait Provider: Send + Sync {
    /// `GetKind` — whether a link type imposes ordering (§4.1 rule a/b).
    async fn get_link_kind(&self, link_type: &str) -> Result<LinkKind>;

    /// `GetPriorityResource` — which endpoint (if any) a link type treats
    /// as priority.
    async fn get_priority_resource(&self, link_type: &str) -> Result<PriorityResource>;

    /// Resolve the typed link implementation (if any) connecting two
    /// resource types, deriving the implicit link described in §3
    /// ("links implicit from resource adjacency plus typed link
    /// implementations"). `None` means the pair is merely referenced,
    /// with no link to stage or deploy.
    async fn find_link_type(&self, resource_a_type: &str, resource_b_type: &str) -> Result<Option<String>>;

    /// Compute the field-level diff a resource's spec would produce
    /// against its previously deployed state, without touching the
    /// underlying system. Used by staging (C4).
    async fn diff_resource(
        &self,
        resource_type: &str,
        spec: &JsonValue,
        previous_state: Option<&JsonValue>,
    ) -> Result<ResourceDiff>;

    /// Realise a resource against the underlying system, returning its
    /// new state. Used by deployment (C6). Errors are classified via
    /// `ContainerError::failure_kind` to decide retry eligibility.
    async fn deploy_resource(&self, resource_type: &str, name: &str, spec: &JsonValue) -> Result<JsonValue>;

    /// Tear down a previously deployed resource. Idempotent: destroying
    /// an already-absent resource must succeed (§8 "destroy idempotence").
    async fn destroy_resource(&self, resource_type: &str, name: &str, state: &JsonValue) -> Result<()>;

    /// Compute a link's diff from both endpoints' staged resource changes
    /// plus the link's current recorded state (tolerate absent).
    async fn stage_link(
        &self,
        link_type: &str,
        resource_a_changes: &JsonValue,
        resource_b_changes: &JsonValue,
        current_link_state: &JsonValue,
    ) -> Result<JsonValue>;

    /// Tear down a previously staged link.
    async fn destroy_link(&self, link_type: &str, link_state: &JsonValue) -> Result<()>;

    /// Apply a link's effect on its A endpoint. Invoked by the deployer
    /// in priority order alongside `update_resource_b` and
    /// `update_intermediary_resources` (§4.5/§6).
    async fn update_resource_a(&self, link_type: &str, link_state: &JsonValue) -> Result<JsonValue>;

    async fn update_resource_b(&self, link_type: &str, link_state: &JsonValue) -> Result<JsonValue>;

    /// Apply a link's effect on any intermediary resources it manages
    /// (e.g. a generated IAM policy). State is persisted alongside the
    /// link's own state.
    async fn update_intermediary_resources(&self, link_type: &str, link_state: &JsonValue) -> Result<JsonValue>;

    /// Stabilisation poll: has `state` reached a terminal, usable state
    /// yet? Consulted by the deployer's stabilisation loop (§4.5).
    async fn is_stable(&self, resource_type: &str, state: &JsonValue) -> Result<bool>;
}

/// The outcome of diffing one resource's spec against its previous state.
#[derive(Debug, Clone, Default)]
pub struct ResourceDiff {
    pub new_fields: Vec<String>,
    pub modified_fields: Vec<(String, Option<JsonValue>, Option<JsonValue>)>,
    pub removed_fields: Vec<String>,
    pub unchanged_fields: Vec<String>,
    /// True when the diff cannot be satisfied in-place and the resource
    /// must be destroyed and redeployed.
    pub must_recreate: bool,
}

impl ResourceDiff {
    pub fn is_empty(&self) -> bool {
        self.new_fields.is_empty() && self.modified_fields.is_empty() && self.removed_fields.is_empty()
    }
}
