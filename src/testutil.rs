//! In-memory fakes for every external collaborator trait, usable from
//! this crate's own tests and from downstream integration tests. Shaped
//! after the teacher's `MockHandler`/in-memory `CodeSnapshotStore` test
//! doubles: simple `DashMap`/`Mutex`-backed state, no behaviour beyond
//! what each trait's contract requires.
//!
//! Only compiled for tests (`#[cfg(test)]` at the module declaration in
//! `lib.rs`) — this is test scaffolding, not a production adapter.

use crate::blueprint::{BlueprintSpec, ChildSpec};
use crate::error::{ContainerError, Result};
use crate::link::{LinkKind, PriorityResource};
use crate::node::ReferenceGraph;
use crate::provider::{Provider, ResourceDiff};
use crate::state_store::{InstanceState, ResourceRecord, StateStore};
use crate::substitution::SubstitutionResolver;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// A reference graph built from plain maps: direct references and their
/// reverse (`dependents`) index, plus reachability via BFS. Good enough
/// for test fixtures; the real collector is out of scope (§1).
#[derive(Debug, Clone, Default)]
pub struct FakeReferenceGraph {
    references: HashMap<String, Vec<String>>,
}

impl FakeReferenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.references.entry(from.into()).or_default().push(to.into());
        self
    }
}

impl ReferenceGraph for FakeReferenceGraph {
    fn references(&self, from: &str, to: &str) -> bool {
        self.references.get(from).map_or(false, |v| v.iter().any(|x| x == to))
    }

    fn reachable(&self, from: &str, to: &str) -> bool {
        let mut seen = std::collections::HashSet::new();
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(from.to_string());
        seen.insert(from.to_string());
        while let Some(current) = queue.pop_front() {
            if let Some(next) = self.references.get(&current) {
                for n in next {
                    if n == to {
                        return true;
                    }
                    if seen.insert(n.clone()) {
                        queue.push_back(n.clone());
                    }
                }
            }
        }
        false
    }

    fn dependents(&self, of: &str) -> Vec<String> {
        self.references
            .iter()
            .filter(|(_, tos)| tos.iter().any(|t| t == of))
            .map(|(from, _)| from.clone())
            .collect()
    }
}

/// A link-type registry plus a no-op resource lifecycle: every
/// `deploy_resource` call echoes its input spec back tagged `deployed`,
/// every diff reports `must_recreate: false` unless configured otherwise.
#[derive(Default)]
pub struct FakeProvider {
    link_types: HashMap<(String, String), String>,
    kinds: HashMap<String, LinkKind>,
    priorities: HashMap<String, PriorityResource>,
    /// Resource names that should report `must_recreate: true` on next diff.
    pub force_recreate: Mutex<std::collections::HashSet<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link(
        mut self,
        resource_a_type: impl Into<String>,
        resource_b_type: impl Into<String>,
        link_type: impl Into<String>,
        kind: LinkKind,
        priority: PriorityResource,
    ) -> Self {
        let link_type = link_type.into();
        self.link_types.insert((resource_a_type.into(), resource_b_type.into()), link_type.clone());
        self.kinds.insert(link_type.clone(), kind);
        self.priorities.insert(link_type, priority);
        self
    }
}

#[async_trait]
impl Provider for FakeProvider {
    async fn get_link_kind(&self, link_type: &str) -> Result<LinkKind> {
        self.kinds.get(link_type).copied().ok_or_else(|| ContainerError::not_found(format!("link type '{}'", link_type)))
    }

    async fn get_priority_resource(&self, link_type: &str) -> Result<PriorityResource> {
        self.priorities
            .get(link_type)
            .copied()
            .ok_or_else(|| ContainerError::not_found(format!("link type '{}'", link_type)))
    }

    async fn find_link_type(&self, resource_a_type: &str, resource_b_type: &str) -> Result<Option<String>> {
        Ok(self
            .link_types
            .get(&(resource_a_type.to_string(), resource_b_type.to_string()))
            .cloned())
    }

    async fn diff_resource(&self, _resource_type: &str, spec: &JsonValue, previous_state: Option<&JsonValue>) -> Result<ResourceDiff> {
        Ok(ResourceDiff {
            new_fields: if previous_state.is_none() { vec!["spec".to_string()] } else { vec![] },
            modified_fields: if previous_state.is_some() && previous_state != Some(spec) {
                vec![("spec".to_string(), previous_state.cloned(), Some(spec.clone()))]
            } else {
                vec![]
            },
            ..Default::default()
        })
    }

    async fn deploy_resource(&self, resource_type: &str, name: &str, spec: &JsonValue) -> Result<JsonValue> {
        Ok(serde_json::json!({ "type": resource_type, "name": name, "spec": spec, "deployed": true }))
    }

    async fn destroy_resource(&self, _resource_type: &str, _name: &str, _state: &JsonValue) -> Result<()> {
        Ok(())
    }

    async fn stage_link(&self, _link_type: &str, _a: &JsonValue, _b: &JsonValue, _current: &JsonValue) -> Result<JsonValue> {
        Ok(serde_json::json!({ "staged": true }))
    }

    async fn destroy_link(&self, _link_type: &str, _state: &JsonValue) -> Result<()> {
        Ok(())
    }

    async fn update_resource_a(&self, _link_type: &str, _state: &JsonValue) -> Result<JsonValue> {
        Ok(serde_json::json!({ "stage": "a" }))
    }

    async fn update_resource_b(&self, _link_type: &str, _state: &JsonValue) -> Result<JsonValue> {
        Ok(serde_json::json!({ "stage": "b" }))
    }

    async fn update_intermediary_resources(&self, _link_type: &str, _state: &JsonValue) -> Result<JsonValue> {
        Ok(serde_json::json!({ "stage": "final" }))
    }

    async fn is_stable(&self, _resource_type: &str, _state: &JsonValue) -> Result<bool> {
        Ok(true)
    }
}

/// An in-memory `StateStore` keyed by instance id, backed by `DashMap`
/// for lock-free concurrent access — same choice the teacher makes for
/// its in-process caches (`dag.rs`'s `CacheKeyManager`).
#[derive(Default)]
pub struct InMemoryStateStore {
    instances: DashMap<String, InstanceState>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, state: InstanceState) {
        self.instances.insert(state.instance_id.clone(), state);
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get_instance_state(&self, instance_id: &str) -> Result<InstanceState> {
        self.instances
            .get(instance_id)
            .map(|entry| entry.clone())
            .ok_or_else(|| ContainerError::not_found(format!("instance '{}'", instance_id)))
    }

    async fn save_instance_state(&self, state: &InstanceState) -> Result<()> {
        self.instances.insert(state.instance_id.clone(), state.clone());
        Ok(())
    }

    async fn delete_instance_state(&self, instance_id: &str) -> Result<()> {
        self.instances.remove(instance_id);
        Ok(())
    }
}

pub fn resource_record(resource_type: impl Into<String>, state: JsonValue) -> ResourceRecord {
    ResourceRecord {
        resource_type: resource_type.into(),
        state,
    }
}

/// A resolver that returns a fixed map of path -> value, treating any
/// path prefixed `deferred:` as resolve-on-deploy.
#[derive(Default)]
pub struct FakeResolver {
    values: HashMap<String, JsonValue>,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, path: impl Into<String>, value: JsonValue) -> Self {
        self.values.insert(path.into(), value);
        self
    }
}

#[async_trait]
impl SubstitutionResolver for FakeResolver {
    async fn resolve(&self, path: &str, variables: &HashMap<String, JsonValue>) -> Result<JsonValue> {
        if self.is_deferred(path, variables) {
            return Err(ContainerError::DeferredValueRequired(path.to_string()));
        }
        if let Some(value) = variables.get(path) {
            return Ok(value.clone());
        }
        self.values.get(path).cloned().ok_or_else(|| ContainerError::ResolutionFailed {
            path: path.to_string(),
            reason: "no fixture value registered".to_string(),
        })
    }

    fn is_deferred(&self, path: &str, _variables: &HashMap<String, JsonValue>) -> bool {
        path.starts_with("deferred:")
    }
}

/// A blueprint loader backed by a fixed map of child name -> document,
/// with deterministic instance ids (`parent/childName`).
#[derive(Default)]
pub struct FakeLoader {
    documents: HashMap<String, BlueprintSpec>,
}

impl FakeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_child(mut self, name: impl Into<String>, blueprint: BlueprintSpec) -> Self {
        self.documents.insert(name.into(), blueprint);
        self
    }
}

#[async_trait]
impl crate::child_orchestrator::BlueprintLoader for FakeLoader {
    async fn load(&self, child: &ChildSpec) -> Result<BlueprintSpec> {
        self.documents
            .get(&child.name)
            .cloned()
            .ok_or_else(|| ContainerError::not_found(format!("child blueprint '{}'", child.name)))
    }

    async fn resolve_instance_id(&self, parent_instance_id: &str, child: &ChildSpec) -> Result<String> {
        Ok(format!("{}/{}", parent_instance_id, child.name))
    }
}
