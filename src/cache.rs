//! Caches mentioned in `spec.md` §5's shared-resource policy: "Caches
//! (resolved resources, child export fields, resource-template input
//! elements) are keyed by element name and protected by the cache's own
//! internal synchronisation." Backed by `dashmap::DashMap`, the same choice
//! the teacher makes for its own in-process reverse-dependency index
//! (`dependency_graph.rs`'s `DashMap`-backed adjacency cache).
//!
//! `LinkTypeCache` is wired into the preparer (C5), which genuinely repeats
//! the same `(resource_a_type, resource_b_type)` query across many resource
//! pairs sharing a handful of distinct types. `ChildExportCache` is exposed
//! as a primitive a concrete `SubstitutionResolver` adapter can reach for —
//! the resolver's own implementation is out of scope (§1), so this crate
//! only supplies the synchronised cache, not a wired-in consumer.

use dashmap::DashMap;
use serde_json::Value as JsonValue;

/// Caches `Provider::find_link_type` results keyed by the ordered
/// resource-type pair. A blueprint with many resources sharing a small set
/// of provider types (e.g. dozens of lambda functions referencing one
/// table) would otherwise repeat the same plugin round-trip once per
/// resource-name pair during preparation's pairwise scan.
#[derive(Default)]
pub struct LinkTypeCache {
    inner: DashMap<(String, String), Option<String>>,
}

impl LinkTypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, resource_a_type: &str, resource_b_type: &str) -> Option<Option<String>> {
        self.inner
            .get(&(resource_a_type.to_string(), resource_b_type.to_string()))
            .map(|entry| entry.clone())
    }

    pub fn insert(&self, resource_a_type: &str, resource_b_type: &str, link_type: Option<String>) {
        self.inner
            .insert((resource_a_type.to_string(), resource_b_type.to_string()), link_type);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Resolved child export values, keyed by `"<childInstanceId>::<exportName>"`
/// (§4.6 step 5: "Cache each child export's final value for substitutions
/// that resolve against it"). Populated by the child orchestrator once a
/// child's `StageChanges`/`Deploy` call has produced a value; consulted by
/// whatever `SubstitutionResolver` adapter backs a parent blueprint's
/// `children.<name>.exports.<field>` references.
#[derive(Default)]
pub struct ChildExportCache {
    inner: DashMap<String, JsonValue>,
}

impl ChildExportCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(child_instance_id: &str, export_name: &str) -> String {
        format!("{child_instance_id}::{export_name}")
    }

    pub fn get(&self, child_instance_id: &str, export_name: &str) -> Option<JsonValue> {
        self.inner.get(&Self::key(child_instance_id, export_name)).map(|entry| entry.clone())
    }

    pub fn insert(&self, child_instance_id: &str, export_name: &str, value: JsonValue) {
        self.inner.insert(Self::key(child_instance_id, export_name), value);
    }

    /// Bulk-populate from a child's full export map, as recorded in its
    /// `InstanceState::exports` after a deploy completes.
    pub fn insert_all(&self, child_instance_id: &str, exports: &std::collections::HashMap<String, JsonValue>) {
        for (name, value) in exports {
            self.insert(child_instance_id, name, value.clone());
        }
    }
}
