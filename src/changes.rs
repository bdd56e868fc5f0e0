//! The change/diff data model produced by staging (C4) and consumed by
//! deployment (C6). See `spec.md` §3 "Blueprint changes" / "Resource
//! change set" / "Pending-link record".

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// A single field-level diff entry, keyed by dot-path notation
/// (e.g. `spec.envVars.TABLE_NAME`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldChange {
    pub field_path: String,
    pub previous: Option<JsonValue>,
    pub new: Option<JsonValue>,
}

/// Outbound or inbound link diff for one neighbour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkChange {
    pub logical_name: String,
    pub new: bool,
    pub removed: bool,
    pub field_changes: Vec<FieldChange>,
}

/// Per-resource diff: modified/new/removed/unchanged field paths, link
/// changes, and the cascading `must_recreate` flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceChangeSet {
    pub new_fields: Vec<String>,
    pub modified_fields: Vec<FieldChange>,
    pub removed_fields: Vec<String>,
    pub unchanged_fields: Vec<String>,
    /// Outbound link changes, keyed by peer (B-side) resource name —
    /// these live inside the owning A-resource's change set per §3.
    pub outbound_links: HashMap<String, LinkChange>,
    pub must_recreate: bool,
    pub condition_known_on_deploy: bool,
}

impl ResourceChangeSet {
    pub fn is_empty_diff(&self) -> bool {
        self.new_fields.is_empty() && self.modified_fields.is_empty() && self.removed_fields.is_empty()
    }
}

/// A message describing one resource's staged change, emitted on the
/// resource-changes channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceChangesMessage {
    pub resource_name: String,
    pub new: bool,
    pub removed: bool,
    pub changes: ResourceChangeSet,
}

/// A message describing one link's staged change, emitted on the
/// link-changes channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkChangesMessage {
    pub resource_a: String,
    pub resource_b: String,
    pub logical_name: String,
    pub removed: bool,
    pub field_changes: Vec<FieldChange>,
}

/// A message describing one child blueprint's (coalesced) staged change,
/// emitted on the child-changes channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildChangesMessage {
    pub child_name: String,
    pub new: bool,
    pub removed: bool,
    pub must_recreate: bool,
    pub changes: BlueprintChanges,
}

/// Export field diffs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportChange {
    pub name: String,
    pub previous: Option<JsonValue>,
    pub new: Option<JsonValue>,
}

/// Metadata field diffs (free-form object, diffed field by field).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataChanges {
    pub new: HashMap<String, JsonValue>,
    pub modified: HashMap<String, JsonValue>,
    pub removed: Vec<String>,
    pub unchanged: Vec<String>,
}

/// The aggregate diff produced by one `StageChanges` call (or one child's
/// coalesced contribution to its parent's `ChildChangesMessage`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlueprintChanges {
    pub new_resources: HashMap<String, ResourceChangeSet>,
    pub resource_changes: HashMap<String, ResourceChangeSet>,
    pub removed_resources: Vec<String>,

    pub new_children: HashMap<String, BlueprintChanges>,
    pub child_changes: HashMap<String, BlueprintChanges>,
    pub removed_children: Vec<String>,
    pub recreate_children: Vec<String>,

    pub removed_links: Vec<String>,

    pub new_exports: Vec<ExportChange>,
    pub export_changes: Vec<ExportChange>,
    pub removed_exports: Vec<String>,
    pub unchanged_exports: Vec<String>,

    pub metadata_changes: MetadataChanges,

    /// Field paths whose final value can only be computed at deploy time.
    pub resolve_on_deploy: Vec<String>,
}

impl BlueprintChanges {
    /// True for an unchanged blueprint against an unchanged instance:
    /// only unchanged exports and empty diff maps (testable property 10).
    pub fn is_unchanged(&self) -> bool {
        self.new_resources.is_empty()
            && self.resource_changes.is_empty()
            && self.removed_resources.is_empty()
            && self.new_children.is_empty()
            && self.child_changes.is_empty()
            && self.removed_children.is_empty()
            && self.recreate_children.is_empty()
            && self.removed_links.is_empty()
            && self.new_exports.is_empty()
            && self.export_changes.is_empty()
            && self.removed_exports.is_empty()
            && self.metadata_changes.new.is_empty()
            && self.metadata_changes.modified.is_empty()
            && self.metadata_changes.removed.is_empty()
    }

    /// Move a child out of `child_changes` and into `recreate_children`,
    /// per §4.4 step 9 ("removed from ChildChanges when moved to
    /// RecreateChildren").
    pub fn promote_child_to_recreate(&mut self, child_name: &str) {
        self.child_changes.remove(child_name);
        if !self.recreate_children.iter().any(|c| c == child_name) {
            self.recreate_children.push(child_name.to_string());
        }
    }
}

/// Lifecycle record for a link whose endpoints may complete staging in
/// arbitrary order. See `spec.md` §3 "Pending-link record" and §9
/// (map chosen over a queue for O(1) arrival updates).
#[derive(Debug, Clone)]
pub struct PendingLinkRecord {
    pub resource_a: String,
    pub resource_b: String,
    pub a_pending: bool,
    pub b_pending: bool,
    pub link_pending: bool,
}

impl PendingLinkRecord {
    pub fn new(resource_a: impl Into<String>, resource_b: impl Into<String>) -> Self {
        Self {
            resource_a: resource_a.into(),
            resource_b: resource_b.into(),
            a_pending: true,
            b_pending: true,
            link_pending: true,
        }
    }

    /// Stageable once both endpoints have landed their resource change.
    pub fn is_stageable(&self) -> bool {
        !self.a_pending && !self.b_pending && self.link_pending
    }

    pub fn touches(&self, node_name: &str) -> bool {
        self.resource_a == node_name || self.resource_b == node_name
    }

    pub fn mark_endpoint_done(&mut self, node_name: &str) {
        if self.resource_a == node_name {
            self.a_pending = false;
        }
        if self.resource_b == node_name {
            self.b_pending = false;
        }
    }
}

/// Key used for pending-link bookkeeping. Canonicalised by sort order
/// (not the priority-aware logical name, which is only meaningful once
/// the link implementation has been consulted) so that either endpoint
/// can register the same record first without creating a duplicate.
pub fn pending_link_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{}::{}", a, b)
    } else {
        format!("{}::{}", b, a)
    }
}
