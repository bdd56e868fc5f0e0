//! C3 — Staging state. See `spec.md` §4.3.
//!
//! A coarse-grained scratchpad shared by every task in a staging run,
//! guarded by a single `parking_lot::Mutex` the way the teacher's
//! `CheckpointManager` guards its checkpoint list — one lock, short
//! critical sections, no lock-ordering to reason about. Pending-link
//! bookkeeping is kept in the same lock so that "both endpoints landed"
//! observations are atomic with respect to concurrent group workers.

use crate::changes::{
    BlueprintChanges, ChildChangesMessage, ExportChange, LinkChangesMessage, MetadataChanges,
    PendingLinkRecord, ResourceChangeSet, ResourceChangesMessage, pending_link_key,
};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
struct Scratch {
    changes: BlueprintChanges,
    pending_links: HashMap<String, PendingLinkRecord>,
}

pub struct StagingState {
    inner: Mutex<Scratch>,
}

impl Default for StagingState {
    fn default() -> Self {
        Self::new()
    }
}

impl StagingState {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Scratch::default()),
        }
    }

    /// Record one resource's staged diff (§4.4 step "per-group staging").
    pub fn apply_resource_changes(&self, msg: ResourceChangesMessage) {
        let mut g = self.inner.lock();
        if msg.removed {
            g.changes.removed_resources.push(msg.resource_name);
        } else if msg.new {
            g.changes.new_resources.insert(msg.resource_name, msg.changes);
        } else if !msg.changes.is_empty_diff() || msg.changes.must_recreate {
            g.changes.resource_changes.insert(msg.resource_name, msg.changes);
        }
    }

    /// Record one link's staged diff, attaching it to the owning (A-side)
    /// resource's outbound link map, or to the top-level removed-links
    /// list if the link was torn down.
    pub fn apply_link_changes(&self, msg: LinkChangesMessage) {
        let mut g = self.inner.lock();
        if msg.removed {
            g.changes.removed_links.push(msg.logical_name);
            return;
        }
        let owner = g
            .changes
            .new_resources
            .get_mut(&msg.resource_a)
            .or_else(|| g.changes.resource_changes.get_mut(&msg.resource_a));

        let link_change = crate::changes::LinkChange {
            logical_name: msg.logical_name.clone(),
            new: true,
            removed: false,
            field_changes: msg.field_changes,
        };

        match owner {
            Some(change_set) => {
                change_set.outbound_links.insert(msg.resource_b, link_change);
            }
            None => {
                let mut change_set = ResourceChangeSet::default();
                change_set.outbound_links.insert(msg.resource_b, link_change);
                g.changes.resource_changes.insert(msg.resource_a, change_set);
            }
        }
    }

    /// Record one child blueprint's coalesced staged diff.
    pub fn apply_child_changes(&self, msg: ChildChangesMessage) {
        let mut g = self.inner.lock();
        if msg.removed {
            g.changes.removed_children.push(msg.child_name);
        } else if msg.must_recreate {
            g.changes.recreate_children.push(msg.child_name);
        } else if msg.new {
            g.changes.new_children.insert(msg.child_name, msg.changes);
        } else {
            g.changes.child_changes.insert(msg.child_name, msg.changes);
        }
    }

    /// Register a link between two endpoints as pending, if not already
    /// tracked (idempotent — both endpoint tasks may attempt registration).
    pub fn register_pending_link(&self, resource_a: &str, resource_b: &str) {
        let mut g = self.inner.lock();
        let key = pending_link_key(resource_a, resource_b);
        g.pending_links
            .entry(key)
            .or_insert_with(|| PendingLinkRecord::new(resource_a, resource_b));
    }

    /// Mark every pending link touching `node_name` as having that
    /// endpoint's resource change landed (§4.4's "UpdateLinkStagingState").
    pub fn update_link_staging_state(&self, node_name: &str) {
        let mut g = self.inner.lock();
        for record in g.pending_links.values_mut() {
            if record.touches(node_name) {
                record.mark_endpoint_done(node_name);
            }
        }
    }

    /// Drain and return every link now stageable (both endpoints landed),
    /// removing them from the pending map (§4.4's
    /// "MarkLinkAsNoLongerPending").
    pub fn drain_stageable_links(&self) -> Vec<PendingLinkRecord> {
        let mut g = self.inner.lock();
        let stageable_keys: Vec<String> = g
            .pending_links
            .iter()
            .filter(|(_, r)| r.is_stageable())
            .map(|(k, _)| k.clone())
            .collect();

        stageable_keys
            .into_iter()
            .filter_map(|k| g.pending_links.remove(&k))
            .collect()
    }

    /// Count links still pending (not yet stageable) that touch any node
    /// in `group` — used by the stager to decide whether a group's
    /// completion must wait on a sibling group's link resolution.
    pub fn count_pending_links_for_group(&self, group: &[String]) -> usize {
        let g = self.inner.lock();
        g.pending_links
            .values()
            .filter(|r| !r.is_stageable() && group.iter().any(|n| r.touches(n)))
            .count()
    }

    /// Flag a resource as must-recreate (e.g. because a hard-linked
    /// priority-A peer is being recreated and the cascade rule fires).
    pub fn mark_resource_must_recreate(&self, resource_name: &str) {
        let mut g = self.inner.lock();
        if let Some(cs) = g
            .changes
            .new_resources
            .get_mut(resource_name)
            .or_else(|| g.changes.resource_changes.get_mut(resource_name))
        {
            cs.must_recreate = true;
        }
    }

    /// Promote a child already staged as a plain change into the
    /// recreate-children cascade (§4.4 step 9).
    pub fn promote_child_to_recreate(&self, child_name: &str) {
        let mut g = self.inner.lock();
        g.changes.promote_child_to_recreate(child_name);
    }

    /// Snapshot a resource's staged change set, if one has landed yet.
    /// Used by link staging to fetch both endpoints' diffs without
    /// holding the lock across a provider call.
    pub fn resource_change_set(&self, resource_name: &str) -> Option<ResourceChangeSet> {
        let g = self.inner.lock();
        g.changes
            .new_resources
            .get(resource_name)
            .or_else(|| g.changes.resource_changes.get(resource_name))
            .cloned()
    }

    pub fn update_export_changes(&self, new: Vec<ExportChange>, changed: Vec<ExportChange>, removed: Vec<String>, unchanged: Vec<String>) {
        let mut g = self.inner.lock();
        g.changes.new_exports.extend(new);
        g.changes.export_changes.extend(changed);
        g.changes.removed_exports.extend(removed);
        g.changes.unchanged_exports.extend(unchanged);
    }

    pub fn update_metadata_changes(&self, metadata: MetadataChanges) {
        let mut g = self.inner.lock();
        g.changes.metadata_changes = metadata;
    }

    pub fn mark_resolve_on_deploy(&self, field_path: impl Into<String>) {
        let mut g = self.inner.lock();
        g.changes.resolve_on_deploy.push(field_path.into());
    }

    /// Consume the accumulated diff, leaving an empty scratchpad behind.
    /// Called once, after the last group has completed staging.
    pub fn extract_blueprint_changes(&self) -> BlueprintChanges {
        let mut g = self.inner.lock();
        std::mem::take(&mut g.changes)
    }
}
