//! C2 — Grouping. See `spec.md` §4.2.
//!
//! Partitions an ordered node sequence into maximal groups in which every
//! pair is independent: no reference, dependency, or link of *any* kind
//! (hard or soft) between any two members.
//!
//! `spec.md` §4.2's invariant and Testable Property 2 both state this
//! explicitly and the former gives the reason (link staging acquires the
//! shared staging-state lock and would race a same-group peer's resource
//! landing). The narrative end-to-end scenario E3 describes a soft-linked
//! pair as sharing a group — that reads as inconsistent with the stated
//! invariant/property, which are unambiguous and repeated. This
//! implementation follows the invariant: soft links still force a group
//! boundary. See `DESIGN.md` for this Open Question resolution.

use crate::node::{DeploymentNode, ReferenceGraph};

fn conflicts(node: &DeploymentNode, other: &DeploymentNode, refs: &dyn ReferenceGraph) -> bool {
    let (a, b) = (node.bare_name(), other.bare_name());

    if refs.references(a, b) || refs.references(b, a) {
        return true;
    }

    if let (Some(na), Some(nb)) = (node.as_resource(), other.as_resource()) {
        if na.link_with(&nb.resource_name).is_some() || nb.link_with(&na.resource_name).is_some() {
            return true;
        }
    }

    false
}

/// Partition an already-ordered sequence into maximal independent groups.
/// Concatenating the result in order reproduces a permutation consistent
/// with the input ordering (Testable Property 3).
pub fn group_nodes(ordered: Vec<DeploymentNode>, refs: &dyn ReferenceGraph) -> Vec<Vec<DeploymentNode>> {
    let mut groups: Vec<Vec<DeploymentNode>> = Vec::new();
    let mut current: Vec<DeploymentNode> = Vec::new();

    for node in ordered {
        let conflicts_with_current = current.iter().any(|member| conflicts(&node, member, refs));
        if conflicts_with_current {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
        }
        current.push(node);
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}
