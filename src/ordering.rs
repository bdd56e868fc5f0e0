//! C1 — Ordering. See `spec.md` §4.1.
//!
//! Produces a flat sequence of deployment nodes honouring hard links,
//! explicit references/dependencies, and (for resource/child and
//! child/child pairs) reference-graph reachability. Soft links impose no
//! ordering.
//!
//! Link kind/priority (`GetKind`/`GetPriorityResource` in the spec's
//! provider contract) are resolved once during preparation (C5), when a
//! `Link`'s `kind`/`priority` fields are populated from the provider — see
//! `DESIGN.md` for this Open Question resolution. Ordering itself therefore
//! only fails on structural problems (e.g. a link endpoint that doesn't
//! name a node in the input set), not on a live provider call.

use crate::error::{ContainerError, Result};
use crate::link::{LinkKind, PriorityResource};
use crate::node::{DeploymentNode, ReferenceGraph};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet, VecDeque};

/// Precomputed "must precede" edges derived from hard links, so that
/// ancestor/descendant hard-link chains (not just direct pairs) can be
/// consulted in O(1) amortised per comparison via BFS-memoised reachability.
struct HardLinkGraph {
    /// resource name -> resources it must precede (direct hard-link edges)
    edges: HashMap<String, Vec<String>>,
}

impl HardLinkGraph {
    fn build(nodes: &[DeploymentNode]) -> Self {
        let mut edges: HashMap<String, Vec<String>> = HashMap::new();
        for node in nodes {
            let Some(chain) = node.as_resource() else {
                continue;
            };
            for link in chain.link_implementations.values() {
                if link.kind != LinkKind::Hard {
                    continue;
                }
                let (first, second) = match link.priority {
                    PriorityResource::A => (link.id.resource_a.clone(), link.id.resource_b.clone()),
                    PriorityResource::B => (link.id.resource_b.clone(), link.id.resource_a.clone()),
                    PriorityResource::None => continue,
                };
                edges.entry(first).or_default().push(second);
            }
        }
        Self { edges }
    }

    /// Is `to` reachable from `from` by following "must precede" edges?
    fn precedes(&self, from: &str, to: &str) -> bool {
        if from == to {
            return false;
        }
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(from);
        seen.insert(from);
        while let Some(current) = queue.pop_front() {
            if let Some(successors) = self.edges.get(current) {
                for succ in successors {
                    if succ == to {
                        return true;
                    }
                    if seen.insert(succ.as_str()) {
                        queue.push_back(succ.as_str());
                    }
                }
            }
        }
        false
    }
}

fn compare_nodes(
    a: &DeploymentNode,
    b: &DeploymentNode,
    hard: &HardLinkGraph,
    refs: &dyn ReferenceGraph,
) -> Ordering {
    let (a_name, b_name) = (a.bare_name(), b.bare_name());

    // Rule (c): explicit references/dependencies win regardless of link
    // kind, and apply uniformly to resource/resource, resource/child and
    // child/child pairs (reachability, not just a direct edge).
    if refs.reachable(a_name, b_name) {
        // a depends on b -> b precedes a
        return Ordering::Greater;
    }
    if refs.reachable(b_name, a_name) {
        return Ordering::Less;
    }

    // Rules (a)/(b): direct hard link and ancestor-descendant hard-link
    // chains. Links never cross into children, so this only fires for
    // resource/resource pairs.
    if a.is_resource() && b.is_resource() {
        if hard.precedes(a_name, b_name) {
            return Ordering::Less;
        }
        if hard.precedes(b_name, a_name) {
            return Ordering::Greater;
        }
    }

    Ordering::Equal
}

/// Sort `nodes` into a sequence honouring `spec.md` §4.1's partial order.
///
/// Uses a pairwise comparator stabilised by full-pass bubble compare: the
/// comparator above is not guaranteed to be a total order (soft links and
/// independent elements legitimately compare `Equal`), so a key-based sort
/// cannot be used — every adjacent pair is re-consulted on every pass until
/// a full pass produces no swaps.
pub fn order_nodes(nodes: Vec<DeploymentNode>, refs: &dyn ReferenceGraph) -> Result<Vec<DeploymentNode>> {
    let mut names: HashSet<String> = HashSet::new();
    for node in &nodes {
        if !names.insert(node.bare_name().to_string()) {
            return Err(ContainerError::OrderingFailed(format!(
                "duplicate node name '{}'",
                node.bare_name()
            )));
        }
    }

    let hard = HardLinkGraph::build(&nodes);
    let mut ordered = nodes;
    let n = ordered.len();
    loop {
        let mut swapped = false;
        for i in 0..n.saturating_sub(1) {
            if compare_nodes(&ordered[i], &ordered[i + 1], &hard, refs) == Ordering::Greater {
                ordered.swap(i, i + 1);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
    Ok(ordered)
}
