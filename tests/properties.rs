//! Property-based tests for the two naturally generative properties
//! named in `spec.md` §8: ordering respects hard links, and grouping
//! safety (no two co-grouped members conflict, and grouping preserves
//! the ordered sequence under concatenation).
//!
//! Edges are generated index-increasing (`i < j`) so the generated hard
//! link / reference graph is acyclic by construction — `order_nodes`'s
//! comparator assumes a partial order and has no defined behaviour for
//! cyclic input.

use blueprint_container::testutil::FakeReferenceGraph;
use blueprint_container::{ChainLinkNode, DeploymentNode, Link, LinkId, LinkKind, PriorityResource};
use blueprint_container::grouping::group_nodes;
use blueprint_container::ordering::order_nodes;
use proptest::collection::vec as pvec;
use proptest::prelude::*;

const MAX_NODES: usize = 6;

fn resource_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("r{}", i)).collect()
}

/// Generate a boolean for every `(i, j)` pair with `i < j` among `n`
/// nodes, used to decide whether a hard link or reference edge exists
/// from `i` to `j`. Always index-increasing, so never cyclic.
fn edge_flags(n: usize) -> impl Strategy<Value = Vec<bool>> {
    let pair_count = n * n.saturating_sub(1) / 2;
    pvec(any::<bool>(), pair_count)
}

fn pair_indices(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push((i, j));
        }
    }
    pairs
}

/// A node count paired with one edge flag per `(i, j)`, `i < j` pair
/// among that many nodes — generated jointly so the flag vector's
/// length always matches the node count that produced it.
fn sized_graph() -> impl Strategy<Value = (usize, Vec<bool>)> {
    (2..=MAX_NODES).prop_flat_map(|n| (Just(n), edge_flags(n)))
}

proptest! {
    /// Every hard link's priority-resource endpoint is ordered strictly
    /// before its peer, regardless of how many other hard links are
    /// present (spec.md §4.1 rules a/b, §8 "ordering respects hard
    /// links").
    #[test]
    fn ordering_respects_hard_links((n, flags) in sized_graph()) {
        let names = resource_names(n);
        let pairs = pair_indices(n);

        let mut nodes: Vec<ChainLinkNode> = names
            .iter()
            .map(|name| ChainLinkNode::new(name.clone(), "test/type"))
            .collect();

        // i < j: link priority always on the lower index (resource A),
        // so "must precede" edges point strictly forward (i before j)
        // and never form a cycle.
        let mut expected_precedes: Vec<(usize, usize)> = Vec::new();
        for (&(i, j), &has_edge) in pairs.iter().zip(flags.iter()) {
            if !has_edge {
                continue;
            }
            let link = Link {
                id: LinkId::new(names[i].clone(), names[j].clone()),
                link_type: format!("link-{}-{}", i, j),
                kind: LinkKind::Hard,
                priority: PriorityResource::A,
            };
            nodes[i].add_link(link.clone());
            nodes[j].add_link(link);
            expected_precedes.push((i, j));
        }

        let deployment_nodes: Vec<DeploymentNode> = nodes.into_iter().map(DeploymentNode::Resource).collect();
        let refs = FakeReferenceGraph::new();
        let ordered = order_nodes(deployment_nodes, &refs).unwrap();

        let position: std::collections::HashMap<&str, usize> =
            ordered.iter().enumerate().map(|(pos, node)| (node.bare_name(), pos)).collect();

        for (i, j) in expected_precedes {
            prop_assert!(
                position[names[i].as_str()] < position[names[j].as_str()],
                "resource {} (hard-link priority) must precede {}",
                names[i],
                names[j],
            );
        }
    }

    /// Grouping never places two mutually independent-or-not members in
    /// the same group when a reference edge connects them, and
    /// concatenating the groups in order always reproduces the exact
    /// ordered input (spec.md §8 "grouping safety", Testable Property 3).
    #[test]
    fn grouping_respects_references_and_preserves_order((n, flags) in sized_graph()) {
        let names = resource_names(n);
        let pairs = pair_indices(n);

        let mut refs = FakeReferenceGraph::new();
        let mut referenced_pairs: Vec<(usize, usize)> = Vec::new();
        for (&(i, j), &has_edge) in pairs.iter().zip(flags.iter()) {
            if !has_edge {
                continue;
            }
            // i < j, so this can never create a reference cycle.
            refs = refs.with_reference(names[j].clone(), names[i].clone());
            referenced_pairs.push((i, j));
        }

        let nodes: Vec<DeploymentNode> = names
            .iter()
            .map(|name| DeploymentNode::Resource(ChainLinkNode::new(name.clone(), "test/type")))
            .collect();

        let ordered = order_nodes(nodes, &refs).unwrap();
        let ordered_names: Vec<String> = ordered.iter().map(|n| n.bare_name().to_string()).collect();

        let groups = group_nodes(ordered, &refs);

        let flattened: Vec<String> = groups.iter().flatten().map(|n| n.bare_name().to_string()).collect();
        prop_assert_eq!(flattened, ordered_names);

        for group in &groups {
            for a in group {
                for b in group {
                    if a.bare_name() == b.bare_name() {
                        continue;
                    }
                    prop_assert!(
                        !refs.references(a.bare_name(), b.bare_name()),
                        "group member {} must not reference co-grouped member {}",
                        a.bare_name(),
                        b.bare_name(),
                    );
                }
            }
        }

        let _ = referenced_pairs;
    }
}
