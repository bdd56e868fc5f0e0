//! Deployment nodes, chain link nodes and reference chain nodes.
//!
//! See `spec.md` §3. These are the in-memory shapes ordering (C1) and
//! grouping (C2) operate over; they are produced by the preparer (C5)
//! from a `BlueprintSpec` plus the reference graph.

use crate::link::{Link, LinkKind};
use std::collections::{HashMap, HashSet};

/// A resource plus its link adjacency.
#[derive(Debug, Clone)]
pub struct ChainLinkNode {
    pub resource_name: String,
    pub resource_type: String,
    /// Names of resources this one links to (outbound).
    pub links_to: HashSet<String>,
    /// Names of resources that link to this one (inbound).
    pub linked_from: HashSet<String>,
    /// Peer resource name -> link implementation.
    pub link_implementations: HashMap<String, Link>,
    /// Ancestor paths, e.g. `["/networking/vpc"]`, enumerating how this
    /// node is reached from the chain roots (for nested child chains).
    pub ancestor_paths: Vec<String>,
}

impl ChainLinkNode {
    pub fn new(resource_name: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            resource_type: resource_type.into(),
            links_to: HashSet::new(),
            linked_from: HashSet::new(),
            link_implementations: HashMap::new(),
            ancestor_paths: Vec::new(),
        }
    }

    pub fn add_link(&mut self, link: Link) {
        let (from, to) = (link.id.resource_a.clone(), link.id.resource_b.clone());
        if from == self.resource_name {
            self.links_to.insert(to.clone());
            self.link_implementations.insert(to, link);
        } else if to == self.resource_name {
            self.linked_from.insert(from.clone());
            self.link_implementations.insert(from, link);
        }
    }

    /// The link implementation connecting this node to `peer`, if any.
    pub fn link_with(&self, peer: &str) -> Option<&Link> {
        self.link_implementations.get(peer)
    }

    pub fn hard_links_to(&self) -> impl Iterator<Item = &str> {
        self.links_to.iter().filter_map(move |peer| {
            self.link_implementations
                .get(peer)
                .filter(|l| l.kind == LinkKind::Hard)
                .map(|_| peer.as_str())
        })
    }
}

/// Any element (resource, child, export, variable) plus its reference
/// adjacency — i.e. what substitutions in its spec point at.
#[derive(Debug, Clone, Default)]
pub struct RefChainNode {
    pub name: String,
    /// Names of elements this one references or depends on (must be
    /// deployed/staged first).
    pub references: HashSet<String>,
}

impl RefChainNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            references: HashSet::new(),
        }
    }
}

/// Lookup service for reference-chain adjacency, consumed as an external
/// collaborator (the reference-graph collector is out of scope per
/// `spec.md` §1).
pub trait ReferenceGraph: Send + Sync {
    /// Does `from` reference or depend on `to`, directly?
    fn references(&self, from: &str, to: &str) -> bool;

    /// Is `to` reachable from `from` via zero or more reference edges
    /// (used for resource/child and child/child ordering per §4.1)?
    fn reachable(&self, from: &str, to: &str) -> bool;

    /// Direct dependents of `of` — elements that reference or depend on
    /// it. Used by the change stager to compute the recreate cascade
    /// (§4.4 step 4, §8 property 6). Default empty for lookups that only
    /// support point queries.
    fn dependents(&self, _of: &str) -> Vec<String> {
        Vec::new()
    }
}

/// The unit of ordering and grouping: a tagged resource-or-child node.
#[derive(Debug, Clone)]
pub enum DeploymentNode {
    Resource(ChainLinkNode),
    Child(RefChainNode),
}

impl DeploymentNode {
    /// Unique name within the instance, prefixed `resources.` or
    /// `children.` per `spec.md` §3.
    pub fn qualified_name(&self) -> String {
        match self {
            DeploymentNode::Resource(n) => format!("resources.{}", n.resource_name),
            DeploymentNode::Child(n) => format!("children.{}", n.name),
        }
    }

    pub fn bare_name(&self) -> &str {
        match self {
            DeploymentNode::Resource(n) => &n.resource_name,
            DeploymentNode::Child(n) => &n.name,
        }
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, DeploymentNode::Resource(_))
    }

    pub fn as_resource(&self) -> Option<&ChainLinkNode> {
        match self {
            DeploymentNode::Resource(n) => Some(n),
            DeploymentNode::Child(_) => None,
        }
    }
}
