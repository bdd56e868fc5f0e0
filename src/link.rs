//! Links: typed relationships between two resources.
//!
//! See `spec.md` §3 "Link". A link is identified by the ordered pair
//! `(resourceAName, resourceBName)`; its logical name on the wire is
//! `"A::B"`, always naming the priority resource first when one exists.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which endpoint (if any) a link implementation declares as priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityResource {
    A,
    B,
    None,
}

/// Whether a link imposes deployment ordering on its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkKind {
    /// The priority resource must exist before the other endpoint.
    Hard,
    /// Endpoints may be deployed concurrently.
    Soft,
}

/// Identity of a link: the ordered resource-name pair plus its link type
/// string (the provider-registered implementation that owns this pairing).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkId {
    pub resource_a: String,
    pub resource_b: String,
}

impl LinkId {
    pub fn new(resource_a: impl Into<String>, resource_b: impl Into<String>) -> Self {
        Self {
            resource_a: resource_a.into(),
            resource_b: resource_b.into(),
        }
    }

    /// Logical name `"A::B"`, using `priority` to decide ordering of the
    /// pair when it names an endpoint; falls back to declaration order.
    pub fn logical_name(&self, priority: PriorityResource) -> String {
        match priority {
            PriorityResource::B => format!("{}::{}", self.resource_b, self.resource_a),
            _ => format!("{}::{}", self.resource_a, self.resource_b),
        }
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.resource_a, self.resource_b)
    }
}

/// A concrete link between two resources as asserted by the blueprint's
/// implicit adjacency plus the provider's link implementation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub link_type: String,
    pub kind: LinkKind,
    pub priority: PriorityResource,
}

impl Link {
    pub fn logical_name(&self) -> String {
        self.id.logical_name(self.priority)
    }

    /// Returns the endpoint that must precede the other under this link's
    /// kind, or `None` if the link imposes no ordering (soft, or no
    /// declared priority).
    pub fn priority_name(&self) -> Option<&str> {
        if self.kind != LinkKind::Hard {
            return None;
        }
        match self.priority {
            PriorityResource::A => Some(self.id.resource_a.as_str()),
            PriorityResource::B => Some(self.id.resource_b.as_str()),
            PriorityResource::None => None,
        }
    }
}
