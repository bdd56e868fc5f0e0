//! C5 — Preparer. See `spec.md` §4.1 (the node/link graph it produces)
//! and §2 ("expands resource templates, applies resource conditions,
//! populates spec defaults; produces the expanded blueprint consumed by
//! C1/C2").
//!
//! This is the one place implicit links get materialised: `spec.md` §3
//! says links are "implicit from resource adjacency plus typed link
//! implementations" — for every reference edge between two resources,
//! the preparer asks the provider whether that resource-type pair has a
//! registered link implementation, and if so resolves its kind/priority
//! once, up front (see `ordering.rs`'s doc comment for why that matters).

use crate::blueprint::BlueprintSpec;
use crate::cache::LinkTypeCache;
use crate::error::{ContainerError, Result};
use crate::grouping::group_nodes;
use crate::link::{Link, LinkId};
use crate::node::{ChainLinkNode, DeploymentNode, RefChainNode, ReferenceGraph};
use crate::ordering::order_nodes;
use crate::provider::Provider;
use crate::substitution::SubstitutionResolver;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, HashSet};

/// Output of preparation: the expanded blueprint (conditions applied)
/// plus the ordered node sequence and its parallel groups, ready for C4
/// (staging) or C6 (deployment) to walk.
pub struct PreparedBlueprint {
    pub expanded: BlueprintSpec,
    pub ordered: Vec<DeploymentNode>,
    pub groups: Vec<Vec<DeploymentNode>>,
    /// Names of resources whose `condition` only resolves at deploy time —
    /// retained speculatively in `expanded` with
    /// `ResourceChangeSet::condition_known_on_deploy` set by the caller
    /// (§3 "Resource change set").
    pub conditions_known_on_deploy: HashSet<String>,
}

impl PreparedBlueprint {
    /// Render the parallel groups as a human-readable execution plan, one
    /// line per group, for `tracing` output and tests. Mirrors the
    /// teacher's `PipelineDAG::execution_plan()` (`dag.rs`): phases
    /// numbered from 1, members of a multi-node group joined by `∥`.
    pub fn execution_plan(&self) -> String {
        self.groups
            .iter()
            .enumerate()
            .map(|(i, group)| {
                let names: Vec<&str> = group.iter().map(|n| n.bare_name()).collect();
                if names.len() > 1 {
                    format!("Group {}: {} (parallel)", i + 1, names.join(" ∥ "))
                } else {
                    format!("Group {}: {}", i + 1, names[0])
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub struct Preparer<'a> {
    provider: &'a dyn Provider,
    resolver: &'a dyn SubstitutionResolver,
    link_type_cache: LinkTypeCache,
}

impl<'a> Preparer<'a> {
    pub fn new(provider: &'a dyn Provider, resolver: &'a dyn SubstitutionResolver) -> Self {
        Self {
            provider,
            resolver,
            link_type_cache: LinkTypeCache::new(),
        }
    }

    pub async fn prepare(
        &self,
        blueprint: &BlueprintSpec,
        refs: &dyn ReferenceGraph,
        variables: &HashMap<String, JsonValue>,
    ) -> Result<PreparedBlueprint> {
        let mut expanded = blueprint.clone();

        let mut conditions_known_on_deploy = HashSet::new();
        let mut retained = Vec::with_capacity(expanded.resources.len());
        for resource in expanded.resources {
            let (holds, known_on_deploy) =
                resource_condition(&resource.condition, self.resolver, variables).await?;
            if !holds {
                continue;
            }
            if known_on_deploy {
                conditions_known_on_deploy.insert(resource.name.clone());
            }
            retained.push(resource);
        }
        expanded.resources = retained;

        let mut chain_nodes: HashMap<String, ChainLinkNode> = expanded
            .resources
            .iter()
            .map(|r| (r.name.clone(), ChainLinkNode::new(r.name.clone(), r.resource_type.clone())))
            .collect();

        let names: Vec<String> = expanded.resources.iter().map(|r| r.name.clone()).collect();
        for a in &names {
            for b in &names {
                if a == b || !refs.references(a, b) {
                    continue;
                }
                let a_type = expanded.resource(a).expect("name from expanded.resources").resource_type.clone();
                let b_type = expanded.resource(b).expect("name from expanded.resources").resource_type.clone();

                let link_type = match self.link_type_cache.get(&a_type, &b_type) {
                    Some(cached) => cached,
                    None => {
                        let resolved = self.provider.find_link_type(&a_type, &b_type).await?;
                        self.link_type_cache.insert(&a_type, &b_type, resolved.clone());
                        resolved
                    }
                };

                if let Some(link_type) = link_type {
                    let kind = self.provider.get_link_kind(&link_type).await?;
                    let priority = self.provider.get_priority_resource(&link_type).await?;
                    let link = Link {
                        id: LinkId::new(a.clone(), b.clone()),
                        link_type,
                        kind,
                        priority,
                    };
                    if let Some(node) = chain_nodes.get_mut(a) {
                        node.add_link(link.clone());
                    }
                    if let Some(node) = chain_nodes.get_mut(b) {
                        node.add_link(link);
                    }
                }
            }
        }

        let mut nodes: Vec<DeploymentNode> = chain_nodes.into_values().map(DeploymentNode::Resource).collect();
        nodes.extend(
            expanded
                .children
                .iter()
                .map(|c| DeploymentNode::Child(RefChainNode::new(c.name.clone()))),
        );

        let ordered = order_nodes(nodes, refs)?;
        let groups = group_nodes(ordered.clone(), refs);

        Ok(PreparedBlueprint {
            expanded,
            ordered,
            groups,
            conditions_known_on_deploy,
        })
    }
}

/// Whether a resource's `condition` gates it into the deployment set, and
/// whether that decision is only known once deployed. A condition is
/// either a literal boolean or a substitution path string; anything else
/// is treated as satisfied. A deferred path is retained speculatively
/// (§3 `ConditionKnownOnDeploy`) rather than dropped, since the caller
/// cannot yet tell whether it would hold.
async fn resource_condition(
    condition: &Option<JsonValue>,
    resolver: &dyn SubstitutionResolver,
    variables: &HashMap<String, JsonValue>,
) -> Result<(bool, bool)> {
    let path = match condition {
        None => return Ok((true, false)),
        Some(JsonValue::Bool(holds)) => return Ok((*holds, false)),
        Some(JsonValue::String(path)) => path,
        Some(_) => return Ok((true, false)),
    };

    if resolver.is_deferred(path, variables) {
        return Ok((true, true));
    }
    match resolver.resolve(path, variables).await {
        Ok(JsonValue::Bool(holds)) => Ok((holds, false)),
        Ok(_) => Ok((true, false)),
        Err(ContainerError::DeferredValueRequired(_)) => Ok((true, true)),
        Err(err) => Err(err),
    }
}
