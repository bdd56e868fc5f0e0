//! C4 — Change stager. See `spec.md` §4.4.
//!
//! Public contract: `StageChanges(instanceID, destroy?) -> streaming
//! events + complete event`. Walks the parallel groups produced by the
//! preparer (C5), diffing resources, links, children, exports and
//! metadata against the recorded instance state, accumulating into the
//! staging state (C3) and relaying events live. Grounded in the
//! teacher's `PipelineOrchestrator::run_dag` (`orchestrator.rs`): one
//! pass per group, concurrent within a group, strictly sequential
//! between groups.

use crate::blueprint::{BlueprintSpec, ChildSpec};
use crate::changes::{
    BlueprintChanges, ChildChangesMessage, ExportChange, FieldChange, LinkChangesMessage, MetadataChanges,
    ResourceChangeSet, ResourceChangesMessage,
};
use crate::child_orchestrator::{check_tree_guards, layer_variables, BlueprintLoader, ChildOrchestrator};
use crate::config::ContainerConfig;
use crate::error::{ContainerError, Result};
use crate::events::EventSink;
use crate::node::{DeploymentNode, ReferenceGraph};
use crate::preparer::Preparer;
use crate::provider::Provider;
use crate::staging_state::StagingState;
use crate::state_store::{InstanceState, StateStore};
use crate::substitution::SubstitutionResolver;
use futures::future::{join_all, BoxFuture};
use serde_json::Value as JsonValue;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

pub struct ChangeStager<'a> {
    pub provider: &'a dyn Provider,
    pub state_store: &'a dyn StateStore,
    pub resolver: &'a dyn SubstitutionResolver,
    pub loader: &'a dyn BlueprintLoader,
    pub config: ContainerConfig,
}

/// Owns the blueprint by `Arc` rather than borrowing it: each recursion
/// into a child loads its own blueprint document at runtime, which has
/// no lifetime relationship to the parent's borrowed input.
struct StageContext<'a> {
    instance_id: String,
    blueprint: Arc<BlueprintSpec>,
    refs: &'a dyn ReferenceGraph,
    destroy: bool,
    tree_path: Vec<String>,
    events: EventSink,
    /// Effective variable scope for this blueprint instance: the root
    /// call's own declared defaults, or a child's inherited-plus-override
    /// scope layered by `layer_variables` (§4.6 step 3).
    variables: HashMap<String, JsonValue>,
}

impl<'a> ChangeStager<'a> {
    /// Entry point. Sends the terminal `complete` or `error` event itself;
    /// recursive child calls never do (their resource/link events are
    /// relayed live on the same channels, but their "complete" becomes a
    /// single `ChildChangesMessage` on the parent's child channel — §9
    /// Open Question (a), resolved in favour of buffering per-child).
    pub async fn stage_changes(
        &self,
        instance_id: &str,
        blueprint: &BlueprintSpec,
        refs: &'a dyn ReferenceGraph,
        destroy: bool,
        events: EventSink,
    ) -> Result<BlueprintChanges> {
        let ctx = StageContext {
            instance_id: instance_id.to_string(),
            blueprint: Arc::new(blueprint.clone()),
            refs,
            destroy,
            tree_path: Vec::new(),
            events: events.clone(),
            variables: blueprint.default_variables(),
        };
        match self.stage_changes_inner(ctx).await {
            Ok(changes) => {
                events.send_complete(changes.clone()).await;
                Ok(changes)
            }
            Err(err) => {
                events.send_error(Some(instance_id.to_string()), &err).await;
                Err(err)
            }
        }
    }

    fn stage_changes_inner(&'a self, ctx: StageContext<'a>) -> BoxFuture<'a, Result<BlueprintChanges>> {
        Box::pin(async move {
            check_tree_guards(&ctx.instance_id, &ctx.tree_path, self.config.max_blueprint_depth)?;

            if ctx.destroy {
                return self.stage_destroy(&ctx).await;
            }

            let instance_state = match self.state_store.get_instance_state(&ctx.instance_id).await {
                Ok(state) => state,
                Err(err) if err.is_not_found() => InstanceState::new(ctx.instance_id.clone()),
                Err(err) => return Err(err),
            };

            let preparer = Preparer::new(self.provider, self.resolver);
            let prepared = preparer.prepare(ctx.blueprint.as_ref(), ctx.refs, &ctx.variables).await?;

            let new_names: HashSet<&str> = prepared.ordered.iter().map(|n| n.bare_name()).collect();

            let removed_resources: Vec<String> = instance_state
                .resource_states
                .keys()
                .filter(|name| !new_names.contains(name.as_str()))
                .cloned()
                .collect();
            let removed_children: Vec<String> = instance_state
                .child_instance_ids
                .keys()
                .filter(|name| !new_names.contains(name.as_str()))
                .cloned()
                .collect();

            let recreate_set = transitive_dependents(
                removed_resources.iter().chain(removed_children.iter()),
                ctx.refs,
            );

            let staging_state = StagingState::new();
            for name in &removed_resources {
                staging_state.apply_resource_changes(ResourceChangesMessage {
                    resource_name: name.clone(),
                    new: false,
                    removed: true,
                    changes: ResourceChangeSet::default(),
                });
            }
            for name in &removed_children {
                staging_state.apply_child_changes(ChildChangesMessage {
                    child_name: name.clone(),
                    new: false,
                    removed: true,
                    must_recreate: false,
                    changes: BlueprintChanges::default(),
                });
            }

            let node_index: HashMap<&str, &DeploymentNode> =
                prepared.ordered.iter().map(|n| (n.bare_name(), n)).collect();

            for group in &prepared.groups {
                self.stage_group(
                    &ctx,
                    group,
                    &prepared.expanded,
                    &instance_state,
                    &recreate_set,
                    &prepared.conditions_known_on_deploy,
                    &staging_state,
                    &node_index,
                )
                .await?;
            }

            self.stage_exports(&ctx, &prepared.expanded, &instance_state, &staging_state).await?;
            self.stage_metadata(&prepared.expanded, &instance_state, &staging_state);

            Ok(staging_state.extract_blueprint_changes())
        })
    }

    async fn stage_destroy(&'a self, ctx: &StageContext<'a>) -> Result<BlueprintChanges> {
        let instance_state = match self.state_store.get_instance_state(&ctx.instance_id).await {
            Ok(state) => state,
            Err(err) if err.is_not_found() => {
                // Destroying an already-absent instance is a no-op (§8
                // property 9, destroy idempotence).
                return Ok(BlueprintChanges::default());
            }
            Err(err) => return Err(err),
        };

        let mut changes = BlueprintChanges::default();
        for name in instance_state.resource_states.keys() {
            ctx.events
                .send_resource_change(ResourceChangesMessage {
                    resource_name: name.clone(),
                    new: false,
                    removed: true,
                    changes: ResourceChangeSet::default(),
                })
                .await;
            changes.removed_resources.push(name.clone());
        }
        for name in instance_state.child_instance_ids.keys() {
            ctx.events
                .send_child_change(ChildChangesMessage {
                    child_name: name.clone(),
                    new: false,
                    removed: true,
                    must_recreate: false,
                    changes: BlueprintChanges::default(),
                })
                .await;
            changes.removed_children.push(name.clone());
        }
        for logical_name in instance_state.link_states.keys() {
            changes.removed_links.push(logical_name.clone());
        }
        for name in instance_state.exports.keys() {
            changes.removed_exports.push(name.clone());
        }
        Ok(changes)
    }

    #[allow(clippy::too_many_arguments)]
    async fn stage_group(
        &'a self,
        ctx: &StageContext<'a>,
        group: &[DeploymentNode],
        expanded: &BlueprintSpec,
        instance_state: &InstanceState,
        recreate_set: &HashSet<String>,
        conditions_known_on_deploy: &HashSet<String>,
        staging_state: &StagingState,
        node_index: &HashMap<&str, &DeploymentNode>,
    ) -> Result<()> {
        let tasks = group.iter().map(|node| {
            self.stage_node(ctx, node, expanded, instance_state, recreate_set, conditions_known_on_deploy, staging_state)
        });
        for result in join_all(tasks).await {
            result?;
        }

        for record in staging_state.drain_stageable_links() {
            self.stage_link(ctx, &record.resource_a, &record.resource_b, instance_state, staging_state, node_index)
                .await?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn stage_node(
        &'a self,
        ctx: &StageContext<'a>,
        node: &DeploymentNode,
        expanded: &BlueprintSpec,
        instance_state: &InstanceState,
        recreate_set: &HashSet<String>,
        conditions_known_on_deploy: &HashSet<String>,
        staging_state: &StagingState,
    ) -> Result<()> {
        match node {
            DeploymentNode::Resource(chain) => {
                let resource = expanded
                    .resource(&chain.resource_name)
                    .ok_or_else(|| ContainerError::not_found(format!("resource '{}'", chain.resource_name)))?;
                let previous = instance_state.resource_states.get(&chain.resource_name).map(|r| &r.state);
                let diff = self
                    .provider
                    .diff_resource(&resource.resource_type, &resource.spec, previous)
                    .await?;

                let change_set = ResourceChangeSet {
                    new_fields: diff.new_fields,
                    modified_fields: diff
                        .modified_fields
                        .into_iter()
                        .map(|(field_path, previous, new)| FieldChange { field_path, previous, new })
                        .collect(),
                    removed_fields: diff.removed_fields,
                    unchanged_fields: diff.unchanged_fields,
                    outbound_links: HashMap::new(),
                    must_recreate: diff.must_recreate || recreate_set.contains(&chain.resource_name),
                    condition_known_on_deploy: conditions_known_on_deploy.contains(&chain.resource_name),
                };

                let msg = ResourceChangesMessage {
                    resource_name: chain.resource_name.clone(),
                    new: previous.is_none(),
                    removed: false,
                    changes: change_set,
                };
                staging_state.apply_resource_changes(msg.clone());
                ctx.events.send_resource_change(msg).await;

                for peer in chain.links_to.iter().chain(chain.linked_from.iter()) {
                    staging_state.register_pending_link(&chain.resource_name, peer);
                }
                staging_state.update_link_staging_state(&chain.resource_name);
                Ok(())
            }
            DeploymentNode::Child(refnode) => {
                let child_spec = expanded
                    .child(&refnode.name)
                    .ok_or_else(|| ContainerError::not_found(format!("child '{}'", refnode.name)))?;

                let orchestrator = ChildOrchestrator::new(self.loader, self.config.max_blueprint_depth);
                let (child_instance_id, child_blueprint) = orchestrator
                    .prepare_child(&ctx.instance_id, &ctx.tree_path, child_spec)
                    .await?;

                let mut child_tree_path = ctx.tree_path.clone();
                child_tree_path.push(ctx.instance_id.clone());

                // The child's own declared defaults, with the parent's
                // inherited variables and the include's explicit overrides
                // layered on top (§4.6 step 3); explicit bindings always
                // win over a default.
                let mut child_variables = child_blueprint.default_variables();
                child_variables.extend(layer_variables(&ctx.variables, child_spec));

                let child_ctx = StageContext {
                    instance_id: child_instance_id.clone(),
                    blueprint: Arc::new(child_blueprint),
                    refs: ctx.refs,
                    destroy: ctx.destroy,
                    tree_path: child_tree_path,
                    events: ctx.events.clone(),
                    variables: child_variables,
                };
                let child_changes = self.stage_changes_inner(child_ctx).await?;

                let msg = ChildChangesMessage {
                    child_name: refnode.name.clone(),
                    new: !instance_state.child_instance_ids.contains_key(&refnode.name),
                    removed: false,
                    must_recreate: recreate_set.contains(&refnode.name),
                    changes: child_changes,
                };
                staging_state.apply_child_changes(msg.clone());
                ctx.events.send_child_change(msg).await;
                Ok(())
            }
        }
    }

    async fn stage_link(
        &'a self,
        ctx: &StageContext<'a>,
        resource_a: &str,
        resource_b: &str,
        instance_state: &InstanceState,
        staging_state: &StagingState,
        node_index: &HashMap<&str, &DeploymentNode>,
    ) -> Result<()> {
        let link = node_index
            .get(resource_a)
            .and_then(|n| n.as_resource())
            .and_then(|chain| chain.link_with(resource_b))
            .or_else(|| {
                node_index
                    .get(resource_b)
                    .and_then(|n| n.as_resource())
                    .and_then(|chain| chain.link_with(resource_a))
            });
        let Some(link) = link else { return Ok(()) };

        let logical_name = link.logical_name();
        let current_state = instance_state
            .link_states
            .get(&logical_name)
            .cloned()
            .unwrap_or(serde_json::Value::Null);

        let a_changes = staging_state.resource_change_set(resource_a).unwrap_or_default();
        let b_changes = staging_state.resource_change_set(resource_b).unwrap_or_default();

        let a_payload = serde_json::to_value(&a_changes).unwrap_or(serde_json::Value::Null);
        let b_payload = serde_json::to_value(&b_changes).unwrap_or(serde_json::Value::Null);

        let link_diff = self
            .provider
            .stage_link(&link.link_type, &a_payload, &b_payload, &current_state)
            .await?;

        let msg = LinkChangesMessage {
            resource_a: link.id.resource_a.clone(),
            resource_b: link.id.resource_b.clone(),
            logical_name,
            removed: false,
            field_changes: vec![FieldChange {
                field_path: "diff".to_string(),
                previous: None,
                new: Some(link_diff),
            }],
        };
        staging_state.apply_link_changes(msg.clone());
        ctx.events.send_link_change(msg).await;
        Ok(())
    }

    async fn stage_exports(
        &'a self,
        ctx: &StageContext<'a>,
        expanded: &BlueprintSpec,
        instance_state: &InstanceState,
        staging_state: &StagingState,
    ) -> Result<()> {
        let mut new_exports = Vec::new();
        let mut changed = Vec::new();
        let mut unchanged = Vec::new();

        for export in &expanded.exports {
            if self.resolver.is_deferred(&export.field_path, &ctx.variables) {
                staging_state.mark_resolve_on_deploy(export.field_path.clone());
                continue;
            }
            let resolved = match self.resolver.resolve(&export.field_path, &ctx.variables).await {
                Ok(value) => value,
                Err(ContainerError::DeferredValueRequired(path)) => {
                    staging_state.mark_resolve_on_deploy(path);
                    continue;
                }
                Err(err) => return Err(err),
            };

            match instance_state.exports.get(&export.name) {
                None => new_exports.push(ExportChange {
                    name: export.name.clone(),
                    previous: None,
                    new: Some(resolved),
                }),
                Some(prev) if *prev != resolved => changed.push(ExportChange {
                    name: export.name.clone(),
                    previous: Some(prev.clone()),
                    new: Some(resolved),
                }),
                Some(_) => unchanged.push(export.name.clone()),
            }
        }

        let removed: Vec<String> = instance_state
            .exports
            .keys()
            .filter(|name| !expanded.exports.iter().any(|e| &e.name == *name))
            .cloned()
            .collect();

        staging_state.update_export_changes(new_exports, changed, removed, unchanged);
        Ok(())
    }

    fn stage_metadata(&'a self, expanded: &BlueprintSpec, instance_state: &InstanceState, staging_state: &StagingState) {
        let mut changes = MetadataChanges::default();
        let new_obj = expanded.metadata.as_object();
        let old_obj = instance_state.metadata.as_object();

        if let Some(new_obj) = new_obj {
            for (key, value) in new_obj {
                match old_obj.and_then(|o| o.get(key)) {
                    None => {
                        changes.new.insert(key.clone(), value.clone());
                    }
                    Some(old_value) if old_value != value => {
                        changes.modified.insert(key.clone(), value.clone());
                    }
                    Some(_) => changes.unchanged.push(key.clone()),
                }
            }
        }
        if let Some(old_obj) = old_obj {
            for key in old_obj.keys() {
                if new_obj.map_or(true, |n| !n.contains_key(key)) {
                    changes.removed.push(key.clone());
                }
            }
        }
        staging_state.update_metadata_changes(changes);
    }
}

/// BFS over direct `dependents` edges from every element in `removed`,
/// producing the full transitive set that must recreate (§4.4 step 4,
/// §8 property 6).
fn transitive_dependents<'a>(removed: impl Iterator<Item = &'a String>, refs: &dyn ReferenceGraph) -> HashSet<String> {
    let mut result = HashSet::new();
    let mut queue: VecDeque<String> = removed.cloned().collect();
    let mut seen: HashSet<String> = queue.iter().cloned().collect();

    while let Some(name) = queue.pop_front() {
        for dependent in refs.dependents(&name) {
            if seen.insert(dependent.clone()) {
                result.insert(dependent.clone());
                queue.push_back(dependent);
            }
        }
    }
    result
}
