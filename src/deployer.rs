//! C6 — Deployer. See `spec.md` §4.5.
//!
//! Public contract: `Deploy(instanceID, changes, rollback?) -> streaming
//! events`. Walks the same `parallelGroups` the preparer produced for
//! staging: one task per node within a group, strictly sequential between
//! groups, link operations serialised within a node. Retries transient
//! provider errors via `retry::with_retry` and polls for stabilisation via
//! `retry::poll_until_stable`, mirroring the teacher's
//! `PipelineOrchestrator::run_dag` concurrency shape (`orchestrator.rs`)
//! with the backoff generalised from `job.rs`.
//!
//! Unlike the change stager, the deployer does not drive its creation
//! decisions off the staged diff's shape — the diff only supplies
//! cascading `must_recreate` flags and the authoritative removed-resource/
//! removed-children/removed-links lists (§4.4 step 4/9). Everything else
//! is realised straight from the expanded blueprint against the recorded
//! instance state, the same way the providers themselves are expected to
//! apply an in-place update: idempotently, from desired spec plus
//! previous state.

use crate::blueprint::{BlueprintSpec, ChildSpec};
use crate::cache::ChildExportCache;
use crate::changes::BlueprintChanges;
use crate::child_orchestrator::{check_tree_guards, layer_variables, BlueprintLoader, ChildOrchestrator};
use crate::config::ContainerConfig;
use crate::error::{ContainerError, Result};
use crate::events::EventSink;
use crate::changes::{ChildChangesMessage, FieldChange, LinkChangesMessage, ResourceChangeSet, ResourceChangesMessage};
use crate::node::{DeploymentNode, ReferenceGraph};
use crate::preparer::Preparer;
use crate::provider::Provider;
use crate::state_store::{InstanceState, ResourceRecord, StateStore};
use crate::substitution::SubstitutionResolver;
use futures::future::{join_all, BoxFuture};
use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Names whose retryable provider errors should be surfaced immediately
/// instead of entering the backoff loop. `spec.md` §4.5
/// `SkipRetryFailuresForInstances` / `SkipRetryFailuresForLinkNames`.
#[derive(Debug, Clone, Default)]
pub struct SkipRetryOverrides {
    pub instances: Vec<String>,
    pub link_names: Vec<String>,
}

impl SkipRetryOverrides {
    fn skip_resource(&self, name: &str) -> bool {
        self.instances.iter().any(|n| n == name)
    }

    fn skip_link(&self, logical_name: &str) -> bool {
        self.link_names.iter().any(|n| n == logical_name)
    }
}

/// How long the deployer waits, per unit, for `Provider::is_stable` to
/// report true before surfacing `StabilisationDeadlineExceeded`.
const STABILISATION_DEADLINE: Duration = Duration::from_secs(300);

/// Mutable deployment scratchpad, guarded the same way `StagingState`
/// guards C3's scratchpad (`staging_state.rs`) — one lock, short critical
/// sections, concurrent group workers write through it rather than each
/// owning a private copy that would need merging afterwards.
struct DeployState {
    inner: Mutex<InstanceState>,
}

impl DeployState {
    fn new(initial: InstanceState) -> Self {
        Self { inner: Mutex::new(initial) }
    }

    fn set_resource(&self, name: &str, record: ResourceRecord) {
        self.inner.lock().resource_states.insert(name.to_string(), record);
    }

    fn remove_resource(&self, name: &str) {
        self.inner.lock().resource_states.remove(name);
    }

    fn set_link(&self, logical_name: &str, state: serde_json::Value) {
        self.inner.lock().link_states.insert(logical_name.to_string(), state);
    }

    fn remove_link(&self, logical_name: &str) {
        self.inner.lock().link_states.remove(logical_name);
    }

    fn set_child(&self, name: &str, instance_id: &str) {
        self.inner.lock().child_instance_ids.insert(name.to_string(), instance_id.to_string());
    }

    fn remove_child(&self, name: &str) {
        self.inner.lock().child_instance_ids.remove(name);
    }

    fn set_export(&self, name: &str, value: serde_json::Value) {
        self.inner.lock().exports.insert(name.to_string(), value);
    }

    fn remove_export(&self, name: &str) {
        self.inner.lock().exports.remove(name);
    }

    fn set_metadata(&self, metadata: serde_json::Value) {
        self.inner.lock().metadata = metadata;
    }

    fn snapshot(&self) -> InstanceState {
        self.inner.lock().clone()
    }

    fn resource_record(&self, name: &str) -> Option<ResourceRecord> {
        self.inner.lock().resource_states.get(name).cloned()
    }
}

pub struct Deployer<'a> {
    pub provider: &'a dyn Provider,
    pub state_store: &'a dyn StateStore,
    pub resolver: &'a dyn SubstitutionResolver,
    pub loader: &'a dyn BlueprintLoader,
    pub config: ContainerConfig,
    pub skip_retry: SkipRetryOverrides,
    /// Resolved child export values, refreshed after every child deploy so
    /// a caller's `SubstitutionResolver` adapter can serve
    /// `children.<name>.exports.<field>` lookups without re-deploying the
    /// child (§4.6 step 5). See `cache::ChildExportCache`.
    pub export_cache: ChildExportCache,
}

/// Owns the blueprint by `Arc` for the same reason `StageContext` does
/// (`change_stager.rs`): child recursion loads its own document at
/// runtime with no lifetime tie to the parent's borrowed input.
struct DeployContext<'a> {
    instance_id: String,
    blueprint: Arc<BlueprintSpec>,
    refs: &'a dyn ReferenceGraph,
    changes: Arc<BlueprintChanges>,
    destroy: bool,
    rollback: bool,
    tree_path: Vec<String>,
    events: EventSink,
    /// Effective variable scope for this blueprint instance — the root
    /// call's own declared defaults, or a child's inherited-plus-override
    /// scope layered by `layer_variables` (§4.6 step 3).
    variables: HashMap<String, JsonValue>,
}

impl<'a> Deployer<'a> {
    /// Entry point. Sends the terminal `complete`/`error` event itself;
    /// recursive child calls never do — their resource/link events relay
    /// live on the same channels and their outcome is coalesced into a
    /// single `ChildChangesMessage` on the parent's child channel, the
    /// same split the change stager uses (§9 Open Question (a)).
    #[allow(clippy::too_many_arguments)]
    pub async fn deploy(
        &self,
        instance_id: &str,
        blueprint: &BlueprintSpec,
        refs: &'a dyn ReferenceGraph,
        changes: &BlueprintChanges,
        destroy: bool,
        rollback: bool,
        events: EventSink,
    ) -> Result<InstanceState> {
        let ctx = DeployContext {
            instance_id: instance_id.to_string(),
            blueprint: Arc::new(blueprint.clone()),
            refs,
            changes: Arc::new(changes.clone()),
            destroy,
            rollback,
            tree_path: Vec::new(),
            events: events.clone(),
            variables: blueprint.default_variables(),
        };
        match self.deploy_inner(ctx).await {
            Ok(state) => {
                events.send_complete(changes.clone()).await;
                self.state_store.save_instance_state(&state).await?;
                Ok(state)
            }
            Err(err) => {
                events.send_error(Some(instance_id.to_string()), &err).await;
                Err(err)
            }
        }
    }

    fn deploy_inner(&'a self, ctx: DeployContext<'a>) -> BoxFuture<'a, Result<InstanceState>> {
        Box::pin(async move {
            check_tree_guards(&ctx.instance_id, &ctx.tree_path, self.config.max_blueprint_depth)?;

            if ctx.destroy {
                return self.deploy_destroy(&ctx).await;
            }

            let instance_state = match self.state_store.get_instance_state(&ctx.instance_id).await {
                Ok(state) => state,
                Err(err) if err.is_not_found() => InstanceState::new(ctx.instance_id.clone()),
                Err(err) => return Err(err),
            };

            let preparer = Preparer::new(self.provider, self.resolver);
            let prepared = preparer.prepare(ctx.blueprint.as_ref(), ctx.refs, &ctx.variables).await?;
            let deploy_state = DeployState::new(instance_state.clone());

            for name in &ctx.changes.removed_resources {
                self.destroy_named_resource(&ctx, name, &instance_state, &deploy_state).await?;
            }
            for name in &ctx.changes.removed_children {
                if let Some(child_instance_id) = instance_state.child_instance_ids.get(name) {
                    self.destroy_child(&ctx, name, child_instance_id).await?;
                    deploy_state.remove_child(name);
                }
            }
            for logical_name in &ctx.changes.removed_links {
                if let Some(state) = instance_state.link_states.get(logical_name) {
                    self.provider.destroy_link(logical_name, state).await?;
                    deploy_state.remove_link(logical_name);
                }
            }

            let node_index: HashMap<&str, &DeploymentNode> =
                prepared.ordered.iter().map(|n| (n.bare_name(), n)).collect();

            for group in &prepared.groups {
                self.deploy_group(&ctx, group, &prepared.expanded, &instance_state, &deploy_state, &node_index)
                    .await?;
            }

            self.deploy_exports(&ctx, &prepared.expanded, &deploy_state).await?;
            self.deploy_metadata(&prepared.expanded, &deploy_state);

            for name in &ctx.changes.removed_exports {
                deploy_state.remove_export(name);
            }

            Ok(deploy_state.snapshot())
        })
    }

    /// Teardown path: reverse of the forward deployment order, links
    /// destroyed before either endpoint (§4.5 "destroy path follows
    /// reverse topological order with links destroyed before endpoints").
    async fn deploy_destroy(&'a self, ctx: &DeployContext<'a>) -> Result<InstanceState> {
        let instance_state = match self.state_store.get_instance_state(&ctx.instance_id).await {
            Ok(state) => state,
            Err(err) if err.is_not_found() => {
                // Destroying an already-absent instance is a no-op (§8
                // property 9, destroy idempotence).
                return Ok(InstanceState::new(ctx.instance_id.clone()));
            }
            Err(err) => return Err(err),
        };

        let preparer = Preparer::new(self.provider, self.resolver);
        let prepared = preparer.prepare(ctx.blueprint.as_ref(), ctx.refs, &ctx.variables).await?;
        let deploy_state = DeployState::new(instance_state.clone());

        for logical_name in instance_state.link_states.keys() {
            let state = &instance_state.link_states[logical_name];
            self.provider.destroy_link(logical_name, state).await?;
            ctx.events
                .send_link_change(LinkChangesMessage {
                    resource_a: String::new(),
                    resource_b: String::new(),
                    logical_name: logical_name.clone(),
                    removed: true,
                    field_changes: Vec::new(),
                })
                .await;
            deploy_state.remove_link(logical_name);
        }

        for node in prepared.ordered.iter().rev() {
            match node {
                DeploymentNode::Resource(chain) => {
                    if let Some(record) = instance_state.resource_states.get(&chain.resource_name) {
                        self.destroy_named_resource(ctx, &chain.resource_name, &instance_state, &deploy_state).await?;
                        let _ = record;
                    }
                }
                DeploymentNode::Child(refnode) => {
                    if let Some(child_instance_id) = instance_state.child_instance_ids.get(&refnode.name) {
                        self.destroy_child(ctx, &refnode.name, child_instance_id).await?;
                        deploy_state.remove_child(&refnode.name);
                    }
                }
            }
        }

        // Any resource no longer named by the blueprint (already removed
        // upstream by staging) has no ordering information left; destroy
        // it last, in recorded order.
        let ordered_names: std::collections::HashSet<&str> =
            prepared.ordered.iter().map(|n| n.bare_name()).collect();
        for name in instance_state.resource_states.keys() {
            if !ordered_names.contains(name.as_str()) {
                self.destroy_named_resource(ctx, name, &instance_state, &deploy_state).await?;
            }
        }

        Ok(deploy_state.snapshot())
    }

    async fn destroy_named_resource(
        &'a self,
        ctx: &DeployContext<'a>,
        name: &str,
        instance_state: &InstanceState,
        deploy_state: &DeployState,
    ) -> Result<()> {
        let Some(record) = instance_state.resource_states.get(name) else {
            return Ok(());
        };
        let skip_retry = self.skip_retry.skip_resource(name);
        crate::retry::with_retry(&self.config.retry_policy, name, skip_retry, || {
            self.provider.destroy_resource(&record.resource_type, name, &record.state)
        })
        .await?;

        deploy_state.remove_resource(name);
        ctx.events
            .send_resource_change(ResourceChangesMessage {
                resource_name: name.to_string(),
                new: false,
                removed: true,
                changes: ResourceChangeSet::default(),
            })
            .await;
        Ok(())
    }

    async fn destroy_child(&'a self, ctx: &DeployContext<'a>, name: &str, child_instance_id: &str) -> Result<()> {
        let child_ctx = DeployContext {
            instance_id: child_instance_id.to_string(),
            blueprint: ctx.blueprint.clone(),
            refs: ctx.refs,
            changes: Arc::new(BlueprintChanges::default()),
            destroy: true,
            rollback: ctx.rollback,
            tree_path: {
                let mut p = ctx.tree_path.clone();
                p.push(ctx.instance_id.clone());
                p
            },
            events: ctx.events.clone(),
            variables: ctx.variables.clone(),
        };
        self.deploy_inner(child_ctx).await?;
        ctx.events
            .send_child_change(ChildChangesMessage {
                child_name: name.to_string(),
                new: false,
                removed: true,
                must_recreate: false,
                changes: BlueprintChanges::default(),
            })
            .await;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn deploy_group(
        &'a self,
        ctx: &DeployContext<'a>,
        group: &[DeploymentNode],
        expanded: &BlueprintSpec,
        instance_state: &InstanceState,
        deploy_state: &DeployState,
        node_index: &HashMap<&str, &DeploymentNode>,
    ) -> Result<()> {
        let tasks = group
            .iter()
            .map(|node| self.deploy_node(ctx, node, expanded, instance_state, deploy_state));
        for result in join_all(tasks).await {
            result?;
        }

        // Links are serialised within a node (§4.5), but a link's two
        // endpoints may land in different groups — C2 guarantees a link's
        // endpoints never share a group, so by the time the later group
        // finishes, the earlier (priority) endpoint is already deployed.
        // Stage every link touching this group's freshly-deployed nodes.
        for node in group {
            let Some(chain) = node.as_resource() else { continue };
            for peer in chain.links_to.iter().chain(chain.linked_from.iter()) {
                if node_index.get(peer.as_str()).is_none() {
                    continue;
                }
                self.deploy_link(ctx, &chain.resource_name, peer, deploy_state, node_index).await?;
            }
        }
        Ok(())
    }

    async fn deploy_node(
        &'a self,
        ctx: &DeployContext<'a>,
        node: &DeploymentNode,
        expanded: &BlueprintSpec,
        instance_state: &InstanceState,
        deploy_state: &DeployState,
    ) -> Result<()> {
        match node {
            DeploymentNode::Resource(chain) => {
                self.deploy_resource_node(ctx, chain, expanded, instance_state, deploy_state).await
            }
            DeploymentNode::Child(refnode) => self.deploy_child_node(ctx, refnode, expanded, instance_state, deploy_state).await,
        }
    }

    async fn deploy_resource_node(
        &'a self,
        ctx: &DeployContext<'a>,
        chain: &crate::node::ChainLinkNode,
        expanded: &BlueprintSpec,
        instance_state: &InstanceState,
        deploy_state: &DeployState,
    ) -> Result<()> {
        let name = &chain.resource_name;
        let resource = expanded
            .resource(name)
            .ok_or_else(|| ContainerError::not_found(format!("resource '{}'", name)))?;

        let previous = instance_state.resource_states.get(name);
        let must_recreate = ctx
            .changes
            .new_resources
            .get(name)
            .or_else(|| ctx.changes.resource_changes.get(name))
            .map(|cs| cs.must_recreate)
            .unwrap_or(false);

        let skip_retry = self.skip_retry.skip_resource(name);
        let policy = &self.config.retry_policy;

        if must_recreate {
            if let Some(record) = previous {
                crate::retry::with_retry(policy, name, skip_retry, || {
                    self.provider.destroy_resource(&record.resource_type, name, &record.state)
                })
                .await?;
            }
        }

        let new_state = crate::retry::with_retry(policy, name, skip_retry, || {
            self.provider.deploy_resource(&resource.resource_type, name, &resource.spec)
        })
        .await?;

        crate::retry::poll_until_stable(policy, name, STABILISATION_DEADLINE, || {
            self.provider.is_stable(&resource.resource_type, &new_state)
        })
        .await?;

        deploy_state.set_resource(
            name,
            ResourceRecord {
                resource_type: resource.resource_type.clone(),
                state: new_state,
            },
        );

        ctx.events
            .send_resource_change(ResourceChangesMessage {
                resource_name: name.clone(),
                new: previous.is_none(),
                removed: false,
                changes: ResourceChangeSet {
                    must_recreate,
                    ..Default::default()
                },
            })
            .await;
        Ok(())
    }

    async fn deploy_child_node(
        &'a self,
        ctx: &DeployContext<'a>,
        refnode: &crate::node::RefChainNode,
        expanded: &BlueprintSpec,
        instance_state: &InstanceState,
        deploy_state: &DeployState,
    ) -> Result<()> {
        let name = &refnode.name;
        let child_spec = expanded
            .child(name)
            .ok_or_else(|| ContainerError::not_found(format!("child '{}'", name)))?;

        let orchestrator = ChildOrchestrator::new(self.loader, self.config.max_blueprint_depth);
        let (child_instance_id, child_blueprint) = orchestrator
            .prepare_child(&ctx.instance_id, &ctx.tree_path, child_spec)
            .await?;

        let must_recreate = ctx.changes.recreate_children.iter().any(|c| c == name);
        if must_recreate {
            if let Some(existing_id) = instance_state.child_instance_ids.get(name) {
                self.destroy_child(ctx, name, existing_id).await?;
            }
        }

        let child_changes = ctx
            .changes
            .new_children
            .get(name)
            .or_else(|| ctx.changes.child_changes.get(name))
            .cloned()
            .unwrap_or_default();

        let mut child_tree_path = ctx.tree_path.clone();
        child_tree_path.push(ctx.instance_id.clone());

        // The child's own declared defaults, with the parent's inherited
        // variables and the include's explicit overrides layered on top
        // (§4.6 step 3); explicit bindings always win over a default.
        let mut child_variables = child_blueprint.default_variables();
        child_variables.extend(layer_variables(&ctx.variables, child_spec));

        let child_ctx = DeployContext {
            instance_id: child_instance_id.clone(),
            blueprint: Arc::new(child_blueprint),
            refs: ctx.refs,
            changes: Arc::new(child_changes),
            destroy: false,
            rollback: ctx.rollback,
            tree_path: child_tree_path,
            events: ctx.events.clone(),
            variables: child_variables,
        };
        let child_state = self.deploy_inner(child_ctx).await?;
        self.export_cache.insert_all(&child_instance_id, &child_state.exports);

        deploy_state.set_child(name, &child_instance_id);
        ctx.events
            .send_child_change(ChildChangesMessage {
                child_name: name.clone(),
                new: !instance_state.child_instance_ids.contains_key(name),
                removed: false,
                must_recreate,
                changes: BlueprintChanges::default(),
            })
            .await;
        Ok(())
    }

    /// Apply a link's effect in priority order: the A endpoint, the B
    /// endpoint, then any intermediary resources it manages (§4.5/§6's
    /// three plugin methods). Serial by construction — called once per
    /// link from the group loop, never concurrently for the same link.
    async fn deploy_link(
        &'a self,
        ctx: &DeployContext<'a>,
        resource_a: &str,
        resource_b: &str,
        deploy_state: &DeployState,
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

        // Both endpoints must already be deployed for this link to apply;
        // C2 guarantees they never share a group, so if one hasn't landed
        // yet it belongs to a later group and this call is a no-op for now.
        if deploy_state.resource_record(resource_a).is_none() || deploy_state.resource_record(resource_b).is_none() {
            return Ok(());
        }

        let logical_name = link.logical_name();
        let skip_retry = self.skip_retry.skip_link(&logical_name);
        let policy = &self.config.retry_policy;

        let prior_state = deploy_state
            .inner
            .lock()
            .link_states
            .get(&logical_name)
            .cloned()
            .unwrap_or(serde_json::Value::Null);

        let a_state = crate::retry::with_retry(policy, &logical_name, skip_retry, || {
            self.provider.update_resource_a(&link.link_type, &prior_state)
        })
        .await?;
        let b_state = crate::retry::with_retry(policy, &logical_name, skip_retry, || {
            self.provider.update_resource_b(&link.link_type, &a_state)
        })
        .await?;
        let final_state = crate::retry::with_retry(policy, &logical_name, skip_retry, || {
            self.provider.update_intermediary_resources(&link.link_type, &b_state)
        })
        .await?;

        deploy_state.set_link(&logical_name, final_state.clone());
        ctx.events
            .send_link_change(LinkChangesMessage {
                resource_a: link.id.resource_a.clone(),
                resource_b: link.id.resource_b.clone(),
                logical_name,
                removed: false,
                field_changes: vec![FieldChange {
                    field_path: "state".to_string(),
                    previous: None,
                    new: Some(final_state),
                }],
            })
            .await;
        Ok(())
    }

    async fn deploy_exports(&'a self, ctx: &DeployContext<'a>, expanded: &BlueprintSpec, deploy_state: &DeployState) -> Result<()> {
        for path in &ctx.changes.resolve_on_deploy {
            let value = self.resolver.resolve(path, &ctx.variables).await?;
            if let Some(export) = expanded.exports.iter().find(|e| &e.field_path == path) {
                deploy_state.set_export(&export.name, value);
            }
        }
        for export in &expanded.exports {
            if ctx.changes.resolve_on_deploy.iter().any(|p| p == &export.field_path) {
                continue;
            }
            if !self.resolver.is_deferred(&export.field_path, &ctx.variables) {
                let value = self.resolver.resolve(&export.field_path, &ctx.variables).await?;
                deploy_state.set_export(&export.name, value);
            }
        }
        Ok(())
    }

    fn deploy_metadata(&'a self, expanded: &BlueprintSpec, deploy_state: &DeployState) {
        deploy_state.set_metadata(expanded.metadata.clone());
    }
}
