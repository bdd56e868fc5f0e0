//! C7 — Container façade. See `spec.md` §2 ("coordinates the full
//! staging/deployment lifecycle for one blueprint instance") and the
//! public contracts scattered across §4.4/§4.5.
//!
//! This is the one type application code touches: it owns the external
//! collaborator references (provider, state store, resolver, loader) for
//! the lifetime of a run and dispatches to the change stager (C4) and
//! deployer (C6), returning the `EventSink`'s receiving half so callers
//! can observe progress. Mirrors the shape of the teacher's top-level
//! `PipelineOrchestrator` (`orchestrator.rs`): a thin façade holding
//! borrowed collaborators, no state of its own beyond configuration.

use crate::blueprint::BlueprintSpec;
use crate::cache::ChildExportCache;
use crate::change_stager::ChangeStager;
use crate::changes::BlueprintChanges;
use crate::child_orchestrator::BlueprintLoader;
use crate::config::ContainerConfig;
use crate::deployer::{Deployer, SkipRetryOverrides};
use crate::error::Result;
use crate::events::ContainerEvents;
use crate::events::EventSink;
use crate::node::ReferenceGraph;
use crate::provider::Provider;
use crate::state_store::{InstanceState, StateStore};
use crate::substitution::SubstitutionResolver;

/// Borrowed collaborators plus configuration, held for the duration of a
/// single `stage_changes`/`deploy`/`destroy_instance` call. None of these
/// are owned: the caller constructs the concrete provider/state
/// store/resolver/loader adapters (all out of scope per `spec.md` §1) and
/// hands references in per call.
pub struct Container<'a> {
    pub provider: &'a dyn Provider,
    pub state_store: &'a dyn StateStore,
    pub resolver: &'a dyn SubstitutionResolver,
    pub loader: &'a dyn BlueprintLoader,
    pub config: ContainerConfig,
    pub skip_retry: SkipRetryOverrides,
}

impl<'a> Container<'a> {
    pub fn new(
        provider: &'a dyn Provider,
        state_store: &'a dyn StateStore,
        resolver: &'a dyn SubstitutionResolver,
        loader: &'a dyn BlueprintLoader,
    ) -> Self {
        Self {
            provider,
            state_store,
            resolver,
            loader,
            config: ContainerConfig::default(),
            skip_retry: SkipRetryOverrides::default(),
        }
    }

    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_skip_retry(mut self, skip_retry: SkipRetryOverrides) -> Self {
        self.skip_retry = skip_retry;
        self
    }

    /// `StageChanges` — diff a blueprint instance against its recorded
    /// state without touching the underlying system. Returns the
    /// receiving half of the event channels plus a handle that resolves
    /// to the final `BlueprintChanges` once staging completes.
    pub fn stage_changes(
        &self,
        instance_id: &str,
        blueprint: &'a BlueprintSpec,
        refs: &'a dyn ReferenceGraph,
    ) -> (ContainerEvents, impl std::future::Future<Output = Result<BlueprintChanges>> + 'a) {
        let (sink, events) = EventSink::channel();
        let stager = self.stager_owned();
        let instance_id = instance_id.to_string();
        let blueprint = blueprint.clone();
        let fut = async move { stager.stage_changes(&instance_id, &blueprint, refs, false, sink).await };
        (events, fut)
    }

    /// `Destroy` — tear down every resource/link/child an instance owns.
    /// Idempotent against an already-absent instance (§8 property 9).
    pub fn destroy_changes(
        &self,
        instance_id: &str,
        blueprint: &'a BlueprintSpec,
        refs: &'a dyn ReferenceGraph,
    ) -> (ContainerEvents, impl std::future::Future<Output = Result<BlueprintChanges>> + 'a) {
        let (sink, events) = EventSink::channel();
        let stager = self.stager_owned();
        let instance_id = instance_id.to_string();
        let blueprint = blueprint.clone();
        let fut = async move { stager.stage_changes(&instance_id, &blueprint, refs, true, sink).await };
        (events, fut)
    }

    /// `Deploy` — realise a previously staged diff against the underlying
    /// system, returning the persisted `InstanceState`.
    #[allow(clippy::too_many_arguments)]
    pub fn deploy(
        &self,
        instance_id: &str,
        blueprint: &'a BlueprintSpec,
        refs: &'a dyn ReferenceGraph,
        changes: &'a BlueprintChanges,
        rollback: bool,
    ) -> (ContainerEvents, impl std::future::Future<Output = Result<InstanceState>> + 'a) {
        let (sink, events) = EventSink::channel();
        let deployer = self.deployer_owned();
        let instance_id = instance_id.to_string();
        let blueprint = blueprint.clone();
        let changes = changes.clone();
        let fut = async move {
            deployer
                .deploy(&instance_id, &blueprint, refs, &changes, false, rollback, sink)
                .await
        };
        (events, fut)
    }

    /// `Destroy`'s deployment-side counterpart: apply the teardown plan
    /// staged by `destroy_changes`, actually tearing down the underlying
    /// system's resources.
    pub fn destroy_instance(
        &self,
        instance_id: &str,
        blueprint: &'a BlueprintSpec,
        refs: &'a dyn ReferenceGraph,
    ) -> (ContainerEvents, impl std::future::Future<Output = Result<InstanceState>> + 'a) {
        let (sink, events) = EventSink::channel();
        let deployer = self.deployer_owned();
        let instance_id = instance_id.to_string();
        let blueprint = blueprint.clone();
        let fut = async move {
            deployer
                .deploy(&instance_id, &blueprint, refs, &BlueprintChanges::default(), true, false, sink)
                .await
        };
        (events, fut)
    }

    // `ChangeStager`/`Deployer` borrow `self.config`/`self.skip_retry` by
    // reference through their own fields, but `'a`-bounded futures above
    // need an owned copy that doesn't borrow `self` — cloning the
    // (cheap, `Copy`-ish) config/collaborator references is simpler than
    // threading a `Container` lifetime through every future.
    fn stager_owned(&self) -> ChangeStager<'a> {
        ChangeStager {
            provider: self.provider,
            state_store: self.state_store,
            resolver: self.resolver,
            loader: self.loader,
            config: self.config.clone(),
        }
    }

    fn deployer_owned(&self) -> Deployer<'a> {
        Deployer {
            provider: self.provider,
            state_store: self.state_store,
            resolver: self.resolver,
            loader: self.loader,
            config: self.config.clone(),
            skip_retry: self.skip_retry.clone(),
            export_cache: ChildExportCache::new(),
        }
    }
}
