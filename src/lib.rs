//! Blueprint execution engine — container subsystem.
//!
//! Dependency analysis and ordering (C1/C2), change staging (C3/C4),
//! deployment execution (C5/C6/C8) and the public façade (C7) for one
//! blueprint instance. Parsing, schema validation, the substitution
//! resolver's implementation, provider plugins, the state persistence
//! backend and the reference-graph collector are external collaborators
//! consumed through the traits in `provider`, `state_store`,
//! `substitution`, `child_orchestrator` and `node` — see `SPEC_FULL.md`
//! for the full module map and `DESIGN.md` for how each part is grounded.

pub mod blueprint;
pub mod cache;
pub mod change_stager;
pub mod changes;
pub mod child_orchestrator;
pub mod config;
pub mod container;
pub mod deployer;
pub mod error;
pub mod events;
pub mod grouping;
pub mod link;
pub mod node;
pub mod ordering;
pub mod preparer;
pub mod provider;
pub mod retry;
pub mod staging_state;
pub mod state_store;
pub mod substitution;

#[cfg(any(test, feature = "test-util"))]
pub mod testutil;

pub use blueprint::{BlueprintSpec, ChildSpec, DataSourceSpec, ExportSpec, ResourceSpec, VariableSpec};
pub use cache::{ChildExportCache, LinkTypeCache};
pub use change_stager::ChangeStager;
pub use changes::{BlueprintChanges, FieldChange, LinkChange, PendingLinkRecord, ResourceChangeSet};
pub use child_orchestrator::{BlueprintLoader, ChildOrchestrator};
pub use config::ContainerConfig;
pub use container::Container;
pub use deployer::{Deployer, SkipRetryOverrides};
pub use error::{ContainerError, FailureKind, Result};
pub use events::{ContainerEvents, ErrorEvent, EventSink};
pub use link::{Link, LinkId, LinkKind, PriorityResource};
pub use node::{ChainLinkNode, DeploymentNode, RefChainNode, ReferenceGraph};
pub use provider::{Provider, ResourceDiff};
pub use retry::RetryPolicy;
pub use staging_state::StagingState;
pub use state_store::{InstanceState, ResourceRecord, StateStore};
pub use substitution::SubstitutionResolver;
