//! C8 — Child orchestrator. See `spec.md` §4.6.
//!
//! Owns recursion into included blueprints: resolving the include,
//! loading the child document, cycle/depth guarding, and layering
//! variables. The actual recursive `StageChanges`/`Deploy` call is driven
//! by the change stager / deployer, which hold the `ChangeStager`/
//! `Deployer` instances this module can't own without a cycle (C4/C6
//! depend on C8 for child resolution, and recurse back into themselves).

use crate::blueprint::ChildSpec;
use crate::error::{ContainerError, Result};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Loads a child blueprint's document and resolves its instance id.
/// Blueprint parsing itself is out of scope (§1) — this is the seam.
#[async_trait]
pub trait BlueprintLoader: Send + Sync {
    async fn load(&self, child: &ChildSpec) -> Result<crate::blueprint::BlueprintSpec>;

    /// Resolve the child's instance id from the parent's instance id and
    /// the include's own identity. Deterministic so that the same include
    /// always maps to the same instance across runs.
    async fn resolve_instance_id(&self, parent_instance_id: &str, child: &ChildSpec) -> Result<String>;
}

/// Cycle and depth guard shared by the root `StageChanges`/`Deploy` entry
/// point and every child recursion (§8 properties 7/8).
pub fn check_tree_guards(instance_id: &str, tree_path: &[String], max_depth: usize) -> Result<()> {
    if tree_path.iter().any(|ancestor| ancestor == instance_id) {
        return Err(ContainerError::BlueprintCycleDetected {
            instance_id: instance_id.to_string(),
            tree_path: tree_path.to_vec(),
        });
    }
    if tree_path.len() > max_depth {
        return Err(ContainerError::MaxBlueprintDepthExceeded {
            depth: tree_path.len(),
            max: max_depth,
        });
    }
    Ok(())
}

/// Layer a child's declared variable bindings over the parent's inherited
/// context variables — the child's own bindings win on conflict.
pub fn layer_variables(
    inherited: &HashMap<String, JsonValue>,
    child: &ChildSpec,
) -> HashMap<String, JsonValue> {
    let mut layered = inherited.clone();
    layered.extend(child.variables.clone());
    layered
}

pub struct ChildOrchestrator<'a> {
    loader: &'a dyn BlueprintLoader,
    max_depth: usize,
}

impl<'a> ChildOrchestrator<'a> {
    pub fn new(loader: &'a dyn BlueprintLoader, max_depth: usize) -> Self {
        Self { loader, max_depth }
    }

    /// Resolve, cycle/depth-guard, and load one include (§4.6 steps 1-4).
    /// Returns the child's instance id and its parsed blueprint.
    pub async fn prepare_child(
        &self,
        parent_instance_id: &str,
        tree_path: &[String],
        child: &ChildSpec,
    ) -> Result<(String, crate::blueprint::BlueprintSpec)> {
        if child.path.is_none() && child.source.is_none() {
            return Err(ContainerError::MissingIncludePath(child.name.clone()));
        }

        let instance_id = self.loader.resolve_instance_id(parent_instance_id, child).await?;

        let mut child_tree_path = tree_path.to_vec();
        child_tree_path.push(parent_instance_id.to_string());
        check_tree_guards(&instance_id, &child_tree_path, self.max_depth)?;

        let blueprint = self.loader.load(child).await?;
        Ok((instance_id, blueprint))
    }
}
