//! The `SubstitutionResolver` external collaborator. See `spec.md` §6.
//!
//! Resolves `$.`-style substitution paths (resource fields, exports,
//! variables, data source outputs) into concrete JSON values during
//! preparation. Some paths only have a value once a resource has
//! actually deployed — those resolve to
//! `ContainerError::DeferredValueRequired` when asked for eagerly, and
//! are recorded on `BlueprintChanges::resolve_on_deploy` instead.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

#[async_trait]
pub trait SubstitutionResolver: Send + Sync {
    /// Resolve a substitution path to a concrete value now. `variables` is
    /// the effective variable scope for the blueprint instance the path is
    /// being resolved against — the caller's own variables for a root
    /// blueprint, or the layered inherited-plus-child-override scope for a
    /// child (§4.6 step 3). Returns `DeferredValueRequired` if the path
    /// names a field only known after deployment (e.g. a generated ARN).
    async fn resolve(&self, path: &str, variables: &HashMap<String, JsonValue>) -> Result<JsonValue>;

    /// True if `path` is known to only resolve after deployment, without
    /// attempting resolution (used to route fields to
    /// `resolve_on_deploy` up front rather than via a failed `resolve`).
    fn is_deferred(&self, path: &str, variables: &HashMap<String, JsonValue>) -> bool;
}
