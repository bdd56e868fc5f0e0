//! Blueprint spec data model (read-only input to the container).
//!
//! A blueprint is the declarative document a caller wants realised as a
//! named instance: a set of typed resources, the links between them,
//! included child blueprints, exports, metadata, variables and data
//! sources. None of this is mutated by the container — it is produced
//! upstream by the (out of scope) parser/schema validator.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// A single resource declaration within a blueprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// Unique name within the blueprint (unprefixed, e.g. "orders").
    pub name: String,
    /// Provider-registered resource type (e.g. "aws/dynamodb/table").
    pub resource_type: String,
    /// Raw, unresolved spec fields (substitution resolution happens later).
    pub spec: JsonValue,
    /// Optional condition gating whether this resource is included at all.
    pub condition: Option<JsonValue>,
}

/// An included child blueprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildSpec {
    /// Include name within the parent blueprint (e.g. "networking").
    pub name: String,
    /// Absolute path to the child blueprint document, if not inline.
    pub path: Option<String>,
    /// Inline blueprint source, if not loaded from a path.
    pub source: Option<String>,
    /// Format of `source` (e.g. "yaml", "jsonc") when inline.
    pub format: Option<String>,
    /// Variable bindings passed down to the child, layered over inherited
    /// context variables.
    pub variables: HashMap<String, JsonValue>,
}

/// A named export: a field path made visible to callers and to parents
/// that include this blueprint as a child.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSpec {
    pub name: String,
    /// Substitution path, e.g. `$.resources.orders.spec.arn`.
    pub field_path: String,
}

/// A variable declaration (value supplied by the caller or a parent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableSpec {
    pub name: String,
    pub default: Option<JsonValue>,
}

/// A data source declaration (resolved via the `ReferenceGraph`/resolver,
/// out of scope here beyond carrying its declaration).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourceSpec {
    pub name: String,
    pub source_type: String,
    pub spec: JsonValue,
}

/// The full, already-parsed-and-validated blueprint document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlueprintSpec {
    pub resources: Vec<ResourceSpec>,
    pub children: Vec<ChildSpec>,
    pub exports: Vec<ExportSpec>,
    pub variables: Vec<VariableSpec>,
    pub data_sources: Vec<DataSourceSpec>,
    /// Free-form blueprint-level metadata object.
    pub metadata: JsonValue,
}

impl BlueprintSpec {
    pub fn resource(&self, name: &str) -> Option<&ResourceSpec> {
        self.resources.iter().find(|r| r.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&ChildSpec> {
        self.children.iter().find(|c| c.name == name)
    }

    /// The variable scope a fresh instance of this blueprint starts from:
    /// every declared variable's default, before any caller-supplied or
    /// inherited override is layered on top (§4.6 step 3).
    pub fn default_variables(&self) -> HashMap<String, JsonValue> {
        self.variables
            .iter()
            .filter_map(|v| v.default.clone().map(|d| (v.name.clone(), d)))
            .collect()
    }
}
