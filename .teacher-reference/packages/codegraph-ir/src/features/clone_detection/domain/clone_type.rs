//! Clone Type Classification
//!
//! Defines the 4 types of code clones as per Bellon et al. (2007):
//! - **Type-1**: Exact clones (only whitespace/comments differ)
//! - **Type-2**: Renamed clones (identifiers/types/literals differ)
//! - **Type-3**: Gapped clones (statements added/removed/modified)
//! - **Type-4**: Semantic clones (different syntax, same behavior)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Clone type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloneType {
    /// Type-1: Exact clones
    ///
    /// Only whitespace, layout, and comments differ.
    /// Example:
    /// ```text
    /// // Clone 1
    /// def foo(x):
    ///     return x + 1
    ///
    /// // Clone 2
    /// def foo(x):
    ///     return x+1  # Different spacing
    /// ```
    Type1,

    /// Type-2: Renamed clones
    ///
    /// Identifiers, types, or literals differ but structure is identical.
    /// Example:
    /// ```text
    /// // Clone 1
    /// def add(a, b):
    ///     return a + b
    ///
    /// // Clone 2
    /// def sum(x, y):
    ///     return x + y
    /// ```
    Type2,

    /// Type-3: Gapped clones
    ///
    /// Statements added, removed, or modified but overall structure similar.
    /// Example:
    /// ```text
    /// // Clone 1
    /// def process(data):
    ///     validate(data)
    ///     result = transform(data)
    ///     return result
    ///
    /// // Clone 2
    /// def process(data):
    ///     validate(data)
    ///     log("Processing")  # Added statement
    ///     result = transform(data)
    ///     return result
    /// ```
    Type3,

    /// Type-4: Semantic clones
    ///
    /// Different syntax but same functionality.
    /// Example:
    /// ```text
    /// // Clone 1
    /// def factorial(n):
    ///     if n == 0:
    ///         return 1
    ///     return n * factorial(n - 1)
    ///
    /// // Clone 2
    /// def factorial(n):
    ///     result = 1
    ///     for i in range(1, n + 1):
    ///         result *= i
    ///     return result
    /// ```
    Type4,
}

impl CloneType {
    /// Get all clone types in order of increasing abstraction
    pub fn all() -> [CloneType; 4] {
        [
            CloneType::Type1,
            CloneType::Type2,
            CloneType::Type3,
            CloneType::Type4,
        ]
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            CloneType::Type1 => "Exact clone (whitespace/comments differ)",
            CloneType::Type2 => "Renamed clone (identifiers/types/literals differ)",
            CloneType::Type3 => "Gapped clone (statements added/removed/modified)",
            CloneType::Type4 => "Semantic clone (different syntax, same behavior)",
        }
    }

    /// Get detection algorithm name
    pub fn algorithm(&self) -> &'static str {
        match self {
            CloneType::Type1 => "String-based hashing (MD5/SHA256)",
            CloneType::Type2 => "AST-based normalization + hashing",
            CloneType::Type3 => "PDG-based + edit distance (threshold: 0.7)",
            CloneType::Type4 => "Graph isomorphism + behavioral analysis",
        }
    }

    /// Get detection complexity (Big-O notation)
    pub fn complexity(&self) -> &'static str {
        match self {
            CloneType::Type1 => "O(n) - Linear",
            CloneType::Type2 => "O(n log n) - AST traversal + hash table",
            CloneType::Type3 => "O(n²) - Pairwise edit distance",
            CloneType::Type4 => "O(n³) - Graph isomorphism (NP-complete)",
        }
    }

    /// Get typical detection speed (LOC/s)
    pub fn typical_speed(&self) -> usize {
        match self {
            CloneType::Type1 => 1_000_000, // 1M LOC/s
            CloneType::Type2 => 500_000,   // 500K LOC/s
            CloneType::Type3 => 50_000,    // 50K LOC/s
            CloneType::Type4 => 5_000,     // 5K LOC/s
        }
    }

    /// Check if this clone type is a subset of another
    ///
    /// Type-1 ⊂ Type-2 ⊂ Type-3 ⊂ Type-4
    pub fn is_subset_of(&self, other: CloneType) -> bool {
        let self_level = self.abstraction_level();
        let other_level = other.abstraction_level();
        self_level <= other_level
    }

    /// Get abstraction level (0 = most concrete, 3 = most abstract)
    pub fn abstraction_level(&self) -> u8 {
        match self {
            CloneType::Type1 => 0,
            CloneType::Type2 => 1,
            CloneType::Type3 => 2,
            CloneType::Type4 => 3,
        }
    }

    /// Check if detection requires AST
    pub fn requires_ast(&self) -> bool {
        matches!(self, CloneType::Type2 | CloneType::Type3 | CloneType::Type4)
    }

    /// Check if detection requires PDG
    pub fn requires_pdg(&self) -> bool {
        matches!(self, CloneType::Type3 | CloneType::Type4)
    }

    /// Check if detection requires data flow analysis
    pub fn requires_dataflow(&self) -> bool {
        matches!(self, CloneType::Type4)
    }

    /// Get minimum token threshold for clone (Bellon et al. recommend 50 tokens)
    pub fn min_token_threshold(&self) -> usize {
        match self {
            CloneType::Type1 | CloneType::Type2 => 50, // Standard threshold
            CloneType::Type3 => 30,                    // Allow smaller gapped clones
            CloneType::Type4 => 20,                    // Semantic similarity can be shorter
        }
    }

    /// Get minimum LOC threshold for clone
    pub fn min_loc_threshold(&self) -> usize {
        match self {
            CloneType::Type1 | CloneType::Type2 => 6, // ~6 lines minimum
            CloneType::Type3 => 4,                    // Gapped clones can be shorter
            CloneType::Type4 => 3,                    // Semantic clones focus on behavior
        }
    }

    /// Get similarity threshold for detection
    pub fn similarity_threshold(&self) -> f64 {
        match self {
            CloneType::Type1 => 1.0,  // Exact match
            CloneType::Type2 => 0.95, // Very high similarity after normalization
            CloneType::Type3 => 0.7,  // 70% similarity (Bellon et al. standard)
            CloneType::Type4 => 0.6,  // 60% behavioral similarity
        }
    }
}

impl fmt::Display for CloneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloneType::Type1 => write!(f, "Type-1"),
            CloneType::Type2 => write!(f, "Type-2"),
            CloneType::Type3 => write!(f, "Type-3"),
            CloneType::Type4 => write!(f, "Type-4"),
        }
    }
}

impl From<u8> for CloneType {
    fn from(value: u8) -> Self {
        match value {
            1 => CloneType::Type1,
            2 => CloneType::Type2,
            3 => CloneType::Type3,
            4 => CloneType::Type4,
            _ => panic!("Invalid clone type: {}. Must be 1-4", value),
        }
    }
}

impl From<CloneType> for u8 {
    fn from(clone_type: CloneType) -> u8 {
        clone_type.abstraction_level() + 1
    }
}
