//! Clone Pair Deduplicator
//!
//! Pure business logic for removing duplicate clone pairs.
//! No external dependencies - belongs in domain layer.

use super::{ClonePair, CodeFragment};
use std::collections::HashSet;

/// Clone pair deduplicator
///
/// Removes duplicate clone pairs based on source/target identity.
/// Uses efficient HashSet for O(n) deduplication instead of O(n²) nested loops.
pub struct CloneDeduplicator;

impl CloneDeduplicator {
    /// Deduplicate clone pairs
    ///
    /// Two pairs are considered duplicates if they have:
    /// - Same source file_path and span
    /// - Same target file_path and span
    ///
    /// # Performance
    /// - Old approach: O(n²) with 3x `clone()` calls
    /// - New approach: O(n) with single HashSet
    ///
    /// # Example
    /// ```
    /// use codegraph_ir::features::clone_detection::domain::{ClonePair, CloneDeduplicator};
    ///
    /// let pairs = vec![/* ... */];
    /// let unique_pairs = CloneDeduplicator::deduplicate(pairs);
    /// ```
    pub fn deduplicate(pairs: Vec<ClonePair>) -> Vec<ClonePair> {
        let mut seen = HashSet::new();
        pairs
            .into_iter()
            .filter(|pair| {
                let key = Self::pair_key(pair);
                seen.insert(key)
            })
            .collect()
    }

    /// Deduplicate from iterator (zero-copy when possible)
    pub fn deduplicate_iter<I>(pairs: I) -> Vec<ClonePair>
    where
        I: IntoIterator<Item = ClonePair>,
    {
        let mut seen = HashSet::new();
        pairs
            .into_iter()
            .filter(|pair| {
                let key = Self::pair_key(pair);
                seen.insert(key)
            })
            .collect()
    }

    /// Generate unique key for a clone pair
    ///
    /// Key format: (source_file, source_span, target_file, target_span)
    fn pair_key(pair: &ClonePair) -> (String, (u32, u32, u32, u32), String, (u32, u32, u32, u32)) {
        (
            pair.source.file_path.clone(),
            (
                pair.source.span.start_line,
                pair.source.span.start_col,
                pair.source.span.end_line,
                pair.source.span.end_col,
            ),
            pair.target.file_path.clone(),
            (
                pair.target.span.start_line,
                pair.target.span.start_col,
                pair.target.span.end_line,
                pair.target.span.end_col,
            ),
        )
    }

    /// Merge multiple clone pair sets with deduplication
    ///
    /// Efficiently merges results from Type-1, Type-2, Type-3, Type-4 detectors
    /// without intermediate clones.
    ///
    /// # Example
    /// ```
    /// use codegraph_ir::features::clone_detection::domain::CloneDeduplicator;
    ///
    /// // Each detector produces its own set of clone pairs
    /// let type1_pairs = vec![];  // Exact clones
    /// let type2_pairs = vec![];  // Renamed clones
    /// let type3_pairs = vec![];  // Near-miss clones
    /// let type4_pairs = vec![];  // Semantic clones
    ///
    /// let sets = vec![type1_pairs, type2_pairs, type3_pairs, type4_pairs];
    /// let merged = CloneDeduplicator::merge_sets(sets);
    /// assert!(merged.is_empty());  // All empty inputs
    /// ```
    pub fn merge_sets(pair_sets: Vec<Vec<ClonePair>>) -> Vec<ClonePair> {
        let total_size: usize = pair_sets.iter().map(|s| s.len()).sum();
        let mut all_pairs = Vec::with_capacity(total_size);

        for pairs in pair_sets {
            all_pairs.extend(pairs);
        }

        Self::deduplicate(all_pairs)
    }
}
