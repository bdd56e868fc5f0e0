//! Type-1 Clone Detector (Exact Clones)
//!
//! Detects exact clones using string-based hashing.
//! Only whitespace, comments, and layout differ.
//!
//! # Algorithm
//!
//! 1. Normalize whitespace (collapse to single spaces)
//! 2. Strip comments
//! 3. Compute hash (FNV-1a for speed)
//! 4. Group by hash
//! 5. Filter by minimum thresholds
//!
//! # Performance
//!
//! - **Speed**: ~1M LOC/s
//! - **Complexity**: O(n) - linear in number of fragments
//! - **Memory**: O(n) - hash table
//!
//! # Example
//!
//! ```text
//! // Fragment 1
//! def foo(x):
//!     return x + 1
//!
//! // Fragment 2 (Type-1 clone)
//! def foo(x):
//!     return x+1  # Different spacing, same code
//! ```

use super::CloneDetector as CloneDetectorTrait;
use crate::features::clone_detection::domain::{
    CloneMetrics, ClonePair, CloneType, CodeFragment, DetectionInfo,
};
use std::collections::HashMap;

/// Type-1 clone detector using string hashing
pub struct Type1Detector {
    /// Minimum token threshold
    min_tokens: usize,

    /// Minimum LOC threshold
    min_loc: usize,

    /// Enable normalization (strip whitespace/comments)
    normalize: bool,
}

impl Default for Type1Detector {
    fn default() -> Self {
        Self::new()
    }
}

impl Type1Detector {
    /// Create new Type-1 detector with default thresholds
    pub fn new() -> Self {
        Self {
            min_tokens: 50, // Bellon et al. standard
            min_loc: 6,
            normalize: true,
        }
    }

    /// Create with custom thresholds
    pub fn with_thresholds(min_tokens: usize, min_loc: usize) -> Self {
        Self {
            min_tokens,
            min_loc,
            normalize: true,
        }
    }

    /// Disable normalization (exact string match only)
    pub fn without_normalization(mut self) -> Self {
        self.normalize = false;
        self
    }

    /// Normalize code for Type-1 detection
    ///
    /// - Collapse whitespace to single spaces
    /// - Remove comments (basic # and // detection)
    /// - Trim lines
    fn normalize_content(&self, content: &str) -> String {
        if !self.normalize {
            return content.to_string();
        }

        // Type-1: Whitespace and comments can differ
        // Step 1: Remove comments line by line
        let without_comments: String = content
            .lines()
            .map(|line| {
                // Remove comments (basic implementation)
                if let Some(pos) = line.find('#') {
                    &line[..pos]
                } else if let Some(pos) = line.find("//") {
                    &line[..pos]
                } else {
                    line
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        // Step 2: Collapse ALL whitespace (including line breaks) to single spaces
        // This makes layout-only differences equivalent
        without_comments
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Compute hash for normalized content
    fn compute_hash(&self, content: &str) -> u64 {
        const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
        const FNV_PRIME: u64 = 0x100000001b3;

        let normalized = self.normalize_content(content);
        let mut hash = FNV_OFFSET_BASIS;

        for byte in normalized.as_bytes() {
            hash ^= *byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }

        hash
    }

    /// Group fragments by hash
    fn group_by_hash(&self, fragments: &[CodeFragment]) -> HashMap<u64, Vec<usize>> {
        let mut groups: HashMap<u64, Vec<usize>> = HashMap::new();

        for (idx, fragment) in fragments.iter().enumerate() {
            // Skip fragments below threshold
            if !fragment.meets_threshold(self.min_tokens, self.min_loc) {
                continue;
            }

            let hash = self.compute_hash(&fragment.content);
            groups.entry(hash).or_default().push(idx);
        }

        groups
    }

    /// Create clone pairs from hash groups
    fn create_clone_pairs(
        &self,
        fragments: &[CodeFragment],
        groups: HashMap<u64, Vec<usize>>,
    ) -> Vec<ClonePair> {
        let mut pairs = Vec::new();

        for (_, indices) in groups {
            // Need at least 2 fragments for a clone pair
            if indices.len() < 2 {
                continue;
            }

            // Create all pairwise combinations
            for i in 0..indices.len() {
                for j in (i + 1)..indices.len() {
                    let source = &fragments[indices[i]];
                    let target = &fragments[indices[j]];

                    // Skip self-clones (same file, same location)
                    if source.file_path == target.file_path && source.span == target.span {
                        continue;
                    }

                    // BUGFIX: Verify actual content match to avoid hash collisions
                    // Hash collision can cause false positives for similar but different content
                    let source_normalized = self.normalize_content(&source.content);
                    let target_normalized = self.normalize_content(&target.content);

                    if source_normalized != target_normalized {
                        // Different content despite same hash - skip this pair
                        continue;
                    }

                    let metrics = CloneMetrics::new(
                        source.token_count.min(target.token_count),
                        source.loc.min(target.loc),
                        1.0, // Type-1 = exact match = 100% similarity
                    );

                    let detection_info = DetectionInfo::new("Type-1 (FNV-1a hashing)".to_string())
                        .with_confidence(1.0);

                    let pair =
                        ClonePair::new(CloneType::Type1, source.clone(), target.clone(), 1.0)
                            .with_metrics(metrics)
                            .with_detection_info(detection_info);

                    pairs.push(pair);
                }
            }
        }

        pairs
    }
}

impl CloneDetectorTrait for Type1Detector {
    fn name(&self) -> &'static str {
        "Type-1 (Exact Clone Detector)"
    }

    fn supported_type(&self) -> CloneType {
        CloneType::Type1
    }

    fn detect(&self, fragments: &[CodeFragment]) -> Vec<ClonePair> {
        if fragments.is_empty() {
            return Vec::new();
        }

        let start_time = std::time::Instant::now();

        // Group fragments by hash
        let groups = self.group_by_hash(fragments);

        // Create clone pairs
        let mut pairs = self.create_clone_pairs(fragments, groups);

        // Add detection time to all pairs
        let detection_time_ms = start_time.elapsed().as_millis() as u64;
        for pair in &mut pairs {
            pair.detection_info.detection_time_ms = Some(detection_time_ms);
        }

        pairs
    }

    fn detect_in_file(&self, fragments: &[CodeFragment], file_path: &str) -> Vec<ClonePair> {
        // Filter to fragments in this file
        let file_fragments: Vec<CodeFragment> = fragments
            .iter()
            .filter(|f| f.file_path == file_path)
            .cloned()
            .collect();

        self.detect(&file_fragments)
    }
}
