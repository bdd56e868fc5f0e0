//! Clone Pair Representation
//!
//! Represents a pair of code fragments that are clones of each other.
//! Includes similarity metrics and detection metadata.

use super::clone_type::CloneType;
use super::code_fragment::CodeFragment;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A pair of code fragments that are clones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClonePair {
    /// Clone type classification
    pub clone_type: CloneType,

    /// Source code fragment
    pub source: CodeFragment,

    /// Target code fragment (clone of source)
    pub target: CodeFragment,

    /// Similarity score [0.0, 1.0]
    pub similarity: f64,

    /// Additional metrics
    pub metrics: CloneMetrics,

    /// Detection metadata
    pub detection_info: DetectionInfo,
}

/// Similarity and quality metrics for a clone pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneMetrics {
    /// Token-level similarity (Jaccard coefficient)
    pub token_similarity: f64,

    /// Line-level similarity
    pub line_similarity: f64,

    /// AST-level similarity (for Type-2+)
    pub ast_similarity: Option<f64>,

    /// Semantic similarity (for Type-4)
    pub semantic_similarity: Option<f64>,

    /// Edit distance (Levenshtein)
    pub edit_distance: Option<usize>,

    /// Normalized edit distance [0.0, 1.0]
    pub normalized_edit_distance: Option<f64>,

    /// Clone length (in tokens)
    pub clone_length_tokens: usize,

    /// Clone length (in LOC)
    pub clone_length_loc: usize,

    /// Gapped regions (for Type-3)
    pub gap_count: Option<usize>,

    /// Total gap size (lines)
    pub gap_size: Option<usize>,
}

/// Detection metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionInfo {
    /// Detection algorithm used
    pub algorithm: String,

    /// Detection time (milliseconds)
    pub detection_time_ms: Option<u64>,

    /// Detector version
    pub detector_version: String,

    /// Confidence score [0.0, 1.0]
    pub confidence: Option<f64>,

    /// Whether this is a true positive (for evaluation)
    pub is_true_positive: Option<bool>,

    /// Additional notes
    pub notes: Vec<String>,
}

impl ClonePair {
    /// Create a new clone pair
    pub fn new(
        clone_type: CloneType,
        source: CodeFragment,
        target: CodeFragment,
        similarity: f64,
    ) -> Self {
        let clone_length_tokens = source.token_count.min(target.token_count);
        let clone_length_loc = source.loc.min(target.loc);

        Self {
            clone_type,
            source,
            target,
            similarity,
            metrics: CloneMetrics {
                token_similarity: similarity,
                line_similarity: similarity,
                ast_similarity: None,
                semantic_similarity: None,
                edit_distance: None,
                normalized_edit_distance: None,
                clone_length_tokens,
                clone_length_loc,
                gap_count: None,
                gap_size: None,
            },
            detection_info: DetectionInfo {
                algorithm: clone_type.algorithm().to_string(),
                detection_time_ms: None,
                detector_version: "1.0.0".to_string(),
                confidence: None,
                is_true_positive: None,
                notes: Vec::new(),
            },
        }
    }

    /// Create with detailed metrics
    pub fn with_metrics(mut self, metrics: CloneMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Create with detection info
    pub fn with_detection_info(mut self, detection_info: DetectionInfo) -> Self {
        self.detection_info = detection_info;
        self
    }

    /// Add a note to detection info
    pub fn add_note(mut self, note: String) -> Self {
        self.detection_info.notes.push(note);
        self
    }

    /// Set confidence score
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.detection_info.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }

    /// Check if clone pair is valid (meets thresholds)
    pub fn is_valid(&self) -> bool {
        let min_tokens = self.clone_type.min_token_threshold();
        let min_loc = self.clone_type.min_loc_threshold();
        let min_similarity = self.clone_type.similarity_threshold();

        self.source.meets_threshold(min_tokens, min_loc)
            && self.target.meets_threshold(min_tokens, min_loc)
            && self.similarity >= min_similarity
    }

    /// Check if source and target are in the same file
    pub fn is_same_file(&self) -> bool {
        self.source.file_path == self.target.file_path
    }

    /// Check if source and target overlap (for filtering)
    pub fn has_overlap(&self) -> bool {
        self.source.overlaps(&self.target)
    }

    /// Get overlap ratio (if any)
    pub fn overlap_ratio(&self) -> f64 {
        self.source.overlap_ratio(&self.target)
    }

    /// Get distance between fragments (in lines)
    pub fn distance_lines(&self) -> Option<usize> {
        if !self.is_same_file() {
            return None;
        }

        let (s1, e1) = self.source.line_range();
        let (s2, e2) = self.target.line_range();

        if e1 < s2 {
            Some(s2 - e1)
        } else if e2 < s1 {
            Some(s1 - e2)
        } else {
            Some(0) // Overlapping
        }
    }

    /// Check if this is a self-clone (same fragment)
    pub fn is_self_clone(&self) -> bool {
        self.is_same_file()
            && self.source.span == self.target.span
            && self.source.content == self.target.content
    }

    /// Get a unique identifier for this clone pair
    pub fn id(&self) -> String {
        format!(
            "{}:{}:{}-{}:{}:{}",
            self.source.file_path,
            self.source.span.start_line,
            self.source.span.end_line,
            self.target.file_path,
            self.target.span.start_line,
            self.target.span.end_line
        )
    }

    /// Get a normalized ID (smaller fragment first, for deduplication)
    pub fn normalized_id(&self) -> String {
        let source_key = (
            &self.source.file_path,
            self.source.span.start_line,
            self.source.span.end_line,
        );
        let target_key = (
            &self.target.file_path,
            self.target.span.start_line,
            self.target.span.end_line,
        );

        if source_key <= target_key {
            self.id()
        } else {
            format!(
                "{}:{}:{}-{}:{}:{}",
                self.target.file_path,
                self.target.span.start_line,
                self.target.span.end_line,
                self.source.file_path,
                self.source.span.start_line,
                self.source.span.end_line
            )
        }
    }

    /// Get quality score [0.0, 1.0]
    ///
    /// Quality = similarity * length_factor * confidence_factor
    pub fn quality_score(&self) -> f64 {
        let length_factor = self.length_factor();
        let confidence_factor = self.detection_info.confidence.unwrap_or(1.0);

        self.similarity * length_factor * confidence_factor
    }

    /// Calculate length factor [0.0, 1.0]
    ///
    /// Longer clones are generally more significant
    fn length_factor(&self) -> f64 {
        const MIN_TOKENS: f64 = 50.0;
        const MAX_TOKENS: f64 = 500.0;

        let tokens = self.metrics.clone_length_tokens as f64;
        ((tokens - MIN_TOKENS) / (MAX_TOKENS - MIN_TOKENS)).clamp(0.0, 1.0)
    }

    /// Check if this clone is a subset of another (contained within)
    pub fn is_subset_of(&self, other: &ClonePair) -> bool {
        (self.source.is_contained_in(&other.source) && self.target.is_contained_in(&other.target))
            || (self.source.is_contained_in(&other.target)
                && self.target.is_contained_in(&other.source))
    }

    /// Compute similarity with another clone pair (for clustering)
    pub fn similarity_with(&self, other: &ClonePair) -> f64 {
        // Jaccard similarity of fragments
        let source_overlap = self
            .source
            .overlap_ratio(&other.source)
            .max(self.source.overlap_ratio(&other.target));
        let target_overlap = self
            .target
            .overlap_ratio(&other.source)
            .max(self.target.overlap_ratio(&other.target));

        (source_overlap + target_overlap) / 2.0
    }
}

impl fmt::Display for ClonePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ClonePair({}, {:.1}% similar, {} ↔ {})",
            self.clone_type,
            self.similarity * 100.0,
            self.source.location_string(),
            self.target.location_string()
        )
    }
}

impl CloneMetrics {
    /// Create default metrics
    pub fn new(tokens: usize, loc: usize, similarity: f64) -> Self {
        Self {
            token_similarity: similarity,
            line_similarity: similarity,
            ast_similarity: None,
            semantic_similarity: None,
            edit_distance: None,
            normalized_edit_distance: None,
            clone_length_tokens: tokens,
            clone_length_loc: loc,
            gap_count: None,
            gap_size: None,
        }
    }

    /// Add AST similarity (for Type-2+)
    pub fn with_ast_similarity(mut self, similarity: f64) -> Self {
        self.ast_similarity = Some(similarity);
        self
    }

    /// Add semantic similarity (for Type-4)
    pub fn with_semantic_similarity(mut self, similarity: f64) -> Self {
        self.semantic_similarity = Some(similarity);
        self
    }

    /// Add edit distance
    pub fn with_edit_distance(mut self, distance: usize, max_length: usize) -> Self {
        self.edit_distance = Some(distance);
        if max_length > 0 {
            self.normalized_edit_distance = Some(1.0 - (distance as f64 / max_length as f64));
        }
        self
    }

    /// Add gap information (for Type-3)
    pub fn with_gaps(mut self, gap_count: usize, gap_size: usize) -> Self {
        self.gap_count = Some(gap_count);
        self.gap_size = Some(gap_size);
        self
    }
}

impl DetectionInfo {
    /// Create new detection info
    pub fn new(algorithm: String) -> Self {
        Self {
            algorithm,
            detection_time_ms: None,
            detector_version: "1.0.0".to_string(),
            confidence: None,
            is_true_positive: None,
            notes: Vec::new(),
        }
    }

    /// Add detection time
    pub fn with_time(mut self, time_ms: u64) -> Self {
        self.detection_time_ms = Some(time_ms);
        self
    }

    /// Add confidence score
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }

    /// Mark as true/false positive
    pub fn with_ground_truth(mut self, is_true_positive: bool) -> Self {
        self.is_true_positive = Some(is_true_positive);
        self
    }
}
