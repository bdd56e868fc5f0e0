//! Code Fragment Representation
//!
//! Represents a fragment of code that can be part of a clone pair.
//! Contains source location, content, and metadata for clone detection.

use crate::shared::models::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fragment of code that can be analyzed for clones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFragment {
    /// File path
    pub file_path: String,

    /// Start and end positions in source
    pub span: Span,

    /// Original source code
    pub content: String,

    /// Normalized content (for Type-2 detection)
    ///
    /// Identifiers replaced with placeholders, whitespace normalized
    pub normalized_content: Option<String>,

    /// Hash of original content (for Type-1 detection)
    pub content_hash: Option<String>,

    /// Hash of normalized content (for Type-2 detection)
    pub normalized_hash: Option<String>,

    /// Number of tokens
    pub token_count: usize,

    /// Lines of code (excluding whitespace/comments)
    pub loc: usize,

    /// Node IDs in the IR (for linking to AST/PDG)
    pub node_ids: Vec<String>,

    /// Function/class/method name (if fragment is a function)
    pub enclosing_function: Option<String>,

    /// Additional metadata
    pub metadata: FragmentMetadata,
}

/// Additional metadata for code fragments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentMetadata {
    /// Language (python, typescript, java, etc.)
    pub language: String,

    /// Complexity metrics
    pub cyclomatic_complexity: Option<usize>,

    /// Number of unique identifiers
    pub unique_identifiers: Option<usize>,

    /// Number of function calls
    pub function_calls: Option<usize>,

    /// Is this fragment a complete function?
    pub is_complete_function: bool,

    /// Is this fragment a class method?
    pub is_method: bool,
}

impl CodeFragment {
    /// Create a new code fragment
    pub fn new(
        file_path: String,
        span: Span,
        content: String,
        token_count: usize,
        loc: usize,
    ) -> Self {
        Self {
            file_path,
            span,
            content,
            normalized_content: None,
            content_hash: None,
            normalized_hash: None,
            token_count,
            loc,
            node_ids: Vec::new(),
            enclosing_function: None,
            metadata: FragmentMetadata {
                language: "unknown".to_string(),
                cyclomatic_complexity: None,
                unique_identifiers: None,
                function_calls: None,
                is_complete_function: false,
                is_method: false,
            },
        }
    }

    /// Create a new fragment with metadata
    pub fn with_metadata(mut self, metadata: FragmentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Add normalized content and hash
    pub fn with_normalized(mut self, normalized_content: String, normalized_hash: String) -> Self {
        self.normalized_content = Some(normalized_content);
        self.normalized_hash = Some(normalized_hash);
        self
    }

    /// Add content hash (MD5, SHA256, etc.)
    pub fn with_content_hash(mut self, hash: String) -> Self {
        self.content_hash = Some(hash);
        self
    }

    /// Add node IDs for linking to IR
    pub fn with_node_ids(mut self, node_ids: Vec<String>) -> Self {
        self.node_ids = node_ids;
        self
    }

    /// Add enclosing function name
    pub fn with_enclosing_function(mut self, function_name: String) -> Self {
        self.enclosing_function = Some(function_name);
        self
    }

    /// Get file name (without path)
    pub fn file_name(&self) -> &str {
        self.file_path.rsplit('/').next().unwrap_or(&self.file_path)
    }

    /// Get line range (start_line, end_line)
    pub fn line_range(&self) -> (usize, usize) {
        (self.span.start_line as usize, self.span.end_line as usize)
    }

    /// Get number of lines (end - start + 1)
    pub fn num_lines(&self) -> usize {
        (self.span.end_line.saturating_sub(self.span.start_line) + 1) as usize
    }

    /// Check if fragment meets minimum size threshold
    pub fn meets_threshold(&self, min_tokens: usize, min_loc: usize) -> bool {
        self.token_count >= min_tokens && self.loc >= min_loc
    }

    /// Check if fragment overlaps with another fragment
    pub fn overlaps(&self, other: &CodeFragment) -> bool {
        if self.file_path != other.file_path {
            return false;
        }

        // Check line overlap
        let (s1, e1) = self.line_range();
        let (s2, e2) = other.line_range();

        !(e1 < s2 || e2 < s1)
    }

    /// Calculate overlap ratio with another fragment
    ///
    /// Returns: overlap_lines / min(self.lines, other.lines)
    pub fn overlap_ratio(&self, other: &CodeFragment) -> f64 {
        if !self.overlaps(other) {
            return 0.0;
        }

        let (s1, e1) = self.line_range();
        let (s2, e2) = other.line_range();

        let overlap_start = s1.max(s2);
        let overlap_end = e1.min(e2);
        let overlap_lines = (overlap_end - overlap_start + 1) as f64;

        let min_lines = self.num_lines().min(other.num_lines()) as f64;

        overlap_lines / min_lines
    }

    /// Check if fragment is contained within another fragment
    pub fn is_contained_in(&self, other: &CodeFragment) -> bool {
        if self.file_path != other.file_path {
            return false;
        }

        let (s1, e1) = self.line_range();
        let (s2, e2) = other.line_range();

        s1 >= s2 && e1 <= e2
    }

    /// Get a human-readable location string
    pub fn location_string(&self) -> String {
        format!(
            "{}:{}:{}",
            self.file_name(),
            self.span.start_line,
            self.span.start_col
        )
    }

    /// Compute MD5 hash of content
    #[cfg(feature = "md5")]
    pub fn compute_md5_hash(&self) -> String {
        use md5::{Digest, Md5};
        let mut hasher = Md5::new();
        hasher.update(self.content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Compute SHA256 hash of content
    #[cfg(feature = "sha256")]
    pub fn compute_sha256_hash(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Compute simple FNV-1a hash (fast, no external deps)
    pub fn compute_fnv1a_hash(&self) -> u64 {
        const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
        const FNV_PRIME: u64 = 0x100000001b3;

        let mut hash = FNV_OFFSET_BASIS;
        for byte in self.content.as_bytes() {
            hash ^= *byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        hash
    }
}

impl fmt::Display for CodeFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CodeFragment({}, lines {}-{}, {} tokens, {} LOC)",
            self.file_name(),
            self.span.start_line,
            self.span.end_line,
            self.token_count,
            self.loc
        )
    }
}
