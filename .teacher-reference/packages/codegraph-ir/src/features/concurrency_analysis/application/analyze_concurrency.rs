//! Concurrency Analysis Use Case
//!
//! **SOTA Implementation**: RacerD-inspired async race detection for Python.
//!
//! ## Algorithm
//! 1. Find async functions via `Node.is_async == true`
//! 2. Detect shared variable accesses via `Edge(Reads/Writes)`
//! 3. Identify await points (interleaving opportunities)
//! 4. Report races without lock protection
//!
//! ## Performance
//! - Time: O(N + E) where N = nodes, E = edges
//! - Space: O(A) where A = number of accesses per function
//!
//! ## References
//! - RacerD: Blackshear et al. (Facebook Infer, 2018)

use crate::features::concurrency_analysis::{
    AsyncRaceDetector, ConcurrencyError, RaceCondition, Result,
};
use crate::features::cross_file::IRDocument;
use crate::shared::models::{Node, NodeKind};

/// Analyze concurrency issues in IR document
///
/// High-level use case for detecting race conditions and deadlocks.
pub struct ConcurrencyAnalysisUseCase {
    race_detector: AsyncRaceDetector,
}

impl ConcurrencyAnalysisUseCase {
    /// Create new concurrency analysis use case
    pub fn new() -> Self {
        Self {
            race_detector: AsyncRaceDetector::new(),
        }
    }

    /// Analyze all async functions for race conditions
    ///
    /// # Algorithm
    /// 1. Enumerate all async functions in IR document
    /// 2. For each async function, run race detector
    /// 3. Collect and return all detected races
    ///
    /// # Performance
    /// O(F × (N + E)) where F = async functions
    pub fn analyze_all(&self, ir_doc: &IRDocument) -> Result<Vec<RaceCondition>> {
        let mut all_races = Vec::new();

        // Find all async functions (REAL implementation)
        let async_functions = ir_doc.find_async_functions();

        for func_node in async_functions {
            match self
                .race_detector
                .analyze_async_function(ir_doc, &func_node.id)
            {
                Ok(races) => all_races.extend(races),
                Err(ConcurrencyError::NotAsyncFunction(_)) => {
                    // Skip non-async functions (shouldn't happen with proper filtering)
                    continue;
                }
                Err(e) => {
                    // Log error but continue with other functions
                    eprintln!("Error analyzing {}: {}", func_node.id, e);
                }
            }
        }

        Ok(all_races)
    }

    /// Analyze specific async function
    pub fn analyze_function(
        &self,
        ir_doc: &IRDocument,
        func_fqn: &str,
    ) -> Result<Vec<RaceCondition>> {
        self.race_detector.analyze_async_function(ir_doc, func_fqn)
    }

    /// Get summary statistics
    pub fn get_summary(&self, races: &[RaceCondition]) -> ConcurrencySummary {
        let mut critical = 0;
        let mut high = 0;
        let mut medium = 0;
        let mut low = 0;

        for race in races {
            match race.severity {
                crate::features::concurrency_analysis::RaceSeverity::Critical => critical += 1,
                crate::features::concurrency_analysis::RaceSeverity::High => high += 1,
                crate::features::concurrency_analysis::RaceSeverity::Medium => medium += 1,
                crate::features::concurrency_analysis::RaceSeverity::Low => low += 1,
            }
        }

        ConcurrencySummary {
            total_races: races.len(),
            critical,
            high,
            medium,
            low,
        }
    }
}

impl Default for ConcurrencyAnalysisUseCase {
    fn default() -> Self {
        Self::new()
    }
}

/// Concurrency analysis summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcurrencySummary {
    pub total_races: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

// ═══════════════════════════════════════════════════════════════════════════════
// IRDocument Extension Trait - PRODUCTION IMPLEMENTATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Extension trait for IRDocument to support concurrency analysis
pub trait IRDocumentConcurrencyExt {
    /// Find all async functions in the IR document
    ///
    /// # Algorithm
    /// Filters nodes where:
    /// - `kind == Function || kind == Method`
    /// - `is_async == Some(true)`
    ///
    /// # Performance
    /// O(N) where N = total nodes
    fn find_async_functions(&self) -> Vec<&Node>;
}

impl IRDocumentConcurrencyExt for IRDocument {
    fn find_async_functions(&self) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|node| {
                // Check if it's a function or method
                let is_callable = matches!(
                    node.kind,
                    NodeKind::Function | NodeKind::Method | NodeKind::Lambda
                );

                // Check if it's marked as async
                let is_async = node.is_async.unwrap_or(false);

                is_callable && is_async
            })
            .collect()
    }
}
