//! Performance profile types
//!
//! Qualitative cost classes and expected resource bands.
//! These are NOT quantitative guarantees, but general guidance.

use serde::{Deserialize, Serialize};

/// Qualitative cost class (not quantitative guarantees)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostClass {
    /// Light analysis, suitable for tight feedback loops
    Low,
    /// Moderate analysis, suitable for CI/CD
    Medium,
    /// Deep analysis, suitable for nightly scans
    High,
    /// Exhaustive analysis, may be unbounded
    Extreme,
}

/// Expected latency band (qualitative, not guaranteed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatencyBand {
    /// Typically completes in <5 seconds
    SubFiveSeconds,
    /// Typically completes in <30 seconds
    SubThirtySeconds,
    /// Typically completes in <5 minutes
    SubFiveMinutes,
    /// May take longer, unbounded
    Unbounded,
}

/// Expected memory band (qualitative, not guaranteed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryBand {
    /// Typically uses <200MB
    Under200MB,
    /// Typically uses <1GB
    Under1GB,
    /// Typically uses <4GB
    Under4GB,
    /// May use more, unbounded
    Unbounded,
}

/// Performance profile (qualitative bands, NOT guarantees)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceProfile {
    /// Cost class: Low | Medium | High | Extreme
    pub cost_class: CostClass,

    /// Expected latency: <5s | <30s | <5m | unbounded
    pub expected_latency: LatencyBand,

    /// Expected memory: <200MB | <1GB | <4GB | unbounded
    pub expected_memory: MemoryBand,

    /// Whether recommended for production use
    pub production_ready: bool,
}

impl PerformanceProfile {
    /// Create a new performance profile
    pub fn new(
        cost_class: CostClass,
        expected_latency: LatencyBand,
        expected_memory: MemoryBand,
        production_ready: bool,
    ) -> Self {
        Self {
            cost_class,
            expected_latency,
            expected_memory,
            production_ready,
        }
    }

    /// Get a human-readable description
    pub fn describe(&self) -> String {
        format!(
            "Cost: {:?}, Latency: {:?}, Memory: {:?}, Production: {}",
            self.cost_class,
            self.expected_latency,
            self.expected_memory,
            if self.production_ready {
                "Yes ✅"
            } else {
                "No ⚠️"
            }
        )
    }

    /// Fast profile: Low cost, <5s, <200MB
    pub fn fast() -> Self {
        Self {
            cost_class: CostClass::Low,
            expected_latency: LatencyBand::SubFiveSeconds,
            expected_memory: MemoryBand::Under200MB,
            production_ready: true,
        }
    }

    /// Balanced profile: Medium cost, <30s, <1GB
    pub fn balanced() -> Self {
        Self {
            cost_class: CostClass::Medium,
            expected_latency: LatencyBand::SubThirtySeconds,
            expected_memory: MemoryBand::Under1GB,
            production_ready: true,
        }
    }

    /// Thorough profile: High cost, <5m, <4GB
    pub fn thorough() -> Self {
        Self {
            cost_class: CostClass::High,
            expected_latency: LatencyBand::SubFiveMinutes,
            expected_memory: MemoryBand::Under4GB,
            production_ready: false,
        }
    }
}
