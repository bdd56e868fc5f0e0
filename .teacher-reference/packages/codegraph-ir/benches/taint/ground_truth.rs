//! IFDS/IDE Ground Truth Cases
//!
//! Manually verified test cases for accuracy validation.
//!
//! Each case includes:
//! - Python source code (as comment)
//! - CFG structure
//! - Expected IFDS results (path edges, summary edges)
//! - Expected vulnerabilities

#[path = "mod.rs"]
mod taint_common;

// TODO: Implement ground truth cases
// See: benches/effect_analysis_ground_truth.rs for pattern

#[cfg(test)]
mod tests {
    #[test]
    fn placeholder() {
        // Ground truth tests will go here
        assert!(true);
    }
}
