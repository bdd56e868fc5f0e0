pub mod abductive_inference;
pub mod biabduction_strategy;
pub mod separation_logic;


// Benchmark moved to benches/effect_analysis_ground_truth.rs
// #[cfg(test)]
// mod ground_truth_benchmark;

pub use abductive_inference::*;
pub use biabduction_strategy::BiAbductionStrategy;
pub use separation_logic::*;
