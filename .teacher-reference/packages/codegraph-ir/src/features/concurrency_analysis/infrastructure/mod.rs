/// Concurrency Analysis Infrastructure
pub mod async_race_detector;
pub mod deadlock_detector; // SOTA: Wait-For Graph + Tarjan's SCC
pub mod error;
pub mod happens_before; // SOTA: Lamport's Vector Clocks

pub use async_race_detector::*;
pub use deadlock_detector::*;
pub use error::*;
pub use happens_before::*;
