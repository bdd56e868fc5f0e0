/// Git History Domain Models
pub mod blame_info;
pub mod churn_metrics;
pub mod cochange_pattern;

pub use blame_info::*;
pub use churn_metrics::*;
pub use cochange_pattern::*;
