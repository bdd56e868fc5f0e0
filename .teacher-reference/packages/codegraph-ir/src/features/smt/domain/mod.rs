//! SMT Domain Models
//!
//! Domain models for constraint checking and path feasibility analysis.

pub mod constraint;
pub mod path_condition;
pub mod sanitizer_db;

pub use constraint::{Constraint, Theory};
pub use path_condition::{ComparisonOp, ConstValue, PathCondition, VarId};
pub use sanitizer_db::{SanitizerDB, SanitizerEffect, TaintType};
