pub mod biabduction;
pub mod effect_analyzer;
pub mod factory;
pub mod fixpoint;
pub mod hybrid;
/// Effect Analysis Infrastructure
pub mod local_analyzer;
pub mod patterns;



pub use biabduction::*;
pub use effect_analyzer::*;
pub use factory::*;
pub use fixpoint::*;
pub use hybrid::*;
pub use local_analyzer::*;
