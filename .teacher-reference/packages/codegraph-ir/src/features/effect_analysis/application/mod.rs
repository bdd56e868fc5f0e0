/// Effect Analysis Application Layer
pub mod analyze_effects;
pub mod effect_analysis_service;

pub use analyze_effects::*;
pub use effect_analysis_service::EffectAnalysisService;
