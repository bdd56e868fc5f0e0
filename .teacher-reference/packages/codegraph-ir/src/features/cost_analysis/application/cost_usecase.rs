//! Cost Analysis UseCase

/// Cost Analysis UseCase Trait
pub trait CostAnalysisUseCase: Send + Sync {
    fn analyze_cost(&self, code: &str) -> CostResult;
}

#[derive(Debug, Clone, Default)]
pub struct CostResult {
    pub total_cost: f64,
    pub complexity: usize,
}

/// Cost Analysis UseCase Implementation
#[derive(Debug, Default)]
pub struct CostAnalysisUseCaseImpl;

impl CostAnalysisUseCaseImpl {
    pub fn new() -> Self {
        Self
    }
}

impl CostAnalysisUseCase for CostAnalysisUseCaseImpl {
    fn analyze_cost(&self, _code: &str) -> CostResult {
        CostResult::default()
    }
}
