//! L3: Cross-File Resolution Executor
//!
//! Resolves imports and cross-file references.

use super::base::{StageExecutor, StageResult};
use super::context::PipelineContext;
use crate::pipeline::dag::StageId;
use crate::shared::models::CodegraphError;
use std::time::Instant;

/// L3: Cross-File Resolution Executor
pub struct CrossFileExecutor {}

impl CrossFileExecutor {
    pub fn new() -> Self {
        Self {}
    }
}

impl StageExecutor for CrossFileExecutor {
    fn stage_id(&self) -> StageId {
        StageId::L3CrossFile
    }

    fn execute(&self, context: &mut PipelineContext) -> Result<StageResult, CodegraphError> {
        let start = Instant::now();

        eprintln!("[L3] Starting Cross-File Resolution");

        // Get nodes and edges (Arc references)
        let nodes = context.get_nodes()?;
        let edges = context.get_edges()?;

        eprintln!(
            "[L3] Processing {} nodes, {} edges",
            nodes.len(),
            edges.len()
        );

        // TODO: Implement cross-file resolution logic
        // For now, just validate dependencies are met

        let duration = start.elapsed();

        Ok(StageResult::success(StageId::L3CrossFile, duration, nodes.len()))
    }

    fn dependencies(&self) -> Vec<StageId> {
        vec![StageId::L1IrBuild]
    }
}
