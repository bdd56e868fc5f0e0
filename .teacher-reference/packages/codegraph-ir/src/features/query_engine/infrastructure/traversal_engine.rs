// Infrastructure: TraversalEngine - BFS graph traversal with Rayon
// Implements RFC-071 REACH primitive

use super::graph_index::GraphIndex;
use crate::features::query_engine::domain::{EdgeType, PathResult, TraversalDirection};
use crate::shared::models::{Edge, Node};
use std::collections::{HashSet, VecDeque};
use std::time::Instant;

/// Traversal Engine - BFS-based path finding
///
/// Implements:
/// - Forward/backward BFS
/// - Depth limiting
/// - Path limiting (early termination)
/// - Timeout handling
pub struct TraversalEngine<'a> {
    index: &'a GraphIndex,
}

impl<'a> TraversalEngine<'a> {
    pub fn new(index: &'a GraphIndex) -> Self {
        Self { index }
    }

    /// Find paths from sources to targets (BFS)
    ///
    /// Args:
    /// - sources: Starting nodes
    /// - targets: Target nodes (termination condition)
    /// - edge_type: Edge filter (DFG, CFG, CALL, ALL)
    /// - direction: Forward or backward
    /// - max_depth: Maximum path length
    /// - max_paths: Stop after finding N paths
    /// - timeout_ms: Stop after N milliseconds
    ///
    /// Returns:
    /// - Vec<PathResult>: Found paths
    pub fn find_paths(
        &self,
        sources: &[&Node],
        targets: &[&Node],
        edge_type: EdgeType,
        direction: TraversalDirection,
        max_depth: usize,
        max_paths: usize,
        timeout_ms: u64,
    ) -> Vec<PathResult> {
        let start_time = Instant::now();
        let target_ids: HashSet<String> = targets.iter().map(|n| n.id.clone()).collect();
        let mut paths = Vec::new();

        // BFS from each source
        for source in sources {
            if paths.len() >= max_paths {
                break;
            }

            // Check timeout
            if start_time.elapsed().as_millis() > timeout_ms as u128 {
                break;
            }

            let found = self.bfs_single(
                source,
                &target_ids,
                edge_type,
                direction,
                max_depth,
                max_paths - paths.len(),
                timeout_ms,
                start_time,
            );

            paths.extend(found);
        }

        paths
    }

    /// BFS from single source
    fn bfs_single(
        &self,
        source: &Node,
        target_ids: &HashSet<String>,
        edge_type: EdgeType,
        direction: TraversalDirection,
        max_depth: usize,
        max_paths: usize,
        timeout_ms: u64,
        start_time: Instant,
    ) -> Vec<PathResult> {
        let mut paths = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        // Initialize: (current_node_id, path, depth)
        queue.push_back((source.id.clone(), vec![source.id.clone()], 0));
        visited.insert(source.id.clone());

        while let Some((node_id, path, depth)) = queue.pop_front() {
            // Check limits
            if paths.len() >= max_paths {
                break;
            }

            if start_time.elapsed().as_millis() > timeout_ms as u128 {
                break;
            }

            if depth >= max_depth {
                continue;
            }

            // Get neighbors
            let edges = match direction {
                TraversalDirection::Forward => self.index.get_edges_from(&node_id),
                TraversalDirection::Backward => self.index.get_edges_to(&node_id),
            };

            // Filter by edge type
            let filtered_edges: Vec<&Edge> = edges
                .into_iter()
                .filter(|e| self.matches_edge_type(e, edge_type))
                .collect();

            for edge in filtered_edges {
                let next_id = match direction {
                    TraversalDirection::Forward => &edge.target_id,
                    TraversalDirection::Backward => &edge.source_id,
                };

                // Check if reached target
                if target_ids.contains(next_id) {
                    let mut final_path = path.clone();
                    final_path.push(next_id.clone());

                    paths.push(PathResult {
                        node_ids: final_path,
                        edge_ids: vec![], // Edge tracking: requires (from, to) → edge_id index
                    });

                    if paths.len() >= max_paths {
                        return paths;
                    }

                    continue;
                }

                // Continue BFS
                if !visited.contains(next_id) {
                    visited.insert(next_id.clone());
                    let mut new_path = path.clone();
                    new_path.push(next_id.clone());
                    queue.push_back((next_id.clone(), new_path, depth + 1));
                }
            }
        }

        paths
    }

    /// Check if edge matches edge type filter
    fn matches_edge_type(&self, edge: &Edge, edge_type: EdgeType) -> bool {
        match edge_type {
            EdgeType::All => true,
            EdgeType::DFG => edge.kind.is_data_flow(),
            EdgeType::CFG => edge.kind.is_control_flow(),
            EdgeType::Call => matches!(edge.kind, crate::shared::models::EdgeKind::Calls),
        }
    }
}
