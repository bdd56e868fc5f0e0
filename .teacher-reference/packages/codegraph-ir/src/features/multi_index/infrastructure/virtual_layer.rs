// Virtual Layer: Per-agent isolated editing spaces
//
// # Non-Negotiable Contract 3-4 (P2-9)
// - Overlay + merge-on-read만 허용
// - Snapshot clone 금지

use crate::features::query_engine::infrastructure::{ChangeOp, Snapshot, TxnId};

/// P2-9: Virtual layer with overlay pattern (NO full clone)
///
/// # Non-Negotiable Contract 3-4
/// Overlay + merge-on-read만 허용
/// Snapshot clone 금지
///
/// Memory usage = O(pending_changes) not O(total_nodes)
#[derive(Debug, Clone)]
pub struct VirtualLayer {
    pub agent_id: String,
    pub base_txn: TxnId,
    pub pending_changes: Vec<ChangeOp>,
    // P2-9: IMMUTABLE - NO snapshot clone field allowed
    // PROHIBITED: pub virtual_index: HashMap<String, Node>
}

impl VirtualLayer {
    pub fn new(agent_id: String, base_txn: TxnId) -> Self {
        Self {
            agent_id,
            base_txn,
            pending_changes: Vec::new(),
            // No clone! Memory usage = O(pending_changes) not O(total_nodes)
        }
    }

    /// Add change to pending overlay
    pub fn add_change(&mut self, change: ChangeOp) {
        self.pending_changes.push(change);
    }

    /// Merge-on-Read: Combine base snapshot + pending changes
    ///
    /// # P2-9: Overlay Pattern
    /// Reads base snapshot on-demand (not stored in VirtualLayer)
    /// Applies pending changes as overlay
    pub fn merge(&self, base_snapshot: Snapshot) -> Snapshot {
        let mut merged = base_snapshot;

        // Apply pending changes (overlay)
        for change in &self.pending_changes {
            match change {
                ChangeOp::AddNode(node) => {
                    merged.nodes.insert(node.id.clone(), node.clone());
                }
                ChangeOp::RemoveNode(id) => {
                    merged.nodes.remove(id);
                }
                ChangeOp::UpdateNode(node) => {
                    merged.nodes.insert(node.id.clone(), node.clone());
                }
                ChangeOp::AddEdge(edge) => {
                    // Edges is a Vec, just push directly
                    merged.edges.push(edge.clone());
                }
                ChangeOp::RemoveEdge(src, tgt) => {
                    // Remove edge from Vec by filtering
                    merged
                        .edges
                        .retain(|e| !(e.source_id == *src && e.target_id == *tgt));
                }
            }
        }

        merged
    }

    /// Get pending change count
    pub fn change_count(&self) -> usize {
        self.pending_changes.len()
    }

    /// Clear all pending changes
    pub fn clear(&mut self) {
        self.pending_changes.clear();
    }
}
