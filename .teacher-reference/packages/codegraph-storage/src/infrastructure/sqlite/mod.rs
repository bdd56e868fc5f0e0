//! SQLite adapter for CodeSnapshotStore (RFC-102)
//!
//! To be implemented in RFC-102 session.
//!
//! Will include:
//! - Schema design (immutable snapshots)
//! - CodeSnapshotStore trait implementation
//! - replace_file() implementation
//! - Snapshot comparison queries

pub struct SqliteSnapshotStore {
    // RFC-102: Implementation
}

// Placeholder
impl SqliteSnapshotStore {
    pub fn new_in_memory() -> Result<Self, crate::StorageError> {
        todo!("RFC-102: Implement SQLite adapter")
    }
}
