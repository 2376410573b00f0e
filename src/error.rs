//! Error types for the bounded-load hash ring.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by [`crate::ring::Ring`] construction and queries.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Raised by [`crate::ring::Ring::new`] when the configured load factor
    /// and replication factor cannot honor the bounded-load cap for the
    /// given member count.
    #[error(
        "invalid ring configuration: partitions={partition_count}, members={member_count}, \
         load_factor={load_factor}, expected_cap={expected_cap} exceeds 2*replication_factor ({max_cap})"
    )]
    Config {
        partition_count: usize,
        member_count: usize,
        load_factor: f64,
        expected_cap: usize,
        max_cap: usize,
    },

    /// Raised when `closest_n` is asked for more distinct members than exist.
    #[error("requested {requested} members but the ring only has {available}")]
    InsufficientMembers { requested: usize, available: usize },

    /// Raised when the placement engine cannot find a non-overloaded member
    /// for a partition after walking the entire virtual-node index. Indicates
    /// a configuration pathology that construction-time validation should
    /// already have rejected.
    #[error(
        "insufficient space to place partition {partition}: avg_load={avg_load}, \
         members={member_count}, virtual_nodes={virtual_node_count}"
    )]
    InsufficientSpace {
        partition: usize,
        avg_load: usize,
        member_count: usize,
        virtual_node_count: usize,
    },
}
