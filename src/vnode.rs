//! Virtual nodes: the hash positions that make up the ring's sorted index.
//!
//! Each member contributes `R` virtual nodes (the replication factor) spread
//! across the 64-bit position space. More virtual nodes per member smooths
//! the distribution of partitions and shrinks the fraction of keys that move
//! on membership change, at the cost of a larger sorted index to search.

use crate::hasher::Hasher;
use crate::member::{Member, MemberHandle};
use std::cmp::Ordering;

/// A single hash position on the ring, pointing at the member that owns it.
///
/// Ordered by `position` alone: the sorted virtual-node array only needs a
/// total order on positions to support the binary-search walk in §4.3/§4.4;
/// ties between two members' positions are vanishingly unlikely for a 64-bit
/// hash and are resolved arbitrarily (last write wins during construction).
#[derive(Clone)]
pub struct VirtualNode {
    position: u64,
    member: MemberHandle,
}

impl VirtualNode {
    /// Builds a virtual node at `position`, owned by `member`.
    pub fn new(position: u64, member: MemberHandle) -> Self {
        Self { position, member }
    }

    /// The position on the ring.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// The member that owns this position.
    #[inline]
    pub fn member(&self) -> &MemberHandle {
        &self.member
    }
}

impl PartialEq for VirtualNode {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl Eq for VirtualNode {}

impl PartialOrd for VirtualNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VirtualNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position.cmp(&other.position)
    }
}

impl std::fmt::Debug for VirtualNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualNode")
            .field("position", &format_args!("{:016x}", self.position))
            .field("member", &self.member.name())
            .finish()
    }
}

/// Derives the virtual-node position for `member`'s `i`-th replica.
///
/// Per §3: the hash input is the member's name followed by the decimal
/// representation of `i`, with no separator — `hasher("node-a" ++ "3")`, not
/// `hasher("node-a:3")`.
pub fn vnode_position(hasher: &dyn crate::hasher::Hasher, name: &str, i: usize) -> u64 {
    let mut buf = String::with_capacity(name.len() + 3);
    buf.push_str(name);
    buf.push_str(itoa(i).as_str());
    hasher.sum64(buf.as_bytes())
}

fn itoa(i: usize) -> String {
    i.to_string()
}
