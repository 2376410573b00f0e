//! The `Member` capability: anything the ring can place on its virtual-node
//! index and partition table.
//!
//! A member only needs a name that is stable for its lifetime in the ring —
//! two members with equal names are the same member as far as the ring is
//! concerned. Everything else about a member (address, metadata, connection
//! state) is the caller's business.
//!
//! The ring owns the authoritative instance of each member behind an `Arc`
//! (the shared-ownership strategy from the design notes): the registry holds
//! one share, and every handle returned to a caller — from `locate`,
//! `closest_n`, or `get_members` — is another share of the same `Arc`. A
//! member removed from the ring stays alive as long as a caller still holds
//! a handle to it; the ring simply stops assigning it new partitions.

use std::fmt::Debug;

/// A participant in the ring.
///
/// Implementors must be cheap to compare by name and safe to share across
/// threads, since the ring may hand a clone of the same `Arc<dyn Member>` to
/// many concurrent readers.
pub trait Member: Debug + Send + Sync {
    /// Stable identity for this member. Two members with equal names are
    /// treated as the same ring participant.
    fn name(&self) -> &str;
}

/// A handle to a member the ring has placed.
///
/// This is the "clone producing an independent copy" half of the `Member`
/// capability: cloning a handle is cheap (an `Arc` bump) and the resulting
/// handle remains valid even after the member is removed from the ring.
pub type MemberHandle = std::sync::Arc<dyn Member>;

/// A convenience [`Member`] for callers who only need a plain name, mirroring
/// the simple string-keyed node types common in this family of crates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StringMember(std::sync::Arc<str>);

impl StringMember {
    /// Builds a member from any owned or borrowed string.
    pub fn new(name: impl Into<std::sync::Arc<str>>) -> Self {
        Self(name.into())
    }
}

impl Member for StringMember {
    fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StringMember {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for StringMember {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for StringMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
