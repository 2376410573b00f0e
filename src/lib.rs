//! A bounded-load consistent hash ring.
//!
//! Maps an unbounded universe of keys onto a small, dynamic set of members
//! (servers, shards, gateways) such that:
//!
//! - the owner of each key is deterministic given the current member set,
//! - adding or removing a member reshuffles only a small fraction of keys,
//! - no member receives disproportionately more keys than the average, even
//!   under adversarial key skew, because the placement engine enforces a
//!   hard per-member cap (`⌈(P/M) · L⌉`).
//!
//! The hash function ([`Hasher`]) and the member type ([`Member`]) are both
//! pluggable capabilities; this crate ships two reference hashers
//! (`FnvHasher`, `Crc64Hasher`) and one convenience member (`StringMember`)
//! but places no requirements on them beyond the trait bounds.
//!
//! ```
//! use bounded_hash_ring::{FnvHasher, Member, Ring, RingConfig, StringMember};
//! use std::sync::Arc;
//!
//! // The default replication factor (R=20) only clears its own bounded-load
//! // cap once the cluster has enough members (see `RingConfig::validate`),
//! // so a realistic cluster needs at least nine.
//! let members = (0..9)
//!     .map(|i| Arc::new(StringMember::new(format!("cache-{i}"))) as _)
//!     .collect();
//! let ring = Ring::new(members, RingConfig::with_hasher(Arc::new(FnvHasher))).unwrap();
//!
//! let owner = ring.locate(b"user:42").unwrap();
//! println!("user:42 routes to {}", owner.name());
//! ```

pub mod config;
pub mod error;
pub mod hasher;
pub mod member;
pub mod ring;
pub mod topology;
pub mod vnode;

pub use config::RingConfig;
pub use error::{Error, Result};
pub use hasher::{Crc64Hasher, FnvHasher, Hasher};
pub use member::{Member, MemberHandle, StringMember};
pub use ring::Ring;
pub use topology::Topology;
pub use vnode::VirtualNode;
