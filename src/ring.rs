//! The bounded-load consistent hash ring.
//!
//! [`Ring`] is the crate's single logical object: a member registry, a
//! sorted virtual-node index, a partition table, and a load map, all guarded
//! by one reader/writer lock (the concurrency envelope from §5 of the
//! design). Reads (`locate`, `closest_n`, `get_members`,
//! `load_distribution`) take a read lock and never block each other.
//! Mutations (`add`, `remove_by_name`) take the write lock, rebuild the
//! virtual-node index, and re-run the placement engine against the whole
//! ring before publishing the new partition table and load map atomically.

use crate::config::RingConfig;
use crate::error::{Error, Result};
use crate::hasher::Hasher;
use crate::member::{Member, MemberHandle};
use crate::vnode::{vnode_position, VirtualNode};
use parking_lot::RwLock;
use std::collections::HashMap;

/// State protected by the ring's single reader/writer lock.
struct RingState {
    members: HashMap<String, MemberHandle>,
    vnodes: Vec<VirtualNode>,
    /// Empty when `members` is empty; otherwise exactly `partition_count`
    /// entries, total over `[0, partition_count)`.
    partitions: Vec<MemberHandle>,
    loads: HashMap<String, usize>,
}

impl RingState {
    fn empty() -> Self {
        Self {
            members: HashMap::new(),
            vnodes: Vec::new(),
            partitions: Vec::new(),
            loads: HashMap::new(),
        }
    }
}

/// A bounded-load consistent hash ring over an in-memory set of members.
///
/// See the crate-level documentation for the algorithm; in short, `locate`
/// is O(1) (an index into the partition table), `add`/`remove_by_name` are
/// O(M·R·log(M·R) + P·R) because they rebuild the virtual-node index and
/// re-place every partition from scratch — this crate follows the "full
/// re-placement on every write" data flow described in the design rather
/// than incrementally patching the previous placement, since a rebuild is
/// simpler to reason about and the workloads this ring targets (client-side
/// routing tables) mutate rarely relative to how often they're read.
pub struct Ring {
    config: RingConfig,
    state: RwLock<RingState>,
}

impl Ring {
    /// Builds a ring from an initial (possibly empty) member set.
    ///
    /// Rejects the configuration if the bounded-load cap it implies for
    /// `members.len()` members would exceed `2 * replication_factor` (see
    /// [`RingConfig::validate`]).
    pub fn new(members: Vec<MemberHandle>, config: RingConfig) -> Result<Self> {
        config.validate(members.len())?;

        let mut registry = HashMap::with_capacity(members.len());
        for member in members {
            registry.insert(member.name().to_string(), member);
        }

        let vnodes = build_vnodes(&registry, &config);
        let (partitions, loads) = place_partitions(&vnodes, registry.len(), &config)?;

        Ok(Self {
            config,
            state: RwLock::new(RingState {
                members: registry,
                vnodes,
                partitions,
                loads,
            }),
        })
    }

    /// Convenience constructor for an empty ring.
    pub fn empty(config: RingConfig) -> Self {
        Self {
            config,
            state: RwLock::new(RingState::empty()),
        }
    }

    /// Adds `member` to the ring. Idempotent: adding a name already present
    /// is a no-op.
    ///
    /// Rebuilds the virtual-node index and re-places every partition; if
    /// placement fails (see [`Error::InsufficientSpace`]) or the new member
    /// count no longer satisfies the load-factor cap, the mutation is
    /// rejected and the ring is left exactly as it was.
    pub fn add(&self, member: MemberHandle) -> Result<()> {
        let name = member.name().to_string();

        // Optimistic read: skip the write lock entirely if this is a no-op.
        if self.state.read().members.contains_key(&name) {
            return Ok(());
        }

        let mut state = self.state.write();
        if state.members.contains_key(&name) {
            return Ok(());
        }

        let span = tracing::debug_span!("ring_add_member", member = %name);
        let _enter = span.enter();

        let mut registry = state.members.clone();
        registry.insert(name.clone(), member);
        self.config.validate(registry.len())?;

        let vnodes = build_vnodes(&registry, &self.config);
        let (partitions, loads) = place_partitions(&vnodes, registry.len(), &self.config)?;

        state.members = registry;
        state.vnodes = vnodes;
        state.partitions = partitions;
        state.loads = loads;
        tracing::debug!(members = state.members.len(), "member added, ring rebalanced");
        Ok(())
    }

    /// Removes the member named `name` from the ring. Idempotent: removing
    /// an absent name is a no-op.
    pub fn remove_by_name(&self, name: &str) -> Result<()> {
        if !self.state.read().members.contains_key(name) {
            return Ok(());
        }

        let mut state = self.state.write();
        if !state.members.contains_key(name) {
            return Ok(());
        }

        let span = tracing::debug_span!("ring_remove_member", member = %name);
        let _enter = span.enter();

        let mut registry = state.members.clone();
        registry.remove(name);
        self.config.validate(registry.len())?;

        let vnodes = build_vnodes(&registry, &self.config);
        let (partitions, loads) = place_partitions(&vnodes, registry.len(), &self.config)?;

        state.members = registry;
        state.vnodes = vnodes;
        state.partitions = partitions;
        state.loads = loads;
        tracing::debug!(members = state.members.len(), "member removed, ring rebalanced");
        Ok(())
    }

    /// Returns the partition id a key hashes to, `hasher(key) mod P`.
    fn partition_of(&self, key: &[u8]) -> usize {
        let p = self.config.partition_count() as u64;
        (self.config.hasher.sum64(key) % p) as usize
    }

    /// Locates the owner of `key`, or `None` when the ring has no members.
    ///
    /// Takes the read lock once and decides emptiness and lookup together —
    /// unlike the source this crate generalizes, which checks emptiness
    /// outside the lock and accepts a benign race. See the design notes'
    /// Open Questions for why this crate chose otherwise.
    pub fn locate(&self, key: &[u8]) -> Option<MemberHandle> {
        let state = self.state.read();
        if state.members.is_empty() {
            return None;
        }
        let partition = self.partition_of(key);
        state.partitions.get(partition).cloned()
    }

    /// Returns up to `n` distinct members for `key`, primary first.
    ///
    /// Errors with [`Error::InsufficientMembers`] if `n` exceeds the current
    /// member count. `n == 0` returns an empty list without taking the
    /// member-count fast path, matching "reject n <= 0 (empty result)" in
    /// §4.3.
    pub fn closest_n(&self, key: &[u8], n: usize) -> Result<Vec<MemberHandle>> {
        if n == 0 {
            return Ok(Vec::new());
        }

        let state = self.state.read();
        let member_count = state.members.len();
        if n > member_count {
            return Err(Error::InsufficientMembers {
                requested: n,
                available: member_count,
            });
        }

        let partition = self.partition_of(key);
        let primary = match state.partitions.get(partition) {
            Some(member) => member.clone(),
            None => {
                return Err(Error::InsufficientMembers {
                    requested: n,
                    available: member_count,
                })
            }
        };

        let start = self.config.hasher.sum64(primary.name().as_bytes());
        let vnodes = &state.vnodes;
        let start_idx = lower_bound(vnodes, start);

        let mut seen = std::collections::HashSet::with_capacity(n);
        let mut result = Vec::with_capacity(n);
        for step in 0..vnodes.len() {
            let idx = (start_idx + step) % vnodes.len();
            let candidate = vnodes[idx].member();
            if seen.insert(candidate.name().to_string()) {
                result.push(candidate.clone());
                if result.len() == n {
                    break;
                }
            }
        }
        Ok(result)
    }

    /// Snapshot of every member currently in the ring.
    pub fn get_members(&self) -> Vec<MemberHandle> {
        self.state.read().members.values().cloned().collect()
    }

    /// Snapshot of the partition count currently owned by each member.
    pub fn load_distribution(&self) -> HashMap<String, usize> {
        self.state.read().loads.clone()
    }

    /// The uncapped target load per member, `(P/M) · L`, or `0.0` when the
    /// ring is empty. See [`RingConfig::average_load_for`] for why this is
    /// not the same number as the per-member cap used during placement.
    pub fn average_load(&self) -> f64 {
        let member_count = self.state.read().members.len();
        self.config.average_load_for(member_count)
    }

    /// Number of distinct members currently in the ring.
    pub fn member_count(&self) -> usize {
        self.state.read().members.len()
    }

    /// Number of virtual nodes currently in the ring (`M · R`, modulo
    /// collisions).
    pub fn vnode_count(&self) -> usize {
        self.state.read().vnodes.len()
    }

    pub(crate) fn config(&self) -> &RingConfig {
        &self.config
    }
}

/// Builds the sorted virtual-node index for `members`: `R` positions per
/// member, `position = hasher(name ++ decimal(i))`.
fn build_vnodes(members: &HashMap<String, MemberHandle>, config: &RingConfig) -> Vec<VirtualNode> {
    let r = config.replication_factor();
    let mut vnodes = Vec::with_capacity(members.len() * r);
    for member in members.values() {
        for i in 0..r {
            let position = vnode_position(config.hasher.as_ref(), member.name(), i);
            vnodes.push(VirtualNode::new(position, member.clone()));
        }
    }
    vnodes.sort_unstable();
    vnodes
}

/// First index `i` with `vnodes[i].position() >= target`, wrapping to `0`
/// when every position is smaller than `target`. Empty slices return `0`
/// (callers only invoke this on a non-empty index).
fn lower_bound(vnodes: &[VirtualNode], target: u64) -> usize {
    if vnodes.is_empty() {
        return 0;
    }
    match vnodes.binary_search_by(|v| v.position().cmp(&target)) {
        Ok(idx) => idx,
        Err(idx) if idx == vnodes.len() => 0,
        Err(idx) => idx,
    }
}

/// The placement engine (§4.4): assigns every partition `p in [0, P)` to a
/// member, walking forward from `hasher(le_bytes(p))`'s ring position and
/// sliding past any member already at its cap.
fn place_partitions(
    vnodes: &[VirtualNode],
    member_count: usize,
    config: &RingConfig,
) -> Result<(Vec<MemberHandle>, HashMap<String, usize>)> {
    if member_count == 0 {
        return Ok((Vec::new(), HashMap::new()));
    }

    let span = tracing::trace_span!("place_partitions", member_count, partitions = config.partition_count());
    let _enter = span.enter();

    let partition_count = config.partition_count();
    let avg_load = config.cap_for(member_count);
    let mut partitions = Vec::with_capacity(partition_count);
    let mut loads: HashMap<String, usize> = HashMap::with_capacity(member_count);

    for p in 0..partition_count {
        let key = config.hasher.sum64(&(p as u64).to_le_bytes());
        let start_idx = lower_bound(vnodes, key);

        let mut placed = false;
        for step in 0..vnodes.len() {
            let idx = (start_idx + step) % vnodes.len();
            let candidate = vnodes[idx].member();
            let count = loads.get(candidate.name()).copied().unwrap_or(0);
            if count + 1 <= avg_load {
                *loads.entry(candidate.name().to_string()).or_insert(0) += 1;
                partitions.push(candidate.clone());
                placed = true;
                break;
            }
        }

        if !placed {
            tracing::warn!(partition = p, avg_load, "placement exhausted virtual-node index");
            return Err(Error::InsufficientSpace {
                partition: p,
                avg_load,
                member_count,
                virtual_node_count: vnodes.len(),
            });
        }
    }

    Ok((partitions, loads))
}
