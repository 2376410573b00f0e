//! Read-only views over a [`Ring`]'s current state: ownership breakdowns,
//! percentages, and a human-readable description. Layered on top of the
//! public ring surface rather than reaching into its internals, so it pays
//! the same read-lock cost as any other caller and stays in sync with
//! whatever the ring's placement produced.

use crate::ring::Ring;
use std::collections::HashMap;

/// A lightweight, read-only view over a ring's ownership distribution.
pub struct Topology<'a> {
    ring: &'a Ring,
}

impl<'a> Topology<'a> {
    /// Wraps `ring` for inspection. Borrows the ring rather than owning it;
    /// construct a new `Topology` whenever you want a fresh view.
    pub fn new(ring: &'a Ring) -> Self {
        Self { ring }
    }

    /// Partition counts per member, identical to [`Ring::load_distribution`]
    /// but named for topology-inspection call sites.
    pub fn ownership(&self) -> HashMap<String, usize> {
        self.ring.load_distribution()
    }

    /// Ownership percentage (`0.0..=100.0`) per member. Empty when the ring
    /// has no members.
    pub fn ownership_percentages(&self) -> HashMap<String, f64> {
        let ownership = self.ownership();
        let total: usize = ownership.values().sum();
        if total == 0 {
            return HashMap::new();
        }
        ownership
            .into_iter()
            .map(|(name, count)| (name, (count as f64 / total as f64) * 100.0))
            .collect()
    }

    /// A human-readable summary, suitable for logs or a debug endpoint.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        out.push_str("Ring Description:\n");
        out.push_str(&format!("  Members: {}\n", self.ring.member_count()));
        out.push_str(&format!("  Virtual nodes: {}\n", self.ring.vnode_count()));
        out.push_str(&format!("  Average load: {:.2}\n", self.ring.average_load()));

        let mut percentages: Vec<_> = self.ownership_percentages().into_iter().collect();
        if !percentages.is_empty() {
            percentages.sort_by(|a, b| a.0.cmp(&b.0));
            out.push_str("\nMember Ownership:\n");
            let ownership = self.ownership();
            for (name, pct) in percentages {
                let count = ownership.get(&name).copied().unwrap_or(0);
                out.push_str(&format!("  {name}: {count} partitions ({pct:.2}%)\n"));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RingConfig;
    use crate::hasher::FnvHasher;
    use crate::member::StringMember;
    use std::sync::Arc;

    fn ring() -> Ring {
        let members = vec![
            Arc::new(StringMember::new("node1")) as _,
            Arc::new(StringMember::new("node2")) as _,
        ];
        Ring::new(members, RingConfig::new(Arc::new(FnvHasher), 0, 4, 1.25)).unwrap()
    }

    #[test]
    fn ownership_sums_to_partition_count() {
        let ring = ring();
        let topology = Topology::new(&ring);
        let total: usize = topology.ownership().values().sum();
        assert_eq!(total, ring.config().partition_count());
    }

    #[test]
    fn percentages_sum_to_roughly_one_hundred() {
        let ring = ring();
        let topology = Topology::new(&ring);
        let total: f64 = topology.ownership_percentages().values().sum();
        assert!((total - 100.0).abs() < 0.01);
    }

    #[test]
    fn describe_mentions_members() {
        let ring = ring();
        let description = Topology::new(&ring).describe();
        assert!(description.contains("node1"));
        assert!(description.contains("Members: 2"));
    }
}
