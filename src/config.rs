//! Ring configuration and construction-time validation.

use crate::error::{Error, Result};
use crate::hasher::Hasher;
use std::sync::Arc;

/// Default partition count (`P`). Typically a prime, to avoid structural bias
/// when partition ids are reduced modulo member-derived quantities.
pub const DEFAULT_PARTITION_COUNT: usize = 271;

/// Default replication factor (`R`): virtual nodes per member.
pub const DEFAULT_REPLICATION_FACTOR: usize = 20;

/// Default load factor (`L`): slack between average and per-member cap.
pub const DEFAULT_LOAD_FACTOR: f64 = 1.25;

/// Configuration for a [`crate::ring::Ring`].
///
/// `partition_count`, `replication_factor`, and `load_factor` of `0` adopt
/// their defaults; a missing hasher is rejected at [`RingConfig::new`] time
/// rather than deferred to first use.
#[derive(Clone)]
pub struct RingConfig {
    pub(crate) hasher: Arc<dyn Hasher>,
    pub(crate) partition_count: usize,
    pub(crate) replication_factor: usize,
    pub(crate) load_factor: f64,
}

impl RingConfig {
    /// Builds a configuration with the given hasher, filling in defaults for
    /// any zero-valued `partition_count`/`replication_factor`/`load_factor`.
    pub fn new(
        hasher: Arc<dyn Hasher>,
        partition_count: usize,
        replication_factor: usize,
        load_factor: f64,
    ) -> Self {
        Self {
            hasher,
            partition_count: if partition_count == 0 {
                DEFAULT_PARTITION_COUNT
            } else {
                partition_count
            },
            replication_factor: if replication_factor == 0 {
                DEFAULT_REPLICATION_FACTOR
            } else {
                replication_factor
            },
            load_factor: if load_factor == 0.0 {
                DEFAULT_LOAD_FACTOR
            } else {
                load_factor
            },
        }
    }

    /// Builds a configuration using every default.
    pub fn with_hasher(hasher: Arc<dyn Hasher>) -> Self {
        Self::new(hasher, 0, 0, 0.0)
    }

    pub fn partition_count(&self) -> usize {
        self.partition_count
    }

    pub fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// The per-member placement cap, `⌈(P/M) · L⌉`, for `member_count` live
    /// members. `M = 0` has no cap (there is nothing to place).
    pub fn cap_for(&self, member_count: usize) -> usize {
        if member_count == 0 {
            return 0;
        }
        ((self.partition_count as f64 / member_count as f64) * self.load_factor).ceil() as usize
    }

    /// The uncapped target load, `(P/M) · L`, or `0.0` when `M = 0`. This is
    /// the number `average_load()` reports; it is deliberately not ceiled,
    /// unlike `cap_for`, since callers of `average_load` want the target, not
    /// the enforced maximum.
    pub fn average_load_for(&self, member_count: usize) -> f64 {
        if member_count == 0 {
            return 0.0;
        }
        (self.partition_count as f64 / member_count as f64) * self.load_factor
    }

    /// Validates the configuration against a prospective member count,
    /// rejecting it if the bounded-load cap would exceed the number of ring
    /// positions any single member occupies (`2R`).
    pub(crate) fn validate(&self, member_count: usize) -> Result<()> {
        if member_count == 0 {
            return Ok(());
        }
        let expected_cap = self.cap_for(member_count);
        let max_cap = 2 * self.replication_factor;
        if expected_cap > max_cap {
            return Err(Error::Config {
                partition_count: self.partition_count,
                member_count,
                load_factor: self.load_factor,
                expected_cap,
                max_cap,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for RingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingConfig")
            .field("partition_count", &self.partition_count)
            .field("replication_factor", &self.replication_factor)
            .field("load_factor", &self.load_factor)
            .finish()
    }
}
