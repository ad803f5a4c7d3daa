//! Diagnostic allocation counters.
//!
//! Counters are atomics so a `'static` allocator can expose them through
//! a shared reference. They are never used for correctness.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Running totals of allocator calls.
///
/// The allocator wrappers bump a counter before checking whether the
/// strategy succeeded, so the values count attempts.
#[derive(Debug, Default)]
pub struct AllocStats {
    allocations: AtomicU64,
    reallocations: AtomicU64,
    deallocations: AtomicU64,
}

impl AllocStats {
    /// Fresh counters, all zero.
    pub const fn new() -> Self {
        Self {
            allocations: AtomicU64::new(0),
            reallocations: AtomicU64::new(0),
            deallocations: AtomicU64::new(0),
        }
    }

    /// Record an allocation attempt and return its 1-based sequence number.
    pub fn record_allocation(&self) -> u64 {
        self.allocations.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Record a reallocation attempt and return its 1-based sequence number.
    pub fn record_reallocation(&self) -> u64 {
        self.reallocations.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Record a deallocation and return its 1-based sequence number.
    pub fn record_deallocation(&self) -> u64 {
        self.deallocations.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Allocation attempts so far.
    pub fn allocations(&self) -> u64 {
        self.allocations.load(Ordering::Relaxed)
    }

    /// Reallocation attempts so far.
    pub fn reallocations(&self) -> u64 {
        self.reallocations.load(Ordering::Relaxed)
    }

    /// Deallocations so far.
    pub fn deallocations(&self) -> u64 {
        self.deallocations.load(Ordering::Relaxed)
    }

    /// A point-in-time copy of all three counters.
    pub fn counts(&self) -> AllocCounts {
        AllocCounts {
            allocations: self.allocations(),
            reallocations: self.reallocations(),
            deallocations: self.deallocations(),
        }
    }
}

/// Snapshot of [`AllocStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocCounts {
    /// Allocation attempts.
    pub allocations: u64,
    /// Reallocation attempts.
    pub reallocations: u64,
    /// Deallocations.
    pub deallocations: u64,
}

impl AllocCounts {
    /// Counter deltas between an earlier snapshot and this one.
    pub fn since(&self, earlier: &AllocCounts) -> AllocCounts {
        AllocCounts {
            allocations: self.allocations - earlier.allocations,
            reallocations: self.reallocations - earlier.reallocations,
            deallocations: self.deallocations - earlier.deallocations,
        }
    }
}

impl fmt::Display for AllocCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} allocations, {} reallocations, {} deallocations",
            self.allocations, self.reallocations, self.deallocations
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_start_at_one() {
        let stats = AllocStats::new();
        assert_eq!(stats.record_allocation(), 1);
        assert_eq!(stats.record_allocation(), 2);
        assert_eq!(stats.record_reallocation(), 1);
        assert_eq!(stats.allocations(), 2);
        assert_eq!(stats.deallocations(), 0);
    }

    #[test]
    fn counts_since_subtracts() {
        let stats = AllocStats::new();
        stats.record_allocation();
        let before = stats.counts();
        stats.record_allocation();
        stats.record_deallocation();
        let delta = stats.counts().since(&before);
        assert_eq!(
            delta,
            AllocCounts {
                allocations: 1,
                reallocations: 0,
                deallocations: 1,
            }
        );
    }
}
