//! Deterministic workloads for benchmarking the Pawn memory layer.
//!
//! - [`frame_requests`]: a seeded stream of per-frame allocation requests
//! - [`arena_capacity_for`]: worst-case arena size for a request stream
//! - [`search_keys`]: seeded lookup keys for array search benchmarks

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use pawn_core::MAX_ALIGN;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One allocation request: `count` elements of `size` bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Request {
    /// Element count, at least 1.
    pub count: usize,
    /// Element size: a power of two up to [`MAX_ALIGN`].
    pub size: usize,
}

impl Request {
    /// Payload length in bytes.
    pub fn bytes(&self) -> usize {
        self.count * self.size
    }
}

/// Generate `n` requests with element counts in `1..=max_count`.
///
/// Element sizes are drawn from `1, 2, 4, 8, 16`, matching the mix of
/// bytes, scalars, and small structs a frame allocates.
pub fn frame_requests(seed: u64, n: usize, max_count: usize) -> Vec<Request> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let shifts = MAX_ALIGN.trailing_zeros() + 1;
    (0..n)
        .map(|_| Request {
            count: 1 + (rng.next_u64() as usize) % max_count.max(1),
            size: 1 << (rng.next_u32() % shifts),
        })
        .collect()
}

/// Arena capacity that fits `requests` in order, whatever the base address.
///
/// Each request may need up to `size - 1` bytes of padding.
pub fn arena_capacity_for(requests: &[Request]) -> usize {
    requests.iter().map(|r| r.bytes() + r.size - 1).sum()
}

/// `n` keys in `0..range`.
pub fn search_keys(seed: u64, n: usize, range: u32) -> Vec<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.next_u32() % range.max(1)).collect()
}
