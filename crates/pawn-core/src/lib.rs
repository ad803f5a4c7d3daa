//! Core types for the Pawn memory layer.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the allocator and container crates:
//! call-site metadata, diagnostic counters, error types, and the
//! alignment arithmetic used by bump allocation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod caller;
pub mod error;
pub mod layout;
pub mod stats;

pub use caller::CallerInfo;
pub use error::{AllocError, ConfigError};
pub use layout::{align_up, is_power_of_two, MAX_ALIGN};
pub use stats::{AllocCounts, AllocStats};

/// Capacity of the per-frame ("hot") arena used by the game client: 64 KiB.
pub const HOT_ARENA_CAPACITY: usize = 64 * 1024;

/// Capacity of the long-lived ("cold") arena used by the game client: 256 KiB.
pub const COLD_ARENA_CAPACITY: usize = 256 * 1024;
