//! Allocator abstraction for the Pawn game client.
//!
//! Every container in the client obtains memory through an
//! [`Allocator`] reference rather than from the global heap, so a
//! subsystem can be pointed at the process heap or at a bump arena
//! without code changes. This crate is the only one besides
//! `pawn-array` that may contain `unsafe` code.
//!
//! # Architecture
//!
//! ```text
//! dyn Allocator (capability: try_allocate / try_reallocate / try_deallocate)
//! │             (wrappers:   allocate / reallocate / deallocate + AllocStats)
//! ├── SystemAllocator  → libc malloc / realloc / free, one 'static default
//! └── LinearAllocator  → bump cursor over one backing buffer
//!     └── ArenaScope   → clears the arena when dropped
//! ```
//!
//! # Failure policy
//!
//! The `try_*` methods report failure as an [`AllocError`](pawn_core::AllocError).
//! The wrappers treat any failure as fatal: exhaustion goes through
//! [`std::alloc::handle_alloc_error`], which aborts the process. Misuse
//! (non power-of-two element sizes on an arena, freeing a single block
//! through an arena, double `deinit`) panics.
//!
//! # Threading
//!
//! [`SystemAllocator`] is `Sync`; thread safety is that of the C heap.
//! [`LinearAllocator`] keeps its cursor in `Cell`s and is therefore not
//! `Sync`: share it across threads only behind external locking.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Emit an allocator diagnostic in debug builds only.
macro_rules! diag {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(debug_assertions)]
        {
            ::tracing::$level!(target: "pawn_alloc", $($arg)+);
        }
    };
}

pub mod allocator;
pub mod config;
pub mod linear;
mod raw;
pub mod scope;
pub mod system;

#[doc(hidden)]
pub use pawn_core as __core;

// Public re-exports for the primary API surface.
pub use allocator::{allocate_array, deallocate_array, reallocate_array, Allocator};
pub use config::ArenaConfig;
pub use linear::{ArenaState, LinearAllocator};
pub use scope::ArenaScope;
pub use system::SystemAllocator;
