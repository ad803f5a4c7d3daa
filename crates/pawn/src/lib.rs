//! Pawn: the memory layer of a desktop chess client.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Pawn sub-crates. For most users, adding `pawn` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use pawn::prelude::*;
//!
//! // Heap-backed array: created with a fixed capacity, grown explicitly.
//! let mut moves = Array::<u16>::new(SystemAllocator::global(), 2);
//! assert!(moves.append(0x0c1c));
//! assert!(moves.append(0x3424));
//! assert!(!moves.append(0x0615));
//! moves.resize(4);
//! assert!(moves.append(0x0615));
//! moves.release();
//!
//! // Per-frame scratch: everything allocated in the scope is dropped at once.
//! let mut arena = LinearAllocator::from_config(SystemAllocator::global(), &ArenaConfig::hot())
//!     .unwrap();
//! {
//!     let frame = arena.scope();
//!     let mut labels = Array::<u8>::new(&*frame, 64);
//!     assert!(labels.extend_from_slice(b"e2e4"));
//!     assert_eq!(frame.occupied(), 64);
//! }
//! assert_eq!(arena.occupied(), 0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `pawn-core` | Caller metadata, counters, errors, alignment math |
//! | [`alloc`] | `pawn-alloc` | `Allocator` trait, system and linear strategies, arena scopes |
//! | [`array`] | `pawn-array` | `Array`, `ScopedArray`, whole-file loading |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types shared by every layer (`pawn-core`).
///
/// Contains [`types::CallerInfo`] and the `caller!` macro, the
/// [`types::AllocStats`] counters, and the error enums.
pub use pawn_core as types;

/// Allocator strategies (`pawn-alloc`).
///
/// The [`alloc::Allocator`] trait with [`alloc::SystemAllocator`] and
/// [`alloc::LinearAllocator`], plus [`alloc::ArenaScope`] for
/// scope-bounded arena use.
pub use pawn_alloc as alloc;

/// Typed arrays (`pawn-array`).
///
/// [`array::Array`], [`array::ScopedArray`], and
/// [`array::read_file_bytes`].
pub use pawn_array as array;

/// Common imports for typical Pawn usage.
///
/// ```rust
/// use pawn::prelude::*;
/// ```
pub mod prelude {
    // Allocators
    pub use pawn_alloc::{Allocator, ArenaConfig, ArenaScope, LinearAllocator, SystemAllocator};

    // Arrays
    pub use pawn_array::{read_file_bytes, Array, ScopedArray};

    // Diagnostics and errors
    pub use pawn_core::{caller, AllocError, AllocStats, CallerInfo, ConfigError};
    pub use pawn_array::LoadError;
}
