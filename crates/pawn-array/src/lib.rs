//! Typed dynamic arrays for the Pawn game client.
//!
//! [`Array`] is a contiguous, capacity-bounded sequence of plain-data
//! values whose storage comes from a borrowed
//! [`Allocator`](pawn_alloc::Allocator). It never grows implicitly:
//! appending to a full array fails and the caller resizes explicitly.
//!
//! ```
//! use pawn_alloc::SystemAllocator;
//! use pawn_array::Array;
//!
//! let mut name = Array::<u8>::new(SystemAllocator::global(), 3);
//! assert!(name.append(b'h'));
//! assert!(name.append(b'i'));
//! assert!(name.append(0));
//! assert!(!name.append(b'!'));
//!
//! name.resize(7);
//! assert!(name.append(b'!'));
//! assert_eq!(name.len(), 4);
//! name.release();
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod file;
pub mod scoped;

pub use array::Array;
pub use file::{read_file_bytes, LoadError};
pub use scoped::ScopedArray;
