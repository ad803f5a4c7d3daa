//! Test utilities and fixtures for Pawn development.
//!
//! Provides [`RecordingAllocator`], an [`Allocator`] decorator that logs
//! every call and tracks outstanding blocks, plus placeholder game data
//! in [`fixtures`] for exercising arrays the way the client uses them.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::RefCell;
use std::ptr::NonNull;

use indexmap::IndexMap;
use pawn_alloc::Allocator;
use pawn_core::{AllocError, AllocStats, CallerInfo};

/// One call observed by a [`RecordingAllocator`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Allocate {
        type_name: &'static str,
        count: usize,
        size: usize,
    },
    Reallocate {
        type_name: &'static str,
        old_count: usize,
        new_count: usize,
        size: usize,
        moved: bool,
    },
    Deallocate {
        tracked: bool,
    },
    /// `deallocate(None)`.
    DeallocateAll,
    /// The inner strategy refused the request.
    Failed {
        error: AllocError,
    },
}

/// Wraps another allocator, recording each call and the blocks it has
/// handed out but not yet freed.
///
/// Requests are forwarded to the inner strategy's `try_*` methods, so the
/// inner allocator's counters stay untouched; this wrapper's own
/// [`AllocStats`] count the calls instead.
pub struct RecordingAllocator<'a> {
    inner: &'a dyn Allocator,
    stats: AllocStats,
    calls: RefCell<Vec<Call>>,
    /// Block address → byte length, in allocation order.
    outstanding: RefCell<IndexMap<usize, usize>>,
}

impl<'a> RecordingAllocator<'a> {
    pub fn new(inner: &'a dyn Allocator) -> Self {
        Self {
            inner,
            stats: AllocStats::new(),
            calls: RefCell::new(Vec::new()),
            outstanding: RefCell::new(IndexMap::new()),
        }
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Number of blocks allocated and not yet freed.
    pub fn outstanding_blocks(&self) -> usize {
        self.outstanding.borrow().len()
    }

    /// Total bytes held by outstanding blocks.
    pub fn outstanding_bytes(&self) -> usize {
        self.outstanding.borrow().values().sum()
    }

    /// Byte lengths of outstanding blocks, oldest first.
    pub fn outstanding_sizes(&self) -> Vec<usize> {
        self.outstanding.borrow().values().copied().collect()
    }

    /// Whether every allocated block has been freed.
    pub fn is_balanced(&self) -> bool {
        self.outstanding.borrow().is_empty()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn track(&self, ptr: NonNull<u8>, bytes: usize) {
        self.outstanding
            .borrow_mut()
            .insert(ptr.as_ptr() as usize, bytes);
    }

    fn untrack(&self, ptr: NonNull<u8>) -> bool {
        self.outstanding
            .borrow_mut()
            .shift_remove(&(ptr.as_ptr() as usize))
            .is_some()
    }
}

#[allow(unsafe_code)]
impl Allocator for RecordingAllocator<'_> {
    fn stats(&self) -> &AllocStats {
        &self.stats
    }

    fn try_allocate(
        &self,
        count: usize,
        size: usize,
        caller: &CallerInfo,
    ) -> Result<NonNull<u8>, AllocError> {
        match self.inner.try_allocate(count, size, caller) {
            Ok(ptr) => {
                self.track(ptr, count * size);
                self.record(Call::Allocate {
                    type_name: caller.type_name,
                    count,
                    size,
                });
                Ok(ptr)
            }
            Err(error) => {
                self.record(Call::Failed { error });
                Err(error)
            }
        }
    }

    unsafe fn try_reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old_count: usize,
        new_count: usize,
        size: usize,
        caller: &CallerInfo,
    ) -> Result<NonNull<u8>, AllocError> {
        // SAFETY: forwarded caller contract.
        let result = unsafe { self.inner.try_reallocate(ptr, old_count, new_count, size, caller) };
        match result {
            Ok(new_ptr) => {
                if let Some(old) = ptr {
                    self.untrack(old);
                }
                self.track(new_ptr, new_count * size);
                self.record(Call::Reallocate {
                    type_name: caller.type_name,
                    old_count,
                    new_count,
                    size,
                    moved: ptr != Some(new_ptr),
                });
                Ok(new_ptr)
            }
            Err(error) => {
                self.record(Call::Failed { error });
                Err(error)
            }
        }
    }

    unsafe fn try_deallocate(&self, ptr: Option<NonNull<u8>>, caller: &CallerInfo) {
        // SAFETY: forwarded caller contract.
        unsafe { self.inner.try_deallocate(ptr, caller) };
        match ptr {
            Some(p) => {
                let tracked = self.untrack(p);
                self.record(Call::Deallocate { tracked });
            }
            None => self.record(Call::DeallocateAll),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawn_alloc::{LinearAllocator, SystemAllocator};
    use pawn_array::Array;

    #[test]
    fn records_array_lifecycle() {
        let system = SystemAllocator::new();
        let rec = RecordingAllocator::new(&system);

        let mut a = Array::<u32>::new(&rec, 2);
        assert_eq!(rec.outstanding_bytes(), 8);
        a.resize(4);
        assert_eq!(rec.outstanding_sizes(), vec![16]);
        assert!(a.release());
        assert!(rec.is_balanced());

        let calls = rec.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(
            calls[0],
            Call::Allocate {
                count: 2,
                size: 4,
                ..
            }
        ));
        assert!(matches!(
            calls[1],
            Call::Reallocate {
                old_count: 2,
                new_count: 4,
                ..
            }
        ));
        assert_eq!(calls[2], Call::Deallocate { tracked: true });
        assert_eq!(rec.stats().counts().allocations, 1);
        assert_eq!(system.stats().counts().allocations, 0);
    }

    #[test]
    fn arena_in_place_growth_is_not_a_move() {
        let mut buffer = [0u8; 64];
        let arena = LinearAllocator::with_buffer(&mut buffer);
        let rec = RecordingAllocator::new(&arena);

        let mut a = Array::<u8>::new(&rec, 4);
        a.resize(8);
        assert!(matches!(rec.calls()[1], Call::Reallocate { moved: false, .. }));
        assert_eq!(rec.outstanding_blocks(), 1);
    }

    #[test]
    fn refused_requests_are_recorded() {
        let mut buffer = [0u8; 4];
        let arena = LinearAllocator::with_buffer(&mut buffer);
        let rec = RecordingAllocator::new(&arena);

        let err = rec.try_allocate(8, 1, &pawn_core::caller!(u8)).unwrap_err();
        assert_eq!(rec.calls(), vec![Call::Failed { error: err }]);
        assert!(rec.is_balanced());
    }
}
