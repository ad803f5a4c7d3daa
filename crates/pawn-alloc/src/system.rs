//! The pass-through system heap strategy.

use std::ptr::NonNull;

use pawn_core::{AllocError, AllocStats, CallerInfo};

use crate::allocator::{byte_len, Allocator};
use crate::raw;

/// Process-wide default instance, alive until exit.
static GLOBAL: SystemAllocator = SystemAllocator::new();

/// Allocator backed directly by the C heap (`malloc` / `realloc` / `free`).
///
/// Every block is aligned to [`MAX_ALIGN`](pawn_core::MAX_ALIGN). There is
/// no bookkeeping beyond the call counters.
///
/// Components should receive an `&dyn Allocator` from their owner rather
/// than calling [`SystemAllocator::global`] themselves; the global exists
/// so top-level code has a default to hand out.
#[derive(Debug, Default)]
pub struct SystemAllocator {
    stats: AllocStats,
}

impl SystemAllocator {
    /// A fresh system allocator with its own counters.
    pub const fn new() -> Self {
        Self {
            stats: AllocStats::new(),
        }
    }

    /// The shared `'static` instance.
    pub fn global() -> &'static SystemAllocator {
        &GLOBAL
    }
}

#[allow(unsafe_code)]
impl Allocator for SystemAllocator {
    fn stats(&self) -> &AllocStats {
        &self.stats
    }

    fn try_allocate(
        &self,
        count: usize,
        size: usize,
        _caller: &CallerInfo,
    ) -> Result<NonNull<u8>, AllocError> {
        let bytes = byte_len(count, size)?;
        raw::heap_allocate(bytes).ok_or(AllocError::OutOfMemory { bytes })
    }

    unsafe fn try_reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        _old_count: usize,
        new_count: usize,
        size: usize,
        caller: &CallerInfo,
    ) -> Result<NonNull<u8>, AllocError> {
        let Some(ptr) = ptr else {
            return self.try_allocate(new_count, size, caller);
        };
        let bytes = byte_len(new_count, size)?;
        // SAFETY: caller guarantees ptr is a live block from this allocator,
        // i.e. from malloc/realloc.
        unsafe { raw::heap_reallocate(ptr, bytes) }.ok_or(AllocError::OutOfMemory { bytes })
    }

    unsafe fn try_deallocate(&self, ptr: Option<NonNull<u8>>, _caller: &CallerInfo) {
        if let Some(ptr) = ptr {
            // SAFETY: caller guarantees ptr is a live block from this allocator.
            unsafe { raw::heap_free(ptr) }
        }
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use pawn_core::{caller, MAX_ALIGN};

    #[test]
    fn global_is_a_single_instance() {
        assert!(std::ptr::eq(
            SystemAllocator::global(),
            SystemAllocator::global()
        ));
    }

    #[test]
    fn grow_preserves_contents() {
        let a = SystemAllocator::new();
        let buffer = crate::alloc!(&a, 16, u8);
        unsafe {
            buffer.as_ptr().copy_from_nonoverlapping(b"Hello, world!\0".as_ptr(), 14);
            let buffer = crate::realloc!(&a, buffer, 16, 32, u8);
            let text = std::slice::from_raw_parts(buffer.as_ptr(), 14);
            assert_eq!(text, b"Hello, world!\0");
            crate::free!(&a, buffer);
        }
        assert_eq!(a.stats().counts().allocations, 1);
        assert_eq!(a.stats().counts().reallocations, 1);
        assert_eq!(a.stats().counts().deallocations, 1);
    }

    #[test]
    fn reallocate_from_none_allocates() {
        let a = SystemAllocator::new();
        let p = unsafe { a.reallocate(None, 0, 8, 4, &caller!(u32)) };
        unsafe { a.deallocate(Some(p), &caller!()) };
        assert_eq!(a.stats().reallocations(), 1);
        assert_eq!(a.stats().allocations(), 0);
    }

    #[test]
    fn blocks_are_max_aligned() {
        let a = SystemAllocator::new();
        let p = a.allocate(3, 1, &caller!(u8));
        assert_eq!(p.as_ptr() as usize % MAX_ALIGN, 0);
        unsafe { a.deallocate(Some(p), &caller!()) };
    }

    #[test]
    fn freeing_none_is_a_counted_noop() {
        let a = SystemAllocator::new();
        unsafe { a.deallocate(None, &caller!()) };
        assert_eq!(a.stats().deallocations(), 1);
    }

    #[test]
    fn oversized_request_is_reported_by_try_path() {
        let a = SystemAllocator::new();
        let err = a.try_allocate(usize::MAX / 2, 4, &caller!()).unwrap_err();
        assert!(matches!(err, AllocError::SizeOverflow { .. }));
    }
}
