//! The allocator capability trait and its fatal-on-failure wrappers.
//!
//! Strategies implement three `try_*` methods. Callers use the provided
//! wrappers ([`Allocator::allocate`], [`Allocator::reallocate`],
//! [`Allocator::deallocate`]), which count every call, log it in debug
//! builds, and never hand back a failure.

use std::alloc::{handle_alloc_error, Layout};
use std::mem;
use std::ptr::NonNull;

use pawn_core::{AllocError, AllocStats, CallerInfo, MAX_ALIGN};

/// A swappable strategy for obtaining raw memory blocks.
///
/// Sizes are expressed as `count` elements of `size` bytes each. All
/// methods take `&self`: strategies keep their mutable state in cells or
/// atomics so that any number of containers can share one allocator
/// reference.
#[allow(unsafe_code)]
pub trait Allocator {
    /// Call counters for this allocator instance.
    fn stats(&self) -> &AllocStats;

    /// Obtain an uninitialised block for `count * size` bytes.
    fn try_allocate(
        &self,
        count: usize,
        size: usize,
        caller: &CallerInfo,
    ) -> Result<NonNull<u8>, AllocError>;

    /// Resize a block to hold `new_count * size` bytes.
    ///
    /// `None` behaves like [`Allocator::try_allocate`] for `new_count`.
    /// Contents up to `min(old_count, new_count) * size` bytes are
    /// preserved; the block may move.
    ///
    /// # Safety
    ///
    /// `ptr` must be `None` or a live block returned by this allocator
    /// that currently spans `old_count * size` bytes. On success the old
    /// pointer must no longer be used unless it equals the returned one.
    unsafe fn try_reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old_count: usize,
        new_count: usize,
        size: usize,
        caller: &CallerInfo,
    ) -> Result<NonNull<u8>, AllocError>;

    /// Return a block to the strategy.
    ///
    /// The meaning of `None` is strategy-specific: the system heap ignores
    /// it, an arena treats it as "reset everything".
    ///
    /// # Safety
    ///
    /// `ptr` must be `None` or a live block returned by this allocator.
    /// For strategies where `None` releases every block, no block handed
    /// out earlier may be used afterwards.
    unsafe fn try_deallocate(&self, ptr: Option<NonNull<u8>>, caller: &CallerInfo);

    /// Allocate `count * size` bytes, aborting if the strategy fails.
    fn allocate(&self, count: usize, size: usize, caller: &CallerInfo) -> NonNull<u8> {
        let result = self.try_allocate(count, size, caller);
        let seq = self.stats().record_allocation();

        match result {
            Ok(ptr) => {
                diag!(
                    trace,
                    allocation = seq,
                    type_name = caller.type_name,
                    count,
                    size,
                    bytes = count.saturating_mul(size),
                    ptr = ?ptr,
                    site = %caller,
                    "allocated"
                );
                ptr
            }
            Err(err) => fatal("allocation", seq, err, caller),
        }
    }

    /// Reallocate a block, aborting if the strategy fails.
    ///
    /// # Safety
    ///
    /// Same contract as [`Allocator::try_reallocate`].
    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old_count: usize,
        new_count: usize,
        size: usize,
        caller: &CallerInfo,
    ) -> NonNull<u8> {
        // SAFETY: forwarded caller contract.
        let result = unsafe { self.try_reallocate(ptr, old_count, new_count, size, caller) };
        let seq = self.stats().record_reallocation();

        match result {
            Ok(new_ptr) => {
                diag!(
                    trace,
                    reallocation = seq,
                    type_name = caller.type_name,
                    old_count,
                    new_count,
                    size,
                    old_ptr = ?ptr,
                    new_ptr = ?new_ptr,
                    site = %caller,
                    "reallocated"
                );
                new_ptr
            }
            Err(err) => fatal("reallocation", seq, err, caller),
        }
    }

    /// Release a block.
    ///
    /// # Safety
    ///
    /// Same contract as [`Allocator::try_deallocate`].
    unsafe fn deallocate(&self, ptr: Option<NonNull<u8>>, caller: &CallerInfo) {
        // SAFETY: forwarded caller contract.
        unsafe { self.try_deallocate(ptr, caller) };
        #[cfg_attr(not(debug_assertions), allow(unused_variables))]
        let seq = self.stats().record_deallocation();
        diag!(trace, deallocation = seq, ptr = ?ptr, site = %caller, "deallocated");
    }
}

/// Total byte length of `count` elements of `size` bytes.
pub(crate) fn byte_len(count: usize, size: usize) -> Result<usize, AllocError> {
    count
        .checked_mul(size)
        .filter(|&bytes| bytes <= isize::MAX as usize)
        .ok_or(AllocError::SizeOverflow { count, size })
}

#[cold]
#[inline(never)]
fn fatal(op: &str, seq: u64, err: AllocError, caller: &CallerInfo) -> ! {
    diag!(error, attempt = seq, error = %err, site = %caller, "{op} failed");
    match err.requested_bytes().map(|bytes| Layout::from_size_align(bytes, 1)) {
        Some(Ok(layout)) => handle_alloc_error(layout),
        _ => panic!("{op} #{seq} failed at {caller}: {err}"),
    }
}

/// Allocate storage for `count` values of `T`.
///
/// # Panics
///
/// Panics if `T` is zero-sized or needs more than [`MAX_ALIGN`] alignment.
pub fn allocate_array<T>(
    allocator: &dyn Allocator,
    count: usize,
    caller: &CallerInfo,
) -> NonNull<T> {
    check_element::<T>();
    let ptr = allocator.allocate(count, mem::size_of::<T>(), caller).cast::<T>();
    debug_assert!(ptr.is_aligned(), "allocator returned a misaligned block");
    ptr
}

/// Resize storage for values of `T` from `old_count` to `new_count`.
///
/// # Safety
///
/// `ptr` must be `None` or a live block from `allocator` holding
/// `old_count` values of `T`.
#[allow(unsafe_code)]
pub unsafe fn reallocate_array<T>(
    allocator: &dyn Allocator,
    ptr: Option<NonNull<T>>,
    old_count: usize,
    new_count: usize,
    caller: &CallerInfo,
) -> NonNull<T> {
    check_element::<T>();
    // SAFETY: forwarded caller contract.
    let ptr = unsafe {
        allocator.reallocate(
            ptr.map(NonNull::cast),
            old_count,
            new_count,
            mem::size_of::<T>(),
            caller,
        )
    }
    .cast::<T>();
    debug_assert!(ptr.is_aligned(), "allocator returned a misaligned block");
    ptr
}

/// Release storage for values of `T`.
///
/// # Safety
///
/// `ptr` must be `None` or a live block from `allocator`.
#[allow(unsafe_code)]
pub unsafe fn deallocate_array<T>(
    allocator: &dyn Allocator,
    ptr: Option<NonNull<T>>,
    caller: &CallerInfo,
) {
    // SAFETY: forwarded caller contract.
    unsafe { allocator.deallocate(ptr.map(NonNull::cast), caller) }
}

fn check_element<T>() {
    assert!(
        mem::size_of::<T>() > 0,
        "zero-sized element type {} cannot be allocated",
        std::any::type_name::<T>()
    );
    assert!(
        mem::align_of::<T>() <= MAX_ALIGN,
        "element type {} needs alignment above {MAX_ALIGN}",
        std::any::type_name::<T>()
    );
}

/// Allocate `count` values of a type: `alloc!(allocator, count, T)`.
///
/// Evaluates to `NonNull<T>` and records the call site.
#[macro_export]
macro_rules! alloc {
    ($allocator:expr, $count:expr, $t:ty) => {
        $crate::allocate_array::<$t>($allocator, $count, &$crate::__core::caller!($t))
    };
}

/// Reallocate typed storage: `realloc!(allocator, ptr, old, new, T)`.
///
/// Expands to a call to the `unsafe` [`reallocate_array`]; use it inside
/// an `unsafe` block.
#[macro_export]
macro_rules! realloc {
    ($allocator:expr, $ptr:expr, $old:expr, $new:expr, $t:ty) => {
        $crate::reallocate_array::<$t>(
            $allocator,
            ::core::option::Option::Some($ptr),
            $old,
            $new,
            &$crate::__core::caller!($t),
        )
    };
}

/// Release typed storage: `free!(allocator, ptr)`.
///
/// Expands to a call to the `unsafe` [`deallocate_array`]; use it inside
/// an `unsafe` block.
#[macro_export]
macro_rules! free {
    ($allocator:expr, $ptr:expr) => {
        $crate::deallocate_array(
            $allocator,
            ::core::option::Option::Some($ptr),
            &$crate::__core::caller!(),
        )
    };
}
