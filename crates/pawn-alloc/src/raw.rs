//! Low-level primitives for heap and byte operations.
//!
//! Every `unsafe` call into libc or `core::ptr` used by the strategies
//! lives here, each with a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::ptr::NonNull;

/// Allocate `bytes` from the C heap. Zero-byte requests get one byte so a
/// successful result is always a distinct, freeable pointer.
pub(crate) fn heap_allocate(bytes: usize) -> Option<NonNull<u8>> {
    // SAFETY: malloc accepts any size and returns null or a block aligned
    // to alignof(max_align_t).
    let ptr = unsafe { libc::malloc(bytes.max(1)) };
    NonNull::new(ptr.cast::<u8>())
}

/// Resize a C heap block, preserving `min(old, new)` bytes.
///
/// # Safety
///
/// `ptr` must have been returned by [`heap_allocate`] or
/// [`heap_reallocate`] and not freed since.
pub(crate) unsafe fn heap_reallocate(ptr: NonNull<u8>, bytes: usize) -> Option<NonNull<u8>> {
    // SAFETY: caller guarantees ptr is a live malloc block. The size is
    // kept non-zero so realloc never acts as free.
    let ptr = unsafe { libc::realloc(ptr.as_ptr().cast::<libc::c_void>(), bytes.max(1)) };
    NonNull::new(ptr.cast::<u8>())
}

/// Return a block to the C heap.
///
/// # Safety
///
/// `ptr` must be a live block from [`heap_allocate`] / [`heap_reallocate`].
pub(crate) unsafe fn heap_free(ptr: NonNull<u8>) {
    // SAFETY: caller guarantees ptr is a live malloc block.
    unsafe { libc::free(ptr.as_ptr().cast::<libc::c_void>()) }
}

/// Copy `len` bytes between two non-overlapping regions.
///
/// # Safety
///
/// `src` must be readable and `dst` writable for `len` bytes, and the
/// regions must not overlap.
pub(crate) unsafe fn copy_bytes(src: NonNull<u8>, dst: NonNull<u8>, len: usize) {
    // SAFETY: upheld by the caller.
    unsafe { std::ptr::copy_nonoverlapping(src.as_ptr(), dst.as_ptr(), len) }
}

/// Fill `len` bytes at `dst` with zero.
///
/// # Safety
///
/// `dst` must be writable for `len` bytes.
pub(crate) unsafe fn zero_bytes(dst: NonNull<u8>, len: usize) {
    // SAFETY: upheld by the caller.
    unsafe { std::ptr::write_bytes(dst.as_ptr(), 0, len) }
}

/// Pointer `offset` bytes past `start`.
///
/// # Safety
///
/// `start + offset` must stay within (or one past) the allocation `start`
/// belongs to.
pub(crate) unsafe fn offset(start: NonNull<u8>, offset: usize) -> NonNull<u8> {
    // SAFETY: upheld by the caller; an in-bounds offset of a non-null
    // pointer is non-null.
    unsafe { start.add(offset) }
}
