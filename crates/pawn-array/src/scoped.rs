//! Array guard that releases its storage when it goes out of scope.

use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};

use pawn_alloc::Allocator;

use crate::array::Array;

/// An [`Array`] whose storage is released on drop.
///
/// Only useful with allocators that free individual blocks, such as the
/// system heap; releasing arena storage panics. Arena-backed arrays are
/// scoped with an [`ArenaScope`](pawn_alloc::ArenaScope) instead.
pub struct ScopedArray<'a, T: Copy> {
    inner: Array<'a, T>,
}

impl<'a, T: Copy> ScopedArray<'a, T> {
    /// Create a guarded array with room for `capacity` elements.
    #[track_caller]
    pub fn new(allocator: &'a dyn Allocator, capacity: usize) -> Self {
        Self {
            inner: Array::new(allocator, capacity),
        }
    }

    /// Take ownership of an existing array.
    pub fn from_array(inner: Array<'a, T>) -> Self {
        Self { inner }
    }

    /// Disarm the guard and hand the array back to the caller, who becomes
    /// responsible for releasing it.
    pub fn into_inner(mut self) -> Array<'a, T> {
        // A zero-capacity array holds no storage, so the guard's drop is a no-op.
        let empty = Array::new(self.inner.allocator(), 0);
        mem::replace(&mut self.inner, empty)
    }
}

impl<'a, T: Copy> Deref for ScopedArray<'a, T> {
    type Target = Array<'a, T>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: Copy> DerefMut for ScopedArray<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<T: Copy> Drop for ScopedArray<'_, T> {
    fn drop(&mut self) {
        self.inner.release();
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for ScopedArray<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScopedArray").field(&self.inner).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawn_alloc::SystemAllocator;

    #[test]
    fn drop_releases_storage() {
        let system = SystemAllocator::new();
        {
            let mut a = ScopedArray::<u32>::new(&system, 4);
            assert!(a.append(1));
            assert!(a.append(2));
            assert_eq!(a.as_slice(), &[1, 2]);
        }
        let counts = system.stats().counts();
        assert_eq!(counts.allocations, 1);
        assert_eq!(counts.deallocations, 1);
    }

    #[test]
    fn drop_after_manual_release_frees_once() {
        let system = SystemAllocator::new();
        {
            let mut a = ScopedArray::<u8>::new(&system, 4);
            assert!(a.release());
        }
        assert_eq!(system.stats().deallocations(), 1);
    }

    #[test]
    fn into_inner_disarms_the_guard() {
        let system = SystemAllocator::new();
        let scoped = ScopedArray::<u8>::new(&system, 2);
        let mut array = scoped.into_inner();
        assert_eq!(system.stats().deallocations(), 0);
        assert!(array.release());
        assert_eq!(system.stats().deallocations(), 1);
    }

    #[test]
    fn resize_through_guard() {
        let system = SystemAllocator::new();
        let mut a = ScopedArray::from_array(Array::<u16>::new(&system, 1));
        assert!(a.append(10));
        assert!(!a.append(11));
        a.resize(2);
        assert!(a.append(11));
        assert_eq!(a[1], 11);
    }
}
