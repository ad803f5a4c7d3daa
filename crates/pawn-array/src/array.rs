//! Capacity-bounded, allocator-backed array.
//!
//! [`Array`] never grows on its own: [`Array::append`] fails once the
//! array is full, and the owner decides when to call [`Array::resize`].
//! That keeps every allocation point visible, which matters for
//! arena-backed arrays where growth that cannot happen in place leaves
//! the old storage behind until the arena is cleared.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::panic::Location;
use std::ptr::NonNull;
use std::slice;

use pawn_alloc::{allocate_array, deallocate_array, reallocate_array, Allocator};
use pawn_core::CallerInfo;

/// A contiguous sequence of `T` stored in memory from a borrowed allocator.
///
/// Invariants: `len <= capacity`, and storage exists whenever
/// `capacity > 0`. Elements are plain data (`Copy`), so nothing is
/// dropped when the array is cleared or released.
///
/// Storage is released only by [`Array::release`]; dropping an array
/// without releasing it leaks its block (use [`ScopedArray`] to tie the
/// release to a scope). Arena-backed arrays are reclaimed by clearing the
/// arena instead, since arenas cannot free single blocks.
///
/// [`ScopedArray`]: crate::ScopedArray
pub struct Array<'a, T> {
    allocator: &'a dyn Allocator,
    data: Option<NonNull<T>>,
    capacity: usize,
    len: usize,
}

#[allow(unsafe_code)]
impl<'a, T: Copy> Array<'a, T> {
    /// Create an empty array with room for `capacity` elements.
    ///
    /// Storage is allocated eagerly; a capacity of zero allocates nothing.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized or over-aligned, and aborts if the
    /// allocator cannot satisfy the request.
    #[track_caller]
    pub fn new(allocator: &'a dyn Allocator, capacity: usize) -> Self {
        let data = (capacity > 0).then(|| {
            let caller = CallerInfo::located::<T>("Array::new", Location::caller());
            allocate_array::<T>(allocator, capacity, &caller)
        });
        Self {
            allocator,
            data,
            capacity,
            len: 0,
        }
    }

    /// Reallocate storage to hold `new_capacity` elements and return it.
    ///
    /// Goes through the allocator's reallocate contract, so an arena grows
    /// in place when this array holds its most recent block. Shrinking
    /// below the current length truncates the array.
    #[track_caller]
    pub fn resize(&mut self, new_capacity: usize) -> usize {
        let caller = CallerInfo::located::<T>("Array::resize", Location::caller());
        // SAFETY: data is None or the live block this array obtained from
        // self.allocator, sized for self.capacity elements.
        let data = unsafe {
            reallocate_array::<T>(
                self.allocator,
                self.data,
                self.capacity,
                new_capacity,
                &caller,
            )
        };
        self.data = Some(data);
        self.capacity = new_capacity;
        self.len = self.len.min(new_capacity);
        self.capacity
    }

    /// Append `item` if there is room. Returns `false`, leaving the array
    /// untouched, when it is full.
    #[must_use = "a full array rejects the item"]
    pub fn append(&mut self, item: T) -> bool {
        if self.len >= self.capacity {
            return false;
        }
        let Some(data) = self.data else {
            return false;
        };
        // SAFETY: len < capacity, so the slot is inside the block.
        unsafe { data.as_ptr().add(self.len).write(item) };
        self.len += 1;
        true
    }

    /// Append every item of `items`, or none of them if they do not all fit.
    #[must_use = "a full array rejects the items"]
    pub fn extend_from_slice(&mut self, items: &[T]) -> bool {
        if items.len() > self.remaining() {
            return false;
        }
        let Some(data) = self.data else {
            return items.is_empty();
        };
        // SAFETY: len + items.len() <= capacity, and `items` cannot alias
        // the uninitialised tail of our own block.
        unsafe {
            data.as_ptr()
                .add(self.len)
                .copy_from_nonoverlapping(items.as_ptr(), items.len());
        }
        self.len += items.len();
        true
    }

    /// Remove and return the last element, or `T::default()` if the array
    /// is empty. Check [`Array::is_empty`] first when the zero value is a
    /// valid element.
    pub fn pop(&mut self) -> T
    where
        T: Default,
    {
        if self.len == 0 {
            return T::default();
        }
        let item = self.as_slice()[self.len - 1];
        self.len -= 1;
        item
    }

    /// Forget all elements, keeping the storage.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Return the storage to the allocator.
    ///
    /// Returns `false`, leaving the array untouched, if there is no storage
    /// or the capacity is zero (a block kept after `resize(0)` stays with
    /// the array and is reused by the next resize). Afterwards the array is
    /// empty with zero capacity; [`Array::resize`] can give it storage
    /// again.
    ///
    /// # Panics
    ///
    /// Panics when the allocator cannot free individual blocks (an arena).
    #[track_caller]
    pub fn release(&mut self) -> bool {
        if self.capacity < 1 {
            return false;
        }
        let Some(data) = self.data.take() else {
            return false;
        };
        let caller = CallerInfo::located::<T>("Array::release", Location::caller());
        // SAFETY: data is the live block this array obtained from
        // self.allocator; it was taken out of self so it cannot be reused.
        unsafe { deallocate_array(self.allocator, Some(data), &caller) };
        self.len = 0;
        self.capacity = 0;
        true
    }

    /// Whether any element equals `item`.
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.as_slice().contains(item)
    }

    /// First element equal to `item`.
    pub fn find(&self, item: &T) -> Option<&T>
    where
        T: PartialEq,
    {
        self.as_slice().iter().find(|x| *x == item)
    }

    /// Mutable reference to the first element equal to `item`.
    pub fn find_mut(&mut self, item: &T) -> Option<&mut T>
    where
        T: PartialEq,
    {
        self.as_mut_slice().iter_mut().find(|x| **x == *item)
    }

    /// Element at `index`, if populated.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// The populated elements.
    pub fn as_slice(&self) -> &[T] {
        match self.data {
            // SAFETY: the first len slots were written by append/extend and
            // the block outlives the borrow of self.
            Some(data) => unsafe { slice::from_raw_parts(data.as_ptr(), self.len) },
            None => &[],
        }
    }

    /// The populated elements, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match self.data {
            // SAFETY: as in as_slice; &mut self makes the borrow unique.
            Some(data) => unsafe { slice::from_raw_parts_mut(data.as_ptr(), self.len) },
            None => &mut [],
        }
    }

    /// Iterate over the populated elements.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<'a, T> Array<'a, T> {
    /// Number of populated elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no element is populated.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the storage can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots before the array is full.
    pub fn remaining(&self) -> usize {
        self.capacity - self.len
    }

    /// Whether [`Array::append`] would fail.
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Whether the array currently owns a storage block.
    pub fn has_storage(&self) -> bool {
        self.data.is_some()
    }

    /// The allocator that owns this array's storage.
    pub fn allocator(&self) -> &'a dyn Allocator {
        self.allocator
    }
}

impl<T: Copy> Index<usize> for Array<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T: Copy> IndexMut<usize> for Array<'_, T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<'s, T: Copy> IntoIterator for &'s Array<'_, T> {
    type Item = &'s T;
    type IntoIter = slice::Iter<'s, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Array<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("items", &self.as_slice())
            .finish()
    }
}
