//! Scoped arena usage: everything allocated inside a scope is reclaimed
//! when the scope ends.

use std::ops::Deref;

use crate::linear::LinearAllocator;

/// Exclusive borrow of an active arena that clears it on drop.
///
/// Containers built against the scope borrow it, so the borrow checker
/// guarantees they are gone before the reset happens. Whether the reset
/// also zeroes the buffer follows the arena's
/// [`zero_on_clear`](crate::ArenaConfig::zero_on_clear) setting.
///
/// ```
/// use pawn_alloc::{Allocator, LinearAllocator};
/// use pawn_core::caller;
///
/// let mut buffer = [0u8; 256];
/// let mut arena = LinearAllocator::with_buffer(&mut buffer);
/// {
///     let frame = arena.scope();
///     frame.allocate(64, 1, &caller!(u8));
///     assert_eq!(frame.occupied(), 64);
/// }
/// assert_eq!(arena.occupied(), 0);
/// ```
pub struct ArenaScope<'s, 'a> {
    arena: &'s mut LinearAllocator<'a>,
}

impl<'s, 'a> ArenaScope<'s, 'a> {
    /// Open a scope over `arena`.
    ///
    /// # Panics
    ///
    /// Panics if the arena is not active.
    pub fn new(arena: &'s mut LinearAllocator<'a>) -> Self {
        assert!(
            arena.is_active(),
            "arena is not initialized or already deinitialized"
        );
        Self { arena }
    }
}

impl<'a> Deref for ArenaScope<'_, 'a> {
    type Target = LinearAllocator<'a>;

    fn deref(&self) -> &Self::Target {
        self.arena
    }
}

impl Drop for ArenaScope<'_, '_> {
    fn drop(&mut self) {
        let zero = self.arena.zeroes_on_clear();
        self.arena.clear(zero);
    }
}
