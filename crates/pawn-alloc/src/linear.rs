//! Linear (bump) allocator over a single backing buffer.
//!
//! A [`LinearAllocator`] hands out consecutive, aligned chunks of one
//! fixed buffer by advancing a cursor. Individual blocks are never freed;
//! the whole arena is reset at once with [`LinearAllocator::clear`]. The
//! one exception is the most recent block, which can grow or shrink in
//! place because nothing sits after it.
//!
//! ```text
//! start                     cursor                 end
//!   │ block A │pad│ block B │        free           │
//!   └─────────┴───┴─────────┴───────────────────────┘
//!                  ▲ only B can be resized in place
//! ```

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::panic::Location;
use std::ptr::NonNull;

use pawn_core::{align_up, is_power_of_two, AllocError, AllocStats, CallerInfo, ConfigError};

use crate::allocator::{byte_len, Allocator};
use crate::config::ArenaConfig;
use crate::raw;
use crate::scope::ArenaScope;

/// Lifecycle of a [`LinearAllocator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArenaState {
    /// Created with [`LinearAllocator::new`], no backing buffer yet.
    Uninitialized,
    /// Backed by a buffer and serving allocations.
    Active,
    /// [`LinearAllocator::deinit`] ran; no further use is permitted.
    Released,
}

/// Who supplied the backing buffer.
enum Backing<'a> {
    /// Borrowed from the caller; never freed by the arena.
    Borrowed,
    /// Obtained from another allocator; returned to it on `deinit`.
    Allocated(&'a dyn Allocator),
}

struct Region<'a> {
    start: NonNull<u8>,
    capacity: usize,
    backing: Backing<'a>,
}

/// Bump-pointer arena allocator.
///
/// The element size passed to each request doubles as its alignment, so
/// it must be a power of two. Requests that do not fit fail with
/// [`AllocError::CapacityExceeded`] on the `try_*` path (the wrappers turn
/// that into an abort).
///
/// `cursor_max` is a lifetime high-water mark: it never decreases, and
/// `clear` leaves it alone, so it can size future arenas.
///
/// # Thread safety
///
/// Not `Sync`. The cursor is unsynchronised: one arena serves
/// one logical thread (a frame, a subsystem's transient buffers).
pub struct LinearAllocator<'a> {
    region: Option<Region<'a>>,
    state: ArenaState,
    /// Offset of the next free byte from `region.start`.
    cursor: Cell<usize>,
    cursor_max: Cell<usize>,
    zero_on_clear: bool,
    stats: AllocStats,
    _buffer: PhantomData<&'a mut [u8]>,
}

impl<'a> LinearAllocator<'a> {
    /// An uninitialised arena. Call one of the `init_*` methods before use.
    pub const fn new() -> Self {
        Self {
            region: None,
            state: ArenaState::Uninitialized,
            cursor: Cell::new(0),
            cursor_max: Cell::new(0),
            zero_on_clear: false,
            stats: AllocStats::new(),
            _buffer: PhantomData,
        }
    }

    /// An active arena over a caller-supplied buffer.
    pub fn with_buffer(buffer: &'a mut [u8]) -> Self {
        let mut arena = Self::new();
        arena.init_with_buffer(buffer);
        arena
    }

    /// An active arena over `capacity` bytes obtained from `source`.
    #[track_caller]
    pub fn with_capacity(source: &'a dyn Allocator, capacity: usize) -> Self {
        let mut arena = Self::new();
        arena.init_from(source, capacity);
        arena
    }

    /// An active arena built from a validated [`ArenaConfig`].
    #[track_caller]
    pub fn from_config(
        source: &'a dyn Allocator,
        config: &ArenaConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut arena = Self::new();
        arena.zero_on_clear = config.zero_on_clear;
        arena.init_from(source, config.capacity);
        Ok(arena)
    }

    /// Start serving allocations from `buffer`.
    ///
    /// The buffer stays borrowed for the arena's lifetime and is not freed
    /// by [`LinearAllocator::deinit`].
    ///
    /// # Panics
    ///
    /// Panics if the arena was already initialised or if `buffer` is empty.
    pub fn init_with_buffer(&mut self, buffer: &'a mut [u8]) {
        assert!(!buffer.is_empty(), "cannot initialize an arena with an empty buffer");
        let capacity = buffer.len();
        let start = NonNull::from(buffer).cast::<u8>();
        self.activate(Region {
            start,
            capacity,
            backing: Backing::Borrowed,
        });
    }

    /// Start serving allocations from `capacity` bytes taken from `source`.
    ///
    /// The buffer is returned to `source` by [`LinearAllocator::deinit`].
    ///
    /// # Panics
    ///
    /// Panics if the arena was already initialised or `capacity` is zero.
    #[track_caller]
    pub fn init_from(&mut self, source: &'a dyn Allocator, capacity: usize) {
        assert!(capacity > 0, "cannot initialize an arena with zero capacity");
        assert_eq!(
            self.state,
            ArenaState::Uninitialized,
            "arena is already initialized or was deinitialized"
        );
        let caller = CallerInfo::located::<u8>("LinearAllocator::init_from", Location::caller());
        let start = source.allocate(capacity, 1, &caller);
        self.activate(Region {
            start,
            capacity,
            backing: Backing::Allocated(source),
        });
    }

    fn activate(&mut self, region: Region<'a>) {
        assert_eq!(
            self.state,
            ArenaState::Uninitialized,
            "arena is already initialized or was deinitialized"
        );
        diag!(debug, capacity = region.capacity, start = ?region.start, "arena initialized");
        self.region = Some(region);
        self.state = ArenaState::Active;
        self.cursor.set(0);
        self.cursor_max.set(0);
    }

    /// Release the backing buffer and move to [`ArenaState::Released`].
    ///
    /// # Panics
    ///
    /// Panics if the arena is not active (never initialised, or already
    /// deinitialised).
    #[allow(unsafe_code)]
    #[track_caller]
    pub fn deinit(&mut self) {
        assert_eq!(
            self.state,
            ArenaState::Active,
            "arena is not initialized or already deinitialized"
        );
        self.state = ArenaState::Released;
        self.cursor.set(0);
        let Some(region) = self.region.take() else {
            return;
        };
        diag!(
            debug,
            capacity = region.capacity,
            high_water_mark = self.cursor_max.get(),
            "arena released"
        );
        if let Backing::Allocated(source) = region.backing {
            let caller = CallerInfo::untyped("LinearAllocator::deinit", Location::caller());
            // SAFETY: region.start came from source.allocate in init_from and
            // is released exactly once, here.
            unsafe { source.deallocate(Some(region.start), &caller) };
        }
    }

    /// Reset the cursor to the start of the buffer, optionally zeroing it.
    ///
    /// Requires `&mut self`, so no container can still be borrowing
    /// memory from this arena. The high-water mark is kept.
    ///
    /// # Panics
    ///
    /// Panics if the arena is not active.
    pub fn clear(&mut self, zero_memory: bool) {
        self.reset(zero_memory);
    }

    #[allow(unsafe_code)]
    fn reset(&self, zero_memory: bool) {
        let region = self.region();
        self.cursor.set(0);
        if zero_memory {
            // SAFETY: the region is live and spans `capacity` writable bytes.
            unsafe { raw::zero_bytes(region.start, region.capacity) };
        }
    }

    /// Borrow the arena for one batch of allocations; it is cleared when
    /// the returned scope drops.
    pub fn scope(&mut self) -> ArenaScope<'_, 'a> {
        ArenaScope::new(self)
    }

    /// Bytes in use since the last clear, padding included.
    pub fn occupied(&self) -> usize {
        self.cursor.get()
    }

    /// Bytes still free after the cursor.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.cursor.get()
    }

    /// Size of the backing buffer, or zero when not active.
    pub fn capacity(&self) -> usize {
        self.region.as_ref().map_or(0, |r| r.capacity)
    }

    /// The furthest the cursor has ever advanced since initialisation.
    pub fn high_water_mark(&self) -> usize {
        self.cursor_max.get()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ArenaState {
        self.state
    }

    /// Whether the arena is serving allocations.
    pub fn is_active(&self) -> bool {
        self.state == ArenaState::Active
    }

    /// Whether arena-initiated resets zero the buffer.
    pub fn zeroes_on_clear(&self) -> bool {
        self.zero_on_clear
    }

    fn region(&self) -> &Region<'a> {
        match (&self.state, &self.region) {
            (ArenaState::Active, Some(region)) => region,
            _ => panic!("arena is not initialized or already deinitialized"),
        }
    }

    fn move_cursor(&self, end: usize) {
        self.cursor.set(end);
        self.cursor_max.set(self.cursor_max.get().max(end));
    }

    /// Carve an aligned block of `count * size` bytes after the cursor.
    #[allow(unsafe_code)]
    fn bump(&self, count: usize, size: usize) -> Result<NonNull<u8>, AllocError> {
        assert!(
            is_power_of_two(size),
            "allocation size (alignment) must be a power of two, got {size}"
        );
        let region = self.region();
        let bytes = byte_len(count, size)?;
        let cursor = self.cursor.get();
        let exceeded = AllocError::CapacityExceeded {
            requested: bytes,
            remaining: region.capacity - cursor,
        };

        let base = region.start.as_ptr() as usize;
        let aligned = align_up(base + cursor, size).ok_or(exceeded)? - base;
        let end = aligned
            .checked_add(bytes)
            .filter(|&end| end <= region.capacity)
            .ok_or(exceeded)?;

        self.move_cursor(end);
        // SAFETY: aligned <= end <= capacity, so the offset stays inside
        // (or one past) the backing buffer.
        Ok(unsafe { raw::offset(region.start, aligned) })
    }
}

impl Default for LinearAllocator<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(unsafe_code)]
impl Allocator for LinearAllocator<'_> {
    fn stats(&self) -> &AllocStats {
        &self.stats
    }

    fn try_allocate(
        &self,
        count: usize,
        size: usize,
        _caller: &CallerInfo,
    ) -> Result<NonNull<u8>, AllocError> {
        self.bump(count, size)
    }

    unsafe fn try_reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old_count: usize,
        new_count: usize,
        size: usize,
        caller: &CallerInfo,
    ) -> Result<NonNull<u8>, AllocError> {
        let Some(ptr) = ptr else {
            return self.try_allocate(new_count, size, caller);
        };
        assert!(
            is_power_of_two(size),
            "allocation size (alignment) must be a power of two, got {size}"
        );
        let region = self.region();
        let old_bytes = byte_len(old_count, size)?;
        let new_bytes = byte_len(new_count, size)?;
        let cursor = self.cursor.get();

        // The most recent block ends exactly at the cursor and can be
        // resized in place, in either direction.
        let addr = ptr.as_ptr() as usize;
        let base = region.start.as_ptr() as usize;
        let last_block = addr
            .checked_sub(base)
            .filter(|&offset| offset.checked_add(old_bytes) == Some(cursor) && addr % size == 0);
        if let Some(offset) = last_block {
            let end = offset
                .checked_add(new_bytes)
                .filter(|&end| end <= region.capacity)
                .ok_or(AllocError::CapacityExceeded {
                    requested: new_bytes,
                    remaining: region.capacity - offset,
                })?;
            self.move_cursor(end);
            return Ok(ptr);
        }

        // Otherwise copy forward; the old bytes stay behind until the next clear.
        let new_ptr = self.bump(new_count, size)?;
        // SAFETY: the caller guarantees ptr spans old_bytes readable bytes;
        // new_ptr spans new_bytes fresh bytes past the cursor, which the
        // old block (ending at or before the cursor) cannot overlap.
        unsafe { raw::copy_bytes(ptr, new_ptr, old_bytes.min(new_bytes)) };
        Ok(new_ptr)
    }

    unsafe fn try_deallocate(&self, ptr: Option<NonNull<u8>>, caller: &CallerInfo) {
        match ptr {
            None => {
                diag!(warn, site = %caller, "arena reset through deallocate(None)");
                self.reset(self.zero_on_clear);
            }
            Some(ptr) => panic!(
                "cannot deallocate block {ptr:p} through a linear allocator (at {caller})"
            ),
        }
    }
}

impl Drop for LinearAllocator<'_> {
    fn drop(&mut self) {
        if self.is_active() {
            diag!(warn, capacity = self.capacity(), "arena dropped without deinit");
            self.deinit();
        }
    }
}

impl fmt::Debug for LinearAllocator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearAllocator")
            .field("state", &self.state)
            .field("capacity", &self.capacity())
            .field("occupied", &self.occupied())
            .field("high_water_mark", &self.high_water_mark())
            .field("zero_on_clear", &self.zero_on_clear)
            .field("stats", &self.stats.counts())
            .finish()
    }
}
