//! Integration test: the client's canonical arena and array scenarios.
//!
//! Covers the two-buffer arena walkthrough (adjacent blocks, blocked
//! growth copying past the neighbour), the bounded string array, and a
//! board built against an injected allocator.

use pawn::prelude::*;
use pawn_test_utils::fixtures::{create_board, DrawList, PieceKind};
use pawn_test_utils::{Call, RecordingAllocator};

fn write(ptr: std::ptr::NonNull<u8>, text: &[u8]) {
    // SAFETY: callers pass blocks of at least text.len() bytes.
    unsafe { ptr.as_ptr().copy_from_nonoverlapping(text.as_ptr(), text.len()) }
}

fn read(ptr: std::ptr::NonNull<u8>, len: usize) -> Vec<u8> {
    // SAFETY: callers pass blocks of at least len initialised bytes.
    unsafe { std::slice::from_raw_parts(ptr.as_ptr(), len).to_vec() }
}

// ── Arena walkthrough ───────────────────────────────────────────

#[test]
fn two_buffers_then_blocked_growth() {
    let mut backing = [0u8; 1024];
    let mut arena = LinearAllocator::with_buffer(&mut backing);

    {
        let a: &dyn Allocator = &arena;
        let buffer1 = pawn::alloc::alloc!(a, 32, u8);
        write(buffer1, b"Hello, world!\0");
        let buffer2 = pawn::alloc::alloc!(a, 32, u8);
        write(buffer2, b"Goodbye, sadness!\0");

        assert_eq!(buffer2.as_ptr() as usize - buffer1.as_ptr() as usize, 32);

        // buffer2 sits behind buffer1, so growth cannot happen in place.
        let grown = unsafe { pawn::alloc::realloc!(a, buffer1, 32, 64, u8) };
        assert_eq!(grown.as_ptr() as usize, buffer2.as_ptr() as usize + 32);
        assert_eq!(read(grown, 14), b"Hello, world!\0");
        assert_eq!(read(buffer1, 14), b"Hello, world!\0");
        assert_eq!(read(buffer2, 18), b"Goodbye, sadness!\0");
    }
    assert_eq!(arena.occupied(), 128);
    assert_eq!(arena.stats().counts().allocations, 2);
    assert_eq!(arena.stats().counts().reallocations, 1);

    arena.clear(false);
    assert_eq!(arena.occupied(), 0);
    assert_eq!(arena.high_water_mark(), 128);
    arena.deinit();
    assert_eq!(arena.state(), pawn::alloc::ArenaState::Released);
}

#[test]
fn exhausted_arena_recovers_after_clear() {
    let mut backing = [0u8; 64];
    let mut arena = LinearAllocator::with_buffer(&mut backing);
    arena.allocate(48, 1, &caller!(u8));
    let err = arena.try_allocate(32, 1, &caller!(u8)).unwrap_err();
    assert_eq!(
        err,
        AllocError::CapacityExceeded {
            requested: 32,
            remaining: 16,
        }
    );

    arena.clear(false);
    assert!(arena.try_allocate(32, 1, &caller!(u8)).is_ok());
}

// ── Bounded arrays ──────────────────────────────────────────────

#[test]
fn bounded_string_array() {
    let system = SystemAllocator::new();
    let mut s = Array::<char>::new(&system, 3);

    assert!(s.append('h'));
    assert!(s.append('i'));
    assert!(s.append('\0'));
    assert_eq!(s.len(), 3);

    assert!(!s.append('m'));
    assert_eq!(s.len(), 3);
    assert_eq!(s.as_slice(), &['h', 'i', '\0']);

    assert_eq!(s.resize(7), 7);
    for c in ['!', '!', '!', '\0'] {
        assert!(s.append(c));
    }
    assert!(!s.append('x'));
    assert_eq!(s.len(), 7);

    assert!(s.release());
    assert_eq!((s.len(), s.capacity()), (0, 0));
    assert!(!s.release());

    let counts = system.stats().counts();
    assert_eq!(counts.allocations, 1);
    assert_eq!(counts.reallocations, 1);
    assert_eq!(counts.deallocations, 1);
}

#[test]
fn arrays_in_an_arena_scope_are_reclaimed_together() {
    let mut arena =
        LinearAllocator::from_config(SystemAllocator::global(), &ArenaConfig::new(4096)).unwrap();
    for frame_no in 0..3u32 {
        let frame = arena.scope();
        let mut ids = Array::<u32>::new(&*frame, 16);
        let mut names = Array::<u8>::new(&*frame, 32);
        assert!(ids.append(frame_no));
        assert!(names.extend_from_slice(b"frame"));
        assert!(frame.occupied() >= 16 * 4 + 32);
    }
    assert_eq!(arena.occupied(), 0);
    assert!(arena.high_water_mark() >= 96);
}

#[test]
fn scoped_array_frees_on_every_exit_path() {
    let system = SystemAllocator::new();
    let rec = RecordingAllocator::new(&system);

    let first_even = |values: &[u32]| -> Option<u32> {
        let mut scratch = ScopedArray::<u32>::new(&rec, values.len());
        for &v in values {
            if v % 2 == 0 {
                return Some(v);
            }
            let _ = scratch.append(v);
        }
        None
    };

    assert_eq!(first_even(&[1, 3, 4, 5]), Some(4));
    assert_eq!(first_even(&[1, 3]), None);
    assert!(rec.is_balanced());
}

// ── Injected allocators ─────────────────────────────────────────

#[test]
fn board_uses_the_allocator_it_is_given() {
    let system = SystemAllocator::new();
    let rec = RecordingAllocator::new(&system);

    let mut board = create_board(&rec, 8, 8, 2);
    if let Some(square) = board.square_mut(1, 0) {
        square.piece = PieceKind::Pawn;
    }
    assert_eq!(rec.outstanding_blocks(), 2);
    assert_eq!(rec.outstanding_bytes(), 64 * 8 + 2 * 32);

    board.release();
    assert!(rec.is_balanced());
    assert!(matches!(
        rec.calls()[0],
        Call::Allocate {
            count: 64,
            size: 8,
            ..
        }
    ));
}

#[test]
fn draw_list_grows_explicitly() {
    let system = SystemAllocator::new();
    let mut list = DrawList::with_quads(&system, 1);
    assert!(list.push_rect([0.0, 0.0], [1.0, 1.0], [1.0, 1.0, 1.0]));
    assert!(!list.push_rect([1.0, 1.0], [2.0, 2.0], [1.0, 1.0, 1.0]));

    list.commands.resize(4);
    list.indices.resize(24);
    list.vertices.resize(16);
    assert!(list.push_rect([1.0, 1.0], [2.0, 2.0], [1.0, 1.0, 1.0]));
    assert_eq!(list.vertices.len(), 8);
    list.release();
}

#[test]
fn loaded_file_bytes_live_in_the_given_allocator() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("opening.pgn");
    std::fs::write(&path, b"1. e4 e5 2. Nf3 Nc6").unwrap();

    let system = SystemAllocator::new();
    let mut bytes = read_file_bytes(&system, &path).unwrap();
    assert_eq!(bytes.as_slice(), b"1. e4 e5 2. Nf3 Nc6");
    assert_eq!(system.stats().allocations(), 1);
    bytes.release();
}
