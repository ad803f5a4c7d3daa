//! Alignment arithmetic for bump allocation.

/// Largest alignment the system heap guarantees for every block.
///
/// Matches `malloc` on 64-bit platforms (`alignof(max_align_t)`).
pub const MAX_ALIGN: usize = 16;

/// Whether `x` is a power of two. Zero is not.
pub const fn is_power_of_two(x: usize) -> bool {
    x != 0 && (x & (x - 1)) == 0
}

/// Round `addr` up to the next multiple of `align`.
///
/// Returns `None` if the rounded value overflows `usize`.
///
/// # Panics
///
/// Panics if `align` is not a power of two.
pub fn align_up(addr: usize, align: usize) -> Option<usize> {
    assert!(
        is_power_of_two(align),
        "alignment {align} is not a power of two"
    );
    let mask = align - 1;
    addr.checked_add(mask).map(|v| v & !mask)
}
