//! Error types for the Pawn memory layer.
//!
//! Allocation failures are resolved where they happen: the allocator
//! wrappers treat an [`AllocError`] as fatal, so these values mostly
//! appear in diagnostics and in the `try_*` capability methods.

use std::error::Error;
use std::fmt;

/// Why an allocation strategy could not satisfy a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The platform heap returned null.
    OutOfMemory {
        /// Number of bytes requested.
        bytes: usize,
    },
    /// A bounded strategy (arena) has no room left for the request.
    CapacityExceeded {
        /// Number of bytes requested, excluding alignment padding.
        requested: usize,
        /// Bytes still free at the time of the request.
        remaining: usize,
    },
    /// `count * size` does not fit in `usize`.
    SizeOverflow {
        /// Requested element count.
        count: usize,
        /// Element size in bytes.
        size: usize,
    },
}

impl AllocError {
    /// Number of bytes the failed request asked for, if it is representable.
    pub fn requested_bytes(&self) -> Option<usize> {
        match self {
            Self::OutOfMemory { bytes } => Some(*bytes),
            Self::CapacityExceeded { requested, .. } => Some(*requested),
            Self::SizeOverflow { .. } => None,
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { bytes } => {
                write!(f, "out of memory: heap refused {bytes} bytes")
            }
            Self::CapacityExceeded {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} bytes, {remaining} bytes remaining"
                )
            }
            Self::SizeOverflow { count, size } => {
                write!(f, "allocation size overflows: {count} elements of {size} bytes")
            }
        }
    }
}

impl Error for AllocError {}

/// Invalid arena configuration, rejected before any memory is reserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// An arena needs at least one byte of backing memory.
    ZeroCapacity,
    /// Capacity exceeds what a single allocation may span (`isize::MAX`).
    CapacityTooLarge {
        /// The rejected capacity.
        capacity: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "arena capacity must be non-zero"),
            Self::CapacityTooLarge { capacity } => {
                write!(f, "arena capacity {capacity} exceeds isize::MAX")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_exceeded_message() {
        let err = AllocError::CapacityExceeded {
            requested: 64,
            remaining: 16,
        };
        assert_eq!(
            err.to_string(),
            "arena capacity exceeded: requested 64 bytes, 16 bytes remaining"
        );
        assert_eq!(err.requested_bytes(), Some(64));
    }

    #[test]
    fn overflow_has_no_byte_count() {
        let err = AllocError::SizeOverflow {
            count: usize::MAX,
            size: 2,
        };
        assert_eq!(err.requested_bytes(), None);
    }

    #[test]
    fn config_errors_display() {
        assert_eq!(
            ConfigError::ZeroCapacity.to_string(),
            "arena capacity must be non-zero"
        );
    }
}
