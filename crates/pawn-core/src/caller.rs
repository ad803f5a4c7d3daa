//! Call-site metadata attached to every allocator request.
//!
//! A [`CallerInfo`] travels with each allocate / reallocate / deallocate
//! call purely for diagnostics. Allocators may log it; they never branch
//! on it.

use std::fmt;
use std::panic::Location;

/// Where an allocator request came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallerInfo {
    /// Name of the element type being allocated, or `"(none)"`.
    pub type_name: &'static str,
    /// Module path (or function) that issued the request.
    pub function: &'static str,
    /// Source file of the call site.
    pub file: &'static str,
    /// Source line of the call site.
    pub line: u32,
}

impl CallerInfo {
    /// Placeholder type name for untyped requests (e.g. deallocation).
    pub const UNTYPED: &'static str = "(none)";

    /// Build caller info from explicit parts.
    pub const fn new(
        type_name: &'static str,
        function: &'static str,
        file: &'static str,
        line: u32,
    ) -> Self {
        Self {
            type_name,
            function,
            file,
            line,
        }
    }

    /// Build caller info for element type `T` from a tracked location.
    ///
    /// Used by `#[track_caller]` entry points, which know the file and line
    /// of their caller but not its module path.
    pub fn located<T>(function: &'static str, location: &'static Location<'static>) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            function,
            file: location.file(),
            line: location.line(),
        }
    }

    /// Build untyped caller info from a tracked location.
    pub fn untyped(function: &'static str, location: &'static Location<'static>) -> Self {
        Self {
            type_name: Self::UNTYPED,
            function,
            file: location.file(),
            line: location.line(),
        }
    }
}

impl fmt::Display for CallerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' in {} ({}:{})",
            self.type_name, self.function, self.file, self.line
        )
    }
}

/// Capture a [`CallerInfo`] for the current source location.
///
/// `caller!()` records an untyped request; `caller!(T)` records the
/// element type name as well.
///
/// ```
/// use pawn_core::caller;
///
/// let site = caller!(u32);
/// assert_eq!(site.type_name, "u32");
/// assert_eq!(site.line, line!() - 2);
/// ```
#[macro_export]
macro_rules! caller {
    () => {
        $crate::CallerInfo::new(
            $crate::CallerInfo::UNTYPED,
            ::core::module_path!(),
            ::core::file!(),
            ::core::line!(),
        )
    };
    ($t:ty) => {
        $crate::CallerInfo::new(
            ::core::any::type_name::<$t>(),
            ::core::module_path!(),
            ::core::file!(),
            ::core::line!(),
        )
    };
}
