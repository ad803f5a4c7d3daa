//! Whole-file loading into allocator-backed byte arrays.

use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use pawn_alloc::Allocator;

use crate::array::Array;

/// Read size of one chunk.
const CHUNK: usize = 8 * 1024;

/// Errors from [`read_file_bytes`].
#[derive(Debug)]
pub enum LoadError {
    /// Opening, inspecting, or reading the file failed.
    Io {
        /// File being loaded.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The file is larger than an in-memory array can hold.
    TooLarge {
        /// File length in bytes.
        len: u64,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            Self::TooLarge { len } => {
                write!(f, "file of {len} bytes does not fit in memory")
            }
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::TooLarge { .. } => None,
        }
    }
}

/// Read the whole file at `path` into a byte array from `allocator`.
///
/// Storage is sized from the file's metadata up front. If the file turns
/// out longer than reported, the array is grown with explicit
/// [`Array::resize`] calls. The returned array's capacity may exceed its
/// length.
#[track_caller]
pub fn read_file_bytes<'a>(
    allocator: &'a dyn Allocator,
    path: impl AsRef<Path>,
) -> Result<Array<'a, u8>, LoadError> {
    let path = path.as_ref();
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_err)?;
    let len = file.metadata().map_err(io_err)?.len();
    let capacity = usize::try_from(len)
        .ok()
        .filter(|&n| n <= isize::MAX as usize)
        .ok_or(LoadError::TooLarge { len })?;

    let mut bytes = Array::new(allocator, capacity);
    let mut chunk = [0u8; CHUNK];
    loop {
        let n = match file.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(io_err(e)),
        };
        if n > bytes.remaining() {
            let grown = bytes
                .capacity()
                .checked_mul(2)
                .map(|c| c.max(bytes.len() + n))
                .filter(|&c| c <= isize::MAX as usize)
                .ok_or(LoadError::TooLarge {
                    len: (bytes.len() + n) as u64,
                })?;
            bytes.resize(grown);
        }
        let appended = bytes.extend_from_slice(&chunk[..n]);
        debug_assert!(appended, "array was sized to fit the chunk");
    }
    Ok(bytes)
}
