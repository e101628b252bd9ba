//! Whole-file loading
//!
//! Files are memory-mapped and copied into an owned buffer, which the
//! scanners case-fold in place. Corpus files are read once per scan, so
//! there is no streaming or caching here.

use crate::error::{FreqError, Result};
use std::fs::File;
use std::path::Path;

/// Read the whole file at `path` into memory
pub fn load(path: &Path) -> Result<Vec<u8>> {
    let read_error = |source| FreqError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_error)?;
    let len = file.metadata().map_err(read_error)?.len();

    // Mapping a zero-length file fails on some platforms
    if len == 0 {
        return Ok(Vec::new());
    }

    // SAFETY: the map is only read while copying into the owned buffer below.
    let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(read_error)?;

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(mmap.len())
        .map_err(|e| FreqError::allocation(mmap.len(), e))?;
    buffer.extend_from_slice(&mmap);

    tracing::debug!(file = %path.display(), bytes = buffer.len(), "loaded file");
    Ok(buffer)
}

/// Load `path` and fold it to ASCII lowercase
pub fn load_folded(path: &Path) -> Result<Vec<u8>> {
    let mut buffer = load(path)?;
    buffer.make_ascii_lowercase();
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_reads_whole_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"The Quick\nBrown\tFox").unwrap();

        let buffer = load(file.path()).unwrap();
        assert_eq!(buffer, b"The Quick\nBrown\tFox");
    }

    #[test]
    fn test_load_folded_lowercases_ascii_only() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"ABC def \xC9").unwrap();

        let buffer = load_folded(file.path()).unwrap();
        assert_eq!(buffer, b"abc def \xC9");
    }

    #[test]
    fn test_load_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(load(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");

        match load(&missing) {
            Err(FreqError::Read { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected read error, got {other:?}"),
        }
    }
}
