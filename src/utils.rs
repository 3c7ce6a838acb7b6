//! Utility functions for snapdiff
//!
//! This module provides the common helpers used throughout the library:
//! content hashing, path manipulation, atomic file writing and JSON
//! persistence.
//!
//! ## Categories of Utilities
//!
//! ### File Operations
//! - File content hashing (MD5)
//! - Atomic file writing
//! - Copying with parent directory creation
//!
//! ### Path Manipulation
//! - Converting absolute paths to relative paths
//! - `/`-separated relative filenames for cross-platform record identity
//!
//! ### Data Processing
//! - Hash computation for in-memory data
//! - Pretty JSON persistence
//! - Byte formatting (human-readable sizes)
//!
//! ## Thread Safety
//!
//! All utility functions are thread-safe and can be called concurrently from
//! multiple threads without synchronization.

use crate::error::{Result, SnapdiffError};
use md5::{Digest, Md5};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Hash a file's content efficiently using MD5
///
/// Computes the MD5 hash of a file's content using buffered I/O. The file
/// is read and hashed in chunks to keep memory usage flat regardless of
/// file size.
///
/// # Arguments
///
/// * `path` - Path to the file to hash
///
/// # Returns
///
/// Returns the MD5 hash as a 32-character lowercase hexadecimal string.
///
/// # Errors
///
/// - [`SnapdiffError::Io`] if the file cannot be opened or read
///
/// # Example
///
/// ```rust,ignore
/// use crate::utils::hash_file_content;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_file_content(Path::new("example.txt"))?;
/// assert_eq!(hash.len(), 32); // MD5 is 32 hex characters
/// # Ok(())
/// # }
/// ```
pub fn hash_file_content(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    let mut buffer = vec![0u8; 8192]; // 8KB buffer

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hash arbitrary data using MD5
///
/// Convenience function for data already in memory; for files prefer
/// [`hash_file_content`] which streams.
///
/// # Example
///
/// ```rust
/// use snapdiff::utils::hash_data;
///
/// assert_eq!(hash_data(b""), "d41d8cd98f00b204e9800998ecf8427e");
/// assert_eq!(hash_data(b"hello world"), "5eb63bbbe01eeed093cb22bb8f5acdc3");
/// ```
pub fn hash_data(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Make a path relative to a base path
///
/// Converts an absolute path to a relative path by removing the base path
/// prefix. A lexical strip is attempted first so that symbolic link paths
/// are preserved as scanned; canonicalization is a fallback only.
///
/// # Errors
///
/// - [`SnapdiffError::Internal`] if the path is not under the base path
/// - [`SnapdiffError::Io`] if canonicalization fails (fallback case only)
pub fn make_relative(path: &Path, base: &Path) -> Result<PathBuf> {
    // Lexical strip first: it keeps symlink paths as they were walked,
    // so a link and its target cannot collapse into duplicate records.
    if let Ok(relative) = path.strip_prefix(base) {
        return Ok(relative.to_path_buf());
    }

    // Fallback for paths that differ in normalization (".." components,
    // mixed separators). Resolves symlinks as a side effect.
    let path_canon = path.canonicalize()?;
    let base_canon = base.canonicalize()?;

    path_canon
        .strip_prefix(&base_canon)
        .map(|p| p.to_path_buf())
        .map_err(|_| {
            SnapdiffError::internal(format!(
                "Path {:?} is not relative to {:?}",
                path_canon, base_canon
            ))
        })
}

/// Make a path relative to a base and render it as a `/`-separated string
///
/// This is the canonical `filename` form of a [`crate::types::FileRecord`]:
/// forward slashes on every platform, no leading separator.
///
/// # Errors
///
/// - [`SnapdiffError::PathConversion`] if a path component is not valid UTF-8
/// - Everything [`make_relative`] can return
pub fn relative_filename(path: &Path, base: &Path) -> Result<String> {
    let relative = make_relative(path, base)?;
    let mut parts = Vec::new();
    for component in relative.components() {
        match component.as_os_str().to_str() {
            Some(part) => parts.push(part),
            None => {
                return Err(SnapdiffError::PathConversion(
                    component.as_os_str().to_owned(),
                ))
            }
        }
    }
    Ok(parts.join("/"))
}

/// Atomic file write (write to temp file then rename)
///
/// Writes to a sibling `.tmp` file first and renames it into place, so the
/// target is never visible in a partially written state.
///
/// # Errors
///
/// - [`SnapdiffError::Io`] if writing the temporary file or renaming fails
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("tmp");

    // Write to temp file
    fs::write(&temp_path, content)?;

    // Atomic rename
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Serialize a value as pretty JSON and write it atomically
///
/// Parent directories are created if missing. All report artifacts go
/// through here so they share the same durability behavior.
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    atomic_write(path, json.as_bytes())
}

/// Copy a file, creating the destination's parent directories first
///
/// Record filenames may contain subdirectories, so the destination tree is
/// built on demand.
///
/// # Errors
///
/// - [`SnapdiffError::Copy`] wrapping the underlying I/O failure, with both
///   endpoints for context
pub fn copy_with_parents(src: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| SnapdiffError::copy(src, dest, e))?;
    }
    fs::copy(src, dest).map_err(|e| SnapdiffError::copy(src, dest, e))?;
    Ok(())
}

/// Format bytes in human-readable form
///
/// Uses binary units (1024-based). Values under 1024 bytes are shown as
/// whole numbers, larger values with two decimal places.
///
/// # Example
///
/// ```rust
/// use snapdiff::utils::format_bytes;
///
/// assert_eq!(format_bytes(1023), "1023 B");
/// assert_eq!(format_bytes(1536), "1.50 KB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}
