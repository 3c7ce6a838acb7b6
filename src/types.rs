//! Core data types used throughout the snapdiff library
//!
//! This module contains the data structures shared across the scanner,
//! matcher and materializer.
//!
//! ## Overview
//!
//! The types in this module represent:
//! - **Snapshot State**: `FileRecord` - one file of a scanned snapshot
//! - **Match Output**: `MatchResult` and its pair types - the six-way
//!   classification produced by matching two snapshots
//! - **Reports**: `AnalysisSummary`, `ModifiedFileEntry`, `RenamedFileEntry` -
//!   the JSON artifacts written by the materializer
//! - **Progress**: `ProgressInfo` - reporting hook for long-running scans
//!
//! ## Examples
//!
//! ```rust
//! use snapdiff::types::FileRecord;
//! use std::path::PathBuf;
//!
//! let record = FileRecord {
//!     filename: "docs/readme.md".to_string(),
//!     path: PathBuf::from("/snapshots/left/docs/readme.md"),
//!     md5: "d41d8cd98f00b204e9800998ecf8427e".to_string(),
//! };
//! assert_eq!(record.filename, "docs/readme.md");
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Represents one file in a scanned snapshot
///
/// Identity is two-dimensional: `filename` answers "same name?", `md5`
/// answers "same content?". The `path` exists only so the file can be
/// read back for copying; it never participates in matching.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileRecord {
    /// Path relative to the snapshot root, `/`-separated on all platforms
    pub filename: String,
    /// Resolved filesystem path used for I/O
    pub path: PathBuf,
    /// Lowercase hex MD5 of the file content
    pub md5: String,
}

impl FileRecord {
    /// Create a new file record
    pub fn new(
        filename: impl Into<String>,
        path: impl Into<PathBuf>,
        md5: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
            md5: md5.into(),
        }
    }
}

/// A file present on both sides with the same name and the same content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnchangedPair {
    /// Left-side record
    pub lhs: FileRecord,
    /// Right-side record
    pub rhs: FileRecord,
    /// The shared content hash
    pub md5: String,
}

/// A file whose content survived under a different name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenamedPair {
    /// Left-side record (the old name)
    pub old: FileRecord,
    /// Right-side record (the new name)
    pub new: FileRecord,
    /// The shared content hash
    pub md5: String,
}

/// A file whose name survived with different content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModifiedPair {
    /// Left-side record
    pub old: FileRecord,
    /// Right-side record
    pub new: FileRecord,
    /// Content hash on the left
    pub old_md5: String,
    /// Content hash on the right
    pub new_md5: String,
}

/// A file that changed both name and content
///
/// Declared for forward compatibility with the output shape; the matching
/// pass never populates it. A rename-with-edit surfaces as a deletion plus
/// an addition instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovedPair {
    /// Left-side record
    pub old: FileRecord,
    /// Right-side record
    pub new: FileRecord,
}

/// Result of matching two snapshots
///
/// Every left-side record lands in exactly one of `unchanged`, `renamed` or
/// `deleted`. The `modified` pairs are derived separately in a second pass
/// over the right side and may overlap with `deleted`/`renamed` entries;
/// consumers that need a strict partition should read the first three
/// buckets only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchResult {
    /// Same name, same content on both sides
    pub unchanged: Vec<UnchangedPair>,
    /// Same content under a new name
    pub renamed: Vec<RenamedPair>,
    /// Same name with new content
    pub modified: Vec<ModifiedPair>,
    /// Reserved; never populated by matching
    pub moved: Vec<MovedPair>,
    /// Right-side records with no left-side counterpart
    pub added: Vec<FileRecord>,
    /// Left-side records with no right-side counterpart
    pub deleted: Vec<FileRecord>,
}

impl MatchResult {
    /// Check if the two snapshots differ at all
    pub fn has_changes(&self) -> bool {
        !self.renamed.is_empty()
            || !self.modified.is_empty()
            || !self.added.is_empty()
            || !self.deleted.is_empty()
    }

    /// Bucket sizes in the shape used by the analysis report
    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts {
            unchanged: self.unchanged.len(),
            renamed: self.renamed.len(),
            modified: self.modified.len(),
            added: self.added.len(),
            deleted: self.deleted.len(),
        }
    }
}

/// Per-category sizes of a match result
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCounts {
    /// Number of unchanged pairs
    pub unchanged: usize,
    /// Number of renamed pairs
    pub renamed: usize,
    /// Number of modified pairs
    pub modified: usize,
    /// Number of added files
    pub added: usize,
    /// Number of deleted files
    pub deleted: usize,
}

/// One modified file in the analysis report
///
/// Field names are part of the on-disk JSON contract: `old`, `new`,
/// `oldHash`, `newHash`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModifiedFileEntry {
    /// Old filename
    pub old: String,
    /// New filename
    pub new: String,
    /// Content hash on the left
    #[serde(rename = "oldHash")]
    pub old_hash: String,
    /// Content hash on the right
    #[serde(rename = "newHash")]
    pub new_hash: String,
}

impl From<&ModifiedPair> for ModifiedFileEntry {
    fn from(pair: &ModifiedPair) -> Self {
        Self {
            old: pair.old.filename.clone(),
            new: pair.new.filename.clone(),
            old_hash: pair.old_md5.clone(),
            new_hash: pair.new_md5.clone(),
        }
    }
}

/// Top-level shape of `analysis.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisSummary {
    /// Every modified pair, with both hashes
    pub modified: Vec<ModifiedFileEntry>,
    /// Bucket counts for the remaining categories
    pub analysis: CategoryCounts,
}

/// One renamed file in `modify/renamed-files.json`
///
/// The `lhs`/`rhs` sides are singleton arrays of full records; the array
/// shape is part of the JSON contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenamedFileEntry {
    /// The shared content hash
    pub hash: String,
    /// The old record, as a one-element array
    pub lhs: Vec<FileRecord>,
    /// The new record, as a one-element array
    pub rhs: Vec<FileRecord>,
}

impl From<&RenamedPair> for RenamedFileEntry {
    fn from(pair: &RenamedPair) -> Self {
        Self {
            hash: pair.md5.clone(),
            lhs: vec![pair.old.clone()],
            rhs: vec![pair.new.clone()],
        }
    }
}

/// Information passed to progress callbacks
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// File currently being hashed
    pub current_item: Option<String>,
    /// Files processed so far
    pub processed: usize,
    /// Total files to process (if known)
    pub total: Option<usize>,
}

impl ProgressInfo {
    /// Get progress as a percentage (0-100)
    pub fn percentage(&self) -> Option<f32> {
        match self.total {
            Some(total) if total > 0 => Some((self.processed as f32 / total as f32) * 100.0),
            _ => None,
        }
    }
}
