//! Content-addressed snapshot matching
//!
//! This module implements the core classification algorithm: given the file
//! records of two snapshots, partition them into unchanged, renamed,
//! modified, added and deleted buckets using content hashes as the primary
//! identity.
//!
//! ## Matching rules
//!
//! Records are grouped by hash on each side, preserving first-seen hash
//! order and input order within a group. Two passes follow:
//!
//! 1. **Left pass** - drives `deleted`, `unchanged` and `renamed`. A left
//!    record whose hash is absent on the right is deleted. Otherwise a
//!    same-name record in the right-side pool makes an unchanged pair
//!    (without consuming the pool), else the first still-available pool
//!    record is taken as the rename target (consuming it). When a pool
//!    empties its hash is dropped from the right-side groups.
//! 2. **Right pass** - drives `added` and `modified`, iterating the pools
//!    left over after the rename consumption. A right record whose hash
//!    never existed on the left is added. Otherwise a same-name left record
//!    with a different hash makes a modified pair; the name lookup scans the
//!    original left input, not the grouped pools.
//!
//! Ties are broken by position, never by similarity, so identical inputs
//! always produce identical results.
//!
//! ## Known asymmetries
//!
//! The two passes read different views of the data on purpose, and that
//! shows up in the output:
//!
//! - a left record counted as `deleted` (or consumed by a rename) can show
//!   up again as the old side of a `modified` pair, because the right pass
//!   consults the full left input for name matches;
//! - a right record can land in no bucket at all when its hash exists on
//!   the left but every classification path passes it by;
//! - a right record can also be claimed twice: an unchanged match leaves it
//!   in the pool, so a later same-hash left record may still take it as a
//!   rename target;
//! - `match_snapshots(a, b)` is not the mirror image of
//!   `match_snapshots(b, a)`.
//!
//! Consumers that need a strict partition should rely on the left-side
//! guarantee: every left record lands in exactly one of `unchanged`,
//! `renamed` or `deleted`.
//!
//! ## Example
//!
//! ```rust
//! use snapdiff::matcher::match_snapshots;
//! use snapdiff::types::FileRecord;
//!
//! let before = vec![
//!     FileRecord::new("app.css", "/v1/app.css", "aaaa"),
//!     FileRecord::new("logo.png", "/v1/logo.png", "bbbb"),
//! ];
//! let after = vec![
//!     FileRecord::new("app.css", "/v2/app.css", "aaaa"),
//!     FileRecord::new("brand.png", "/v2/brand.png", "bbbb"),
//! ];
//!
//! let result = match_snapshots(&before, &after).unwrap();
//! assert_eq!(result.unchanged.len(), 1);
//! assert_eq!(result.renamed.len(), 1);
//! assert_eq!(result.renamed[0].old.filename, "logo.png");
//! assert_eq!(result.renamed[0].new.filename, "brand.png");
//! ```

use crate::error::{Result, SnapdiffError};
use crate::types::{FileRecord, MatchResult, ModifiedPair, RenamedPair, UnchangedPair};
use indexmap::IndexMap;
use std::collections::VecDeque;
use tracing::debug;

/// Hash-keyed pools of file records for one snapshot side
///
/// Groups are kept in first-seen hash order and records within a group in
/// input order; both orders feed the matcher's positional tie-breaking.
/// The right-side instance is consumed destructively during matching: a
/// record taken as a rename target leaves its pool for good, and an
/// emptied pool drops its hash key entirely.
#[derive(Debug, Clone, Default)]
pub struct HashGroups {
    groups: IndexMap<String, VecDeque<FileRecord>>,
}

impl HashGroups {
    /// Group records by their content hash
    pub fn from_records(records: &[FileRecord]) -> Self {
        let mut groups: IndexMap<String, VecDeque<FileRecord>> = IndexMap::new();
        for record in records {
            groups
                .entry(record.md5.clone())
                .or_default()
                .push_back(record.clone());
        }
        Self { groups }
    }

    /// Check whether any records remain under this hash
    pub fn contains(&self, md5: &str) -> bool {
        self.groups.contains_key(md5)
    }

    /// Find a record with the given filename in this hash's pool
    ///
    /// Does not consume the record.
    pub fn find_by_filename(&self, md5: &str, filename: &str) -> Option<FileRecord> {
        self.groups
            .get(md5)?
            .iter()
            .find(|record| record.filename == filename)
            .cloned()
    }

    /// Take the first still-available record out of this hash's pool
    ///
    /// The hash key is removed once its pool empties, preserving the
    /// iteration order of the remaining groups.
    pub fn take_front(&mut self, md5: &str) -> Option<FileRecord> {
        let queue = self.groups.get_mut(md5)?;
        let record = queue.pop_front();
        if queue.is_empty() {
            self.groups.shift_remove(md5);
        }
        record
    }

    /// Iterate groups in first-seen hash order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VecDeque<FileRecord>)> {
        self.groups.iter().map(|(md5, queue)| (md5.as_str(), queue))
    }

    /// Number of distinct hashes with at least one record
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check whether no records remain at all
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Classify the files of two snapshots by content hash
///
/// Compares the left-hand (old) and right-hand (new) snapshot records and
/// returns the six-bucket [`MatchResult`]. The classification is pure and
/// deterministic: no I/O happens here and tie-breaks depend only on input
/// order.
///
/// # Arguments
///
/// * `lhs` - records of the old snapshot, in a stable order
/// * `rhs` - records of the new snapshot, in a stable order
///
/// # Errors
///
/// - [`SnapdiffError::InvalidRecord`] if any record has an empty `filename`
///   or an empty `md5`; validation runs over both sides before any
///   classification, so a failed call has no partial effects
///
/// # Example
///
/// A config file reset to the (unchanged) defaults: the right-side copy
/// keeps its name but now carries content that also survives elsewhere,
/// which is what makes a modified pair.
///
/// ```rust
/// use snapdiff::matcher::match_snapshots;
/// use snapdiff::types::FileRecord;
///
/// let old = vec![
///     FileRecord::new("config.ini", "/v1/config.ini", "1111"),
///     FileRecord::new("defaults.ini", "/v1/defaults.ini", "2222"),
/// ];
/// let new = vec![
///     FileRecord::new("config.ini", "/v2/config.ini", "2222"),
///     FileRecord::new("defaults.ini", "/v2/defaults.ini", "2222"),
/// ];
///
/// let result = match_snapshots(&old, &new).unwrap();
/// assert_eq!(result.modified.len(), 1);
/// assert_eq!(result.modified[0].old_md5, "1111");
/// assert_eq!(result.modified[0].new_md5, "2222");
/// ```
pub fn match_snapshots(lhs: &[FileRecord], rhs: &[FileRecord]) -> Result<MatchResult> {
    validate_records(lhs, "lhs")?;
    validate_records(rhs, "rhs")?;

    debug!(
        "Matching {} lhs records against {} rhs records",
        lhs.len(),
        rhs.len()
    );

    let lhs_groups = HashGroups::from_records(lhs);
    let mut rhs_groups = HashGroups::from_records(rhs);

    let mut result = MatchResult::default();

    // Left pass: every left record lands in exactly one of unchanged,
    // renamed or deleted.
    for (md5, lhs_files) in lhs_groups.iter() {
        if !rhs_groups.contains(md5) {
            result.deleted.extend(lhs_files.iter().cloned());
            continue;
        }

        for lhs_file in lhs_files {
            if let Some(rhs_file) = rhs_groups.find_by_filename(md5, &lhs_file.filename) {
                // Name and content both survived. The pool keeps the record;
                // only rename targets are consumed.
                result.unchanged.push(UnchangedPair {
                    lhs: lhs_file.clone(),
                    rhs: rhs_file,
                    md5: md5.to_string(),
                });
            } else if let Some(rhs_file) = rhs_groups.take_front(md5) {
                // Content survived under a new name; the first available
                // pool record is the target.
                result.renamed.push(RenamedPair {
                    old: lhs_file.clone(),
                    new: rhs_file,
                    md5: md5.to_string(),
                });
            } else {
                // Earlier renames in this group consumed the whole pool.
                result.deleted.push(lhs_file.clone());
            }
        }
    }

    // Right pass over whatever the rename consumption left behind. Name
    // lookups scan the original left input, not the grouped pools, so a
    // record already binned above can also surface as modified.
    for (md5, rhs_files) in rhs_groups.iter() {
        if !lhs_groups.contains(md5) {
            result.added.extend(rhs_files.iter().cloned());
            continue;
        }

        for rhs_file in rhs_files {
            if let Some(lhs_file) = lhs.iter().find(|r| r.filename == rhs_file.filename) {
                if lhs_file.md5 != rhs_file.md5 {
                    result.modified.push(ModifiedPair {
                        old: lhs_file.clone(),
                        new: rhs_file.clone(),
                        old_md5: lhs_file.md5.clone(),
                        new_md5: rhs_file.md5.clone(),
                    });
                }
            }
        }
    }

    debug!(
        "Match complete: {} unchanged, {} renamed, {} modified, {} added, {} deleted",
        result.unchanged.len(),
        result.renamed.len(),
        result.modified.len(),
        result.added.len(),
        result.deleted.len()
    );

    Ok(result)
}

/// Reject records that cannot participate in matching
fn validate_records(records: &[FileRecord], side: &'static str) -> Result<()> {
    for (index, record) in records.iter().enumerate() {
        if record.filename.is_empty() {
            return Err(SnapdiffError::invalid_record(side, index, "empty filename"));
        }
        if record.md5.is_empty() {
            return Err(SnapdiffError::invalid_record(side, index, "empty md5"));
        }
    }
    Ok(())
}
