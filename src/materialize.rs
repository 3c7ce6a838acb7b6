//! Materialization of match results into review artifacts
//!
//! The matcher output is in-memory only; this module turns it into the
//! on-disk layout reviewers consume:
//!
//! ```text
//! <output_root>/
//!   analysis.json              modified pairs + bucket counts
//!   modify/
//!     renamed-files.json       renamed pairs with full records
//!     old/<filename>           left-side copy of each modified file
//!     new/<filename>           right-side copy of each modified file
//! ```
//!
//! Copies happen before any summary is written, so a failed copy leaves no
//! report that silently omits the failure. Existing artifacts from earlier
//! runs are overwritten in place but never cleaned up.

use crate::error::Result;
use crate::matcher::match_snapshots;
use crate::types::{AnalysisSummary, FileRecord, ModifiedFileEntry, RenamedFileEntry};
use crate::utils::{copy_with_parents, write_json_pretty};
use std::path::Path;
use tracing::debug;

/// Match two snapshots and materialize the result under `output_root`
///
/// Runs [`match_snapshots`] on the inputs, copies every modified pair into
/// `modify/old/` and `modify/new/` for side-by-side review, then writes
/// `analysis.json` and `modify/renamed-files.json`.
///
/// # Arguments
///
/// * `lhs` - records of the old snapshot
/// * `rhs` - records of the new snapshot
/// * `output_root` - directory receiving the artifacts; created on demand
///
/// # Returns
///
/// The modified-file entries, in match order; the same list that lands in
/// `analysis.json`.
///
/// # Errors
///
/// - anything [`match_snapshots`] rejects
/// - [`crate::error::SnapdiffError::Copy`] if a paired file cannot be
///   copied; no summary JSON exists in that case
/// - [`crate::error::SnapdiffError::Io`] / [`crate::error::SnapdiffError::Json`]
///   if writing a summary fails
pub fn materialize(
    lhs: &[FileRecord],
    rhs: &[FileRecord],
    output_root: &Path,
) -> Result<Vec<ModifiedFileEntry>> {
    let result = match_snapshots(lhs, rhs)?;

    let old_dir = output_root.join("modify").join("old");
    let new_dir = output_root.join("modify").join("new");

    // Copies first. A failure here must abort before any summary claims
    // the pair was materialized.
    let mut modified_files = Vec::with_capacity(result.modified.len());
    for pair in &result.modified {
        copy_with_parents(&pair.old.path, &old_dir.join(&pair.old.filename))?;
        copy_with_parents(&pair.new.path, &new_dir.join(&pair.new.filename))?;
        modified_files.push(ModifiedFileEntry::from(pair));
    }
    debug!("Copied {} modified pairs for review", modified_files.len());

    let summary = AnalysisSummary {
        modified: modified_files.clone(),
        analysis: result.counts(),
    };
    write_json_pretty(&output_root.join("analysis.json"), &summary)?;

    let renamed_files: Vec<RenamedFileEntry> =
        result.renamed.iter().map(RenamedFileEntry::from).collect();
    write_json_pretty(
        &output_root.join("modify").join("renamed-files.json"),
        &renamed_files,
    )?;

    debug!(
        "Materialized analysis to {:?} ({} modified, {} renamed)",
        output_root,
        summary.analysis.modified,
        renamed_files.len()
    );
    Ok(modified_files)
}

/// Copy a record list into a flat destination tree
///
/// Each record's physical file lands at `dest_root/<filename>`, with parent
/// directories created on demand. Used for exporting the added and deleted
/// buckets. Returns the number of files copied; the first failure aborts.
pub fn stage_records(records: &[FileRecord], dest_root: &Path) -> Result<usize> {
    for record in records {
        copy_with_parents(&record.path, &dest_root.join(&record.filename))?;
    }
    debug!("Staged {} files into {:?}", records.len(), dest_root);
    Ok(records.len())
}
