//! # snapdiff - Content-addressed file tree diffing
//!
//! A library and CLI for comparing two snapshots of a file tree and
//! classifying every file as unchanged, renamed, modified, added or
//! deleted, using content hashes rather than paths as the primary
//! identity.
//!
//! ## Overview
//!
//! Given a "left" (old) and a "right" (new) snapshot, snapdiff:
//! - scans both trees and hashes every file (MD5)
//! - groups records by hash and matches the two sides: renames (same
//!   content, new name) pair off within a hash group, content changes
//!   surface as delete/add, and same-name collisions with surviving
//!   content are layered on top as modified pairs
//! - materializes the modified pairs as side-by-side copies plus JSON
//!   reports for downstream review
//!
//! The intended use is release auditing: diff two published versions of a
//! product tree and route each category to the right reviewer.
//!
//! ## Architecture
//!
//! Three stateless components run in sequence:
//!
//! - **Scanner** ([`scanner::SnapshotScanner`]): parallel directory walk
//!   plus bounded-concurrency MD5 hashing, producing sorted
//!   [`types::FileRecord`] lists
//! - **Matcher** ([`matcher::match_snapshots`]): pure in-memory
//!   classification with positional tie-breaking; identical inputs always
//!   give identical results
//! - **Materializer** ([`materialize::materialize`]): copies modified
//!   pairs into `modify/old` and `modify/new` and writes `analysis.json`
//!   and `modify/renamed-files.json`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snapdiff::{match_snapshots, materialize, SnapshotScanner};
//! use snapdiff::types::ProgressInfo;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Scan both snapshots
//! let lhs = SnapshotScanner::new(PathBuf::from("./release-v1"))
//!     .scan::<fn(ProgressInfo)>(None)?;
//! let rhs = SnapshotScanner::new(PathBuf::from("./release-v2"))
//!     .scan::<fn(ProgressInfo)>(None)?;
//!
//! // Classify
//! let result = match_snapshots(&lhs, &rhs)?;
//! println!(
//!     "{} unchanged, {} renamed, {} modified, {} added, {} deleted",
//!     result.unchanged.len(),
//!     result.renamed.len(),
//!     result.modified.len(),
//!     result.added.len(),
//!     result.deleted.len(),
//! );
//!
//! // Stage review artifacts
//! let modified = materialize(&lhs, &rhs, &PathBuf::from("./diff-out"))?;
//! println!("{} modified pairs staged for review", modified.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Matching semantics
//!
//! The matcher favors reproducibility over optimality. Same-hash
//! ambiguities (several candidate rename targets) are resolved by taking
//! the first still-available record, not by minimizing renames, and the
//! modified detection runs as a separate pass over the right side that
//! consults the full left input. Two consequences worth knowing:
//!
//! - every left record lands in exactly one of `unchanged`, `renamed` or
//!   `deleted`; `modified` pairs are layered on top and may repeat a file
//!   already counted as deleted
//! - a right-side duplicate of surviving content can land in no bucket at
//!   all
//!
//! See [`matcher`] for the full rules.
//!
//! ## Error Handling
//!
//! All operations return `Result<T, SnapdiffError>`. Input contract
//! violations (malformed records, bad exclude patterns) fail fast before
//! any work; I/O failures during materialization abort before summary
//! reports are written, so a report never silently omits a failed copy.
//!
//! ## Module Organization
//!
//! - [`scanner`]: snapshot walking and hashing
//! - [`matcher`]: the classification algorithm
//! - [`materialize`]: review artifacts and staging copies
//! - [`types`]: records, match results and report shapes
//! - [`error`]: error types and handling
//! - [`utils`]: hashing, path and JSON helpers

// Public API modules
pub mod error;
pub mod matcher;
pub mod materialize;
pub mod scanner;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use error::{Result, SnapdiffError};
pub use matcher::{match_snapshots, HashGroups};
pub use materialize::{materialize, stage_records};
pub use scanner::SnapshotScanner;
pub use types::*;
