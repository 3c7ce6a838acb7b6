//! Snapshot scanning
//!
//! This module walks one snapshot root and produces the [`FileRecord`] list
//! the matcher consumes: every regular file, hashed with MD5, keyed by its
//! `/`-separated path relative to the root.
//!
//! Scanning is deliberately literal. Unlike source-tree tooling, a snapshot
//! is diffed exactly as it sits on disk: hidden files are included and
//! `.gitignore` files in the tree are recorded as ordinary files rather
//! than interpreted. The only filtering comes from explicitly configured
//! exclude patterns (gitignore syntax, applied as walker overrides).
//!
//! Hashing runs on a dedicated thread pool sized by the scanner's worker
//! count, so two sides of a comparison can be scanned with different
//! levels of concurrency.
//!
//! ## Example
//!
//! ```rust,ignore
//! use snapdiff::SnapshotScanner;
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let scanner = SnapshotScanner::new(PathBuf::from("./release-v2"))
//!     .with_exclude_patterns(vec!["*.log".to_string()])
//!     .with_workers(4);
//!
//! let records = scanner.scan::<fn(snapdiff::types::ProgressInfo)>(None)?;
//! println!("Found {} files", records.len());
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, SnapdiffError};
use crate::types::{FileRecord, ProgressInfo};
use crate::utils;
use ignore::{overrides::OverrideBuilder, WalkBuilder, WalkState};
use parking_lot::Mutex;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Scanner producing the file records of one snapshot
///
/// Configured through builder methods and consumed by [`scan`](Self::scan).
/// The returned records are sorted by filename so repeated scans of the
/// same tree feed the matcher in the same order.
#[derive(Debug)]
pub struct SnapshotScanner {
    /// Snapshot root to scan
    root: PathBuf,
    /// Exclude patterns in gitignore syntax
    exclude_patterns: Vec<String>,
    /// Whether to follow symbolic links during traversal
    follow_symlinks: bool,
    /// Number of hashing workers
    workers: usize,
}

impl SnapshotScanner {
    /// Create a scanner with default settings
    ///
    /// Defaults: no exclude patterns, symlinks not followed, one hashing
    /// worker per CPU core.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            exclude_patterns: Vec::new(),
            follow_symlinks: false,
            workers: num_cpus::get(),
        }
    }

    /// Set exclude patterns (gitignore syntax)
    ///
    /// Matching files are left out of the snapshot entirely. A leading `!`
    /// re-includes a file a broader pattern excluded.
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Set symbolic link following behavior
    ///
    /// When enabled, link targets are hashed as regular files under the
    /// link's name. When disabled (default), links are skipped.
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Set the number of hashing workers (minimum 1)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Walk the snapshot root and hash every file
    ///
    /// Returns one [`FileRecord`] per regular file, sorted by filename.
    /// The optional callback fires once per hashed file with running
    /// progress, from whichever worker finished the file.
    ///
    /// # Errors
    ///
    /// - [`SnapdiffError::Io`] if the root cannot be resolved or a file
    ///   cannot be read; a single unreadable file fails the whole scan
    /// - [`SnapdiffError::Walk`] if traversal fails
    /// - [`SnapdiffError::InvalidPattern`] if an exclude pattern does not
    ///   parse
    /// - [`SnapdiffError::PathConversion`] if a file path is not UTF-8
    /// - [`SnapdiffError::ThreadPool`] if the hashing pool cannot be built
    pub fn scan<F>(&self, progress_callback: Option<F>) -> Result<Vec<FileRecord>>
    where
        F: Fn(ProgressInfo) + Send + Sync,
    {
        let start = Instant::now();
        let root = fs::canonicalize(&self.root)?;

        let mut walker_builder = WalkBuilder::new(&root);
        walker_builder
            .follow_links(self.follow_symlinks)
            .hidden(false) // Hidden files are part of the snapshot
            .parents(false) // No ignore rules from outside the root
            .ignore(false) // .ignore files in the tree are data, not config
            .git_ignore(false) // Same for .gitignore files
            .git_global(false)
            .git_exclude(false)
            .require_git(false)
            .threads(self.workers);

        let mut override_builder = OverrideBuilder::new(&root);
        for pattern in &self.exclude_patterns {
            // In override builder, patterns need ! prefix to exclude
            let final_pattern = if let Some(stripped) = pattern.strip_prefix('!') {
                stripped.to_string()
            } else {
                format!("!{}", pattern)
            };

            override_builder
                .add(&final_pattern)
                .map_err(|e| SnapdiffError::InvalidPattern(format!("{}: {}", pattern, e)))?;
        }
        let overrides = override_builder
            .build()
            .map_err(|e| SnapdiffError::InvalidPattern(e.to_string()))?;
        walker_builder.overrides(overrides);

        // Collect file paths first, then hash them as one batch on the
        // bounded pool.
        let paths_to_hash = Arc::new(Mutex::new(Vec::<PathBuf>::new()));
        let walk_error = Arc::new(Mutex::new(None::<ignore::Error>));

        walker_builder.build_parallel().run(|| {
            let paths_to_hash = Arc::clone(&paths_to_hash);
            let walk_error = Arc::clone(&walk_error);

            Box::new(move |entry_result| {
                match entry_result {
                    Ok(entry) => {
                        let is_file = entry
                            .file_type()
                            .map(|file_type| file_type.is_file())
                            .unwrap_or(false);
                        // Directories and unfollowed symlinks carry no
                        // content to record.
                        if is_file {
                            paths_to_hash.lock().push(entry.path().to_path_buf());
                        }
                        WalkState::Continue
                    }
                    Err(e) => {
                        *walk_error.lock() = Some(e);
                        WalkState::Quit
                    }
                }
            })
        });

        if let Some(e) = walk_error.lock().take() {
            return Err(e.into());
        }

        let paths_vec = std::mem::take(&mut *paths_to_hash.lock());
        let total = paths_vec.len();
        let processed_count = AtomicUsize::new(0);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| SnapdiffError::ThreadPool(e.to_string()))?;

        let records: Result<Vec<FileRecord>> = pool.install(|| {
            paths_vec
                .par_iter()
                .map(|path| {
                    let record = process_file_record(path, &root)?;
                    let processed = processed_count.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(ref callback) = progress_callback {
                        callback(ProgressInfo {
                            current_item: Some(record.filename.clone()),
                            processed,
                            total: Some(total),
                        });
                    }
                    Ok(record)
                })
                .collect()
        });
        let mut records = records?;

        records.sort_by(|a, b| a.filename.cmp(&b.filename));

        debug!(
            "Scanned {} files under {:?} in {:?}",
            records.len(),
            root,
            start.elapsed()
        );
        Ok(records)
    }
}

/// Hash one file and build its record
fn process_file_record(path: &Path, root: &Path) -> Result<FileRecord> {
    let filename = utils::relative_filename(path, root)?;
    let md5 = utils::hash_file_content(path)?;
    Ok(FileRecord::new(filename, path, md5))
}
