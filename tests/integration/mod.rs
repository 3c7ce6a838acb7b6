//! Comprehensive integration tests for snapdiff
//!
//! Tests end-to-end snapshot comparison: generated trees, controlled
//! mutations with exact expected bucket counts, and artifact output.

use ::snapdiff::*;
use tempfile::TempDir;
use std::fs;
use std::path::{Path, PathBuf};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use tracing::info;

/// Test harness for two-sided snapshot scenarios
pub struct SnapshotHarness {
    pub lhs_dir: TempDir,
    pub rhs_dir: TempDir,
    pub output_dir: TempDir,
    pub file_generator: FileGenerator,
}

impl SnapshotHarness {
    /// Create a new test harness
    pub fn new() -> Self {
        Self {
            lhs_dir: TempDir::new().unwrap(),
            rhs_dir: TempDir::new().unwrap(),
            output_dir: TempDir::new().unwrap(),
            file_generator: FileGenerator::new(42),
        }
    }

    /// Populate both sides with an identical generated tree
    ///
    /// Returns the number of files written per side. Every payload is
    /// serial-tagged, so each hash group starts as a singleton.
    pub fn seed_identical(&mut self, config: &TreeConfig) -> anyhow::Result<usize> {
        let mut count = 0;

        for dir_depth in 1..=config.max_depth {
            for dir_idx in 0..config.dirs_per_level {
                let mut relative = PathBuf::new();
                for level in 0..dir_depth {
                    relative = relative.join(format!("dir_{}_{}", level, dir_idx));
                }
                fs::create_dir_all(self.lhs_dir.path().join(&relative))?;
                fs::create_dir_all(self.rhs_dir.path().join(&relative))?;

                for file_idx in 0..config.files_per_dir {
                    let file_rel = relative.join(format!("file_{}.txt", file_idx));
                    let content = self
                        .file_generator
                        .generate_file_content(config.file_size_range.clone());
                    fs::write(self.lhs_dir.path().join(&file_rel), &content)?;
                    fs::write(self.rhs_dir.path().join(&file_rel), &content)?;
                    count += 1;
                }
            }
        }

        Ok(count)
    }

    /// Apply a controlled mutation plan to the right-hand tree
    ///
    /// Targets are taken in sorted order off the front of the file list and
    /// never overlap, so the returned expectation is exact.
    pub fn apply_plan(&mut self, plan: &MutationPlan) -> anyhow::Result<ExpectedChanges> {
        let root = self.rhs_dir.path().to_path_buf();

        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file() {
                files.push(entry.path().to_path_buf());
            }
        }
        files.sort();

        let total = files.len();
        let needed = plan.renames + plan.edits + plan.deletes + 2 * plan.resets;
        anyhow::ensure!(
            total >= needed,
            "plan needs {} distinct files, tree has {}",
            needed,
            total
        );
        let mut queue = files.into_iter();

        for _ in 0..plan.renames {
            let path = queue.next().unwrap();
            let renamed = path.with_file_name(format!(
                "renamed_{}",
                path.file_name().unwrap().to_string_lossy()
            ));
            fs::rename(&path, &renamed)?;
        }

        for _ in 0..plan.edits {
            let path = queue.next().unwrap();
            let content = self
                .file_generator
                .generate_file_content(plan.file_size_range.clone());
            fs::write(&path, &content)?;
        }

        for _ in 0..plan.deletes {
            let path = queue.next().unwrap();
            fs::remove_file(&path)?;
        }

        // Reset targets adopt the content of an untouched partner file, so
        // the new content still exists on the left under another name.
        for _ in 0..plan.resets {
            let target = queue.next().unwrap();
            let partner = queue.next().unwrap();
            fs::copy(&partner, &target)?;
        }

        for idx in 0..plan.adds {
            let path = root.join(format!("added_file_{}.txt", idx));
            let content = self
                .file_generator
                .generate_file_content(plan.file_size_range.clone());
            fs::write(&path, &content)?;
        }

        Ok(ExpectedChanges {
            unchanged: total - plan.renames - plan.edits - plan.deletes - plan.resets,
            renamed: plan.renames,
            modified: plan.resets,
            added: plan.edits + plan.adds,
            deleted: plan.edits + plan.deletes + plan.resets,
        })
    }

    /// Scan the left-hand tree
    pub fn scan_lhs(&self) -> anyhow::Result<Vec<FileRecord>> {
        let records = SnapshotScanner::new(self.lhs_dir.path().to_path_buf())
            .with_workers(2)
            .scan::<fn(ProgressInfo)>(None)?;
        Ok(records)
    }

    /// Scan the right-hand tree
    pub fn scan_rhs(&self) -> anyhow::Result<Vec<FileRecord>> {
        let records = SnapshotScanner::new(self.rhs_dir.path().to_path_buf())
            .with_workers(2)
            .scan::<fn(ProgressInfo)>(None)?;
        Ok(records)
    }

    /// Scan both sides and run the matcher
    pub fn compare(&self) -> anyhow::Result<MatchResult> {
        let lhs = self.scan_lhs()?;
        let rhs = self.scan_rhs()?;
        Ok(match_snapshots(&lhs, &rhs)?)
    }
}

/// File generator for test data
///
/// Every generated payload carries a serial number, so no two payloads
/// ever hash alike unless a test copies one deliberately.
pub struct FileGenerator {
    rng: StdRng,
    serial: u64,
}

impl FileGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            serial: 0,
        }
    }

    /// Generate realistic text content with a unique tail
    pub fn generate_file_content(&mut self, size_range: std::ops::Range<usize>) -> Vec<u8> {
        let size = self.rng.random_range(size_range);
        let mut content = Vec::with_capacity(size + 16);

        let words = ["the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "lorem", "ipsum"];
        while content.len() < size {
            let word = words[self.rng.random_range(0..words.len())];
            content.extend_from_slice(word.as_bytes());
            content.push(b' ');
        }
        content.truncate(size);

        self.serial += 1;
        content.extend_from_slice(format!("#{:08}", self.serial).as_bytes());
        content
    }

    /// Generate binary file content, also serial-tagged
    pub fn generate_binary_content(&mut self, size: usize) -> Vec<u8> {
        let mut content = vec![0u8; size];
        self.rng.fill(&mut content[..]);
        self.serial += 1;
        content.extend_from_slice(&self.serial.to_le_bytes());
        content
    }
}

#[derive(Debug, Clone)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub dirs_per_level: usize,
    pub files_per_dir: usize,
    pub file_size_range: std::ops::Range<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            dirs_per_level: 3,
            files_per_dir: 5,
            file_size_range: 100..2_000,
        }
    }
}

/// Mutation counts applied to the right-hand tree
///
/// `edits` rewrite a file with fresh unique content; since the new bytes
/// exist nowhere on the left, each edit classifies as one delete plus one
/// add. `resets` overwrite a file with the content of an untouched partner
/// file, which is what produces a `modified` pair.
#[derive(Debug, Clone)]
pub struct MutationPlan {
    pub renames: usize,
    pub edits: usize,
    pub deletes: usize,
    pub adds: usize,
    pub resets: usize,
    pub file_size_range: std::ops::Range<usize>,
}

/// Exact bucket sizes a plan must produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedChanges {
    pub unchanged: usize,
    pub renamed: usize,
    pub modified: usize,
    pub added: usize,
    pub deleted: usize,
}

/// Collect every file under `root` as sorted `/`-separated relative paths
fn collect_relative_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file() {
            let relative = entry.path().strip_prefix(root).unwrap();
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            files.push(parts.join("/"));
        }
    }
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_generated_tree_classification() {
        let mut harness = SnapshotHarness::new();
        let total = harness
            .seed_identical(&TreeConfig {
                max_depth: 2,
                dirs_per_level: 3,
                files_per_dir: 4,
                file_size_range: 64..512,
            })
            .unwrap();
        assert_eq!(total, 24);

        let expected = harness
            .apply_plan(&MutationPlan {
                renames: 3,
                edits: 2,
                deletes: 2,
                adds: 3,
                resets: 2,
                file_size_range: 64..512,
            })
            .unwrap();
        info!("Expecting {:?}", expected);

        let result = harness.compare().unwrap();
        assert_eq!(result.unchanged.len(), expected.unchanged);
        assert_eq!(result.renamed.len(), expected.renamed);
        assert_eq!(result.modified.len(), expected.modified);
        assert_eq!(result.added.len(), expected.added);
        assert_eq!(result.deleted.len(), expected.deleted);
        assert!(result.moved.is_empty());

        // Every left record lands in exactly one primary bucket
        assert_eq!(
            result.unchanged.len() + result.renamed.len() + result.deleted.len(),
            total
        );
    }

    #[test]
    #[traced_test]
    fn test_unmodified_tree_is_all_unchanged() {
        let mut harness = SnapshotHarness::new();
        let total = harness.seed_identical(&TreeConfig::default()).unwrap();
        assert_eq!(total, 45);

        let result = harness.compare().unwrap();
        assert_eq!(result.unchanged.len(), total);
        assert!(!result.has_changes());
        for pair in &result.unchanged {
            assert_eq!(pair.lhs.filename, pair.rhs.filename);
            assert_eq!(pair.lhs.md5, pair.rhs.md5);
            assert_eq!(pair.md5, pair.lhs.md5);
        }
    }

    #[test]
    fn test_repeated_runs_are_deterministic() {
        let mut harness = SnapshotHarness::new();
        harness
            .seed_identical(&TreeConfig {
                max_depth: 2,
                dirs_per_level: 2,
                files_per_dir: 5,
                file_size_range: 64..512,
            })
            .unwrap();
        harness
            .apply_plan(&MutationPlan {
                renames: 2,
                edits: 2,
                deletes: 1,
                adds: 2,
                resets: 1,
                file_size_range: 64..256,
            })
            .unwrap();

        let lhs = harness.scan_lhs().unwrap();
        let rhs = harness.scan_rhs().unwrap();

        let out_a = harness.output_dir.path().join("run_a");
        let out_b = harness.output_dir.path().join("run_b");
        materialize(&lhs, &rhs, &out_a).unwrap();
        materialize(&lhs, &rhs, &out_b).unwrap();

        let summary_a = fs::read(out_a.join("analysis.json")).unwrap();
        let summary_b = fs::read(out_b.join("analysis.json")).unwrap();
        assert_eq!(summary_a, summary_b);

        let renamed_a = fs::read(out_a.join("modify/renamed-files.json")).unwrap();
        let renamed_b = fs::read(out_b.join("modify/renamed-files.json")).unwrap();
        assert_eq!(renamed_a, renamed_b);
    }

    #[test]
    #[traced_test]
    fn test_staged_artifacts_match_result() {
        let mut harness = SnapshotHarness::new();
        harness
            .seed_identical(&TreeConfig {
                max_depth: 1,
                dirs_per_level: 2,
                files_per_dir: 6,
                file_size_range: 32..128,
            })
            .unwrap();
        harness
            .apply_plan(&MutationPlan {
                renames: 1,
                edits: 1,
                deletes: 2,
                adds: 2,
                resets: 1,
                file_size_range: 32..128,
            })
            .unwrap();

        let lhs = harness.scan_lhs().unwrap();
        let rhs = harness.scan_rhs().unwrap();
        let result = match_snapshots(&lhs, &rhs).unwrap();

        let out = harness.output_dir.path();
        let entries = materialize(&lhs, &rhs, out).unwrap();
        assert_eq!(entries.len(), result.modified.len());
        stage_records(&result.added, &out.join("new")).unwrap();
        stage_records(&result.deleted, &out.join("delete")).unwrap();

        let staged_new = collect_relative_files(&out.join("new"));
        let mut expected_new: Vec<String> =
            result.added.iter().map(|r| r.filename.clone()).collect();
        expected_new.sort();
        assert_eq!(staged_new, expected_new);

        let staged_delete = collect_relative_files(&out.join("delete"));
        let mut expected_delete: Vec<String> =
            result.deleted.iter().map(|r| r.filename.clone()).collect();
        expected_delete.sort();
        assert_eq!(staged_delete, expected_delete);

        let summary: AnalysisSummary =
            serde_json::from_str(&fs::read_to_string(out.join("analysis.json")).unwrap()).unwrap();
        assert_eq!(summary.analysis, result.counts());
        assert_eq!(summary.modified.len(), result.modified.len());
    }

    #[test]
    fn test_duplicate_content_trees() {
        let mut harness = SnapshotHarness::new();
        let blob = harness.file_generator.generate_binary_content(512);

        for side in [harness.lhs_dir.path(), harness.rhs_dir.path()] {
            fs::create_dir_all(side.join("themes/light")).unwrap();
            fs::create_dir_all(side.join("themes/dark")).unwrap();
            fs::write(side.join("themes/light/banner.bin"), &blob).unwrap();
            fs::write(side.join("themes/dark/banner.bin"), &blob).unwrap();
            fs::write(side.join("logo.bin"), &blob).unwrap();
        }

        let result = harness.compare().unwrap();
        // Name matches never consume the rename pool, so every copy of the
        // shared blob pairs with its own counterpart
        assert_eq!(result.unchanged.len(), 3);
        assert!(!result.has_changes());
    }
}
