//! # Snapdiff CLI - Content-Addressed Snapshot Comparison
//!
//! Command-line front end for the snapdiff library.
//!
//! ## Features
//! - Scan two directory trees with independently bounded hashing pools
//! - Classify every file as unchanged, renamed, modified, added or deleted
//! - Stage added and deleted files into review directories
//! - Materialize modified pairs with a JSON analysis summary
//!
//! ## Usage
//! ```bash
//! # Compare two release trees
//! snapdiff -l ./release-v1 -r ./release-v2 -o ./diff-out
//!
//! # Bound the per-side hashing concurrency
//! snapdiff -l old/ -r new/ -o out/ -n 4 -m 8
//!
//! # Skip log files on both sides and show progress
//! snapdiff -l old/ -r new/ -o out/ --exclude '*.log' --progress
//! ```

use clap::Parser;
use colored::*;
use humantime::format_duration;
use indicatif::{ProgressBar, ProgressStyle};
use snapdiff::utils::{format_bytes, write_json_pretty};
use snapdiff::{
    match_snapshots, materialize, stage_records, FileRecord, ProgressInfo, Result, SnapdiffError,
    SnapshotScanner,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Snapdiff CLI - classify changes between two directory snapshots
#[derive(Parser)]
#[command(name = "snapdiff")]
#[command(version = "0.1.0")]
#[command(about = "Compare two directory snapshots by content hash and stage the differences")]
#[command(long_about = None)]
struct Cli {
    /// Left-hand (old) snapshot root
    #[arg(short = 'l', long = "lhs")]
    lhs: PathBuf,

    /// Right-hand (new) snapshot root
    #[arg(short = 'r', long = "rhs")]
    rhs: PathBuf,

    /// Output directory for reports and staged files
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// Hashing workers for the left snapshot (defaults to CPU count)
    #[arg(short = 'n', long = "lhs-workers")]
    lhs_workers: Option<usize>,

    /// Hashing workers for the right snapshot (defaults to CPU count)
    #[arg(short = 'm', long = "rhs-workers")]
    rhs_workers: Option<usize>,

    /// Exclude patterns applied to both snapshots (gitignore syntax)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Follow symbolic links while scanning
    #[arg(long)]
    follow_symlinks: bool,

    /// Show scan progress
    #[arg(long)]
    progress: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    // Disable colors if needed
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main command runner
fn run(cli: Cli) -> Result<()> {
    ensure_snapshot_dir("Left", &cli.lhs)?;
    ensure_snapshot_dir("Right", &cli.rhs)?;

    let start = Instant::now();

    println!("{}", "Comparing snapshots".blue().bold());
    println!("  Left: {}", cli.lhs.display().to_string().cyan());
    println!("  Right: {}", cli.rhs.display().to_string().cyan());
    println!("  Output: {}", cli.output.display().to_string().cyan());
    println!(
        "  Started: {}",
        chrono::Utc::now()
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .dimmed()
    );

    let lhs = scan_side(
        "left",
        &cli.lhs,
        cli.lhs_workers,
        &cli.exclude,
        cli.follow_symlinks,
        cli.progress,
    )?;
    let rhs = scan_side(
        "right",
        &cli.rhs,
        cli.rhs_workers,
        &cli.exclude,
        cli.follow_symlinks,
        cli.progress,
    )?;

    // Persist the raw summaries before comparing
    write_json_pretty(&cli.output.join("file-summary-lhs.json"), &lhs)?;
    write_json_pretty(&cli.output.join("file-summary-rhs.json"), &rhs)?;

    println!("\n{}", "Matching records...".blue().bold());
    let result = match_snapshots(&lhs, &rhs)?;

    println!("{} Comparison complete", "✓".green().bold());
    println!("  Unchanged: {}", result.unchanged.len().to_string().cyan());
    println!("  Renamed: {}", result.renamed.len().to_string().yellow());
    println!("  Modified: {}", result.modified.len().to_string().yellow());
    println!("  Added: {}", result.added.len().to_string().green());
    println!("  Deleted: {}", result.deleted.len().to_string().red());

    println!("\n{}", "Staging changed files...".blue().bold());
    let staged_new = stage_records(&result.added, &cli.output.join("new"))?;
    let staged_deleted = stage_records(&result.deleted, &cli.output.join("delete"))?;
    let modified_entries = materialize(&lhs, &rhs, &cli.output)?;

    println!("{} Materialization complete", "✓".green().bold());
    println!(
        "  Analysis: {}",
        cli.output.join("analysis.json").display().to_string().cyan()
    );
    println!(
        "  Modified pairs copied: {}",
        modified_entries.len().to_string().yellow()
    );
    println!("  Added files staged: {}", staged_new.to_string().green());
    println!("  Deleted files staged: {}", staged_deleted.to_string().red());

    let elapsed = Duration::from_millis(start.elapsed().as_millis() as u64);
    println!(
        "\n{}",
        format!("Total time: {}", format_duration(elapsed)).dimmed()
    );

    Ok(())
}

/// Scan one snapshot and report its size and timing
fn scan_side(
    label: &str,
    root: &Path,
    workers: Option<usize>,
    exclude: &[String],
    follow_symlinks: bool,
    show_progress: bool,
) -> Result<Vec<FileRecord>> {
    println!(
        "\n{}",
        format!("Scanning {} snapshot...", label).blue().bold()
    );

    let scan_start = Instant::now();
    let mut scanner = SnapshotScanner::new(root.to_path_buf())
        .with_exclude_patterns(exclude.to_vec())
        .with_follow_symlinks(follow_symlinks);
    if let Some(workers) = workers {
        scanner = scanner.with_workers(workers);
    }

    let records = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(format!("Hashing {} files...", label));

        let pb_update = pb.clone();
        let records = scanner.scan(Some(move |info: ProgressInfo| {
            if let Some(total) = info.total {
                pb_update.set_message(format!("Hashing {}/{} files", info.processed, total));
            }
        }))?;
        pb.finish_and_clear();
        records
    } else {
        scanner.scan::<fn(ProgressInfo)>(None)?
    };

    let total_bytes: u64 = records
        .iter()
        .filter_map(|record| fs::metadata(&record.path).ok())
        .map(|metadata| metadata.len())
        .sum();
    let elapsed = Duration::from_millis(scan_start.elapsed().as_millis() as u64);

    println!("{} Scanned {} snapshot", "✓".green().bold(), label);
    println!("  Files: {}", records.len().to_string().cyan());
    println!("  Size: {}", format_bytes(total_bytes).cyan());
    println!("  Time: {}", format_duration(elapsed).to_string().cyan());

    Ok(records)
}

// Helper functions

/// Require an existing directory for a snapshot argument
fn ensure_snapshot_dir(label: &'static str, path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(SnapdiffError::not_a_directory(
            label,
            path.display().to_string(),
        ));
    }
    Ok(())
}
