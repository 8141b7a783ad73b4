//! Test and benchmark utilities.
//!
//! This module is only available when the `testutil` feature is enabled.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::conf::{Config, StorageConfig};
use crate::core::TableSummary;
use crate::service::SiftService;
use crate::workspace::Workspace;

/// Header of the files produced by [`generate_csv_file`].
pub const GENERATED_HEADER: &str = "id,label,value,flag";

/// Write a CSV file from a header line and pre-joined record lines.
pub fn write_csv(path: &Path, header: &str, records: &[&str]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", header)?;
    for record in records {
        writeln!(out, "{}", record)?;
    }
    out.flush()
}

/// Generate a deterministic CSV file with `num_rows` rows, where:
/// - `id` is the row index
/// - `label` is `row_<index>`
/// - `value` is half the row index
/// - `flag` is true for odd indices, false for even
pub fn generate_csv_file(path: &Path, num_rows: usize) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", GENERATED_HEADER)?;
    for i in 0..num_rows {
        writeln!(out, "{},row_{},{},{}", i, i, i as f64 * 0.5, i % 2 == 1)?;
    }
    out.flush()
}

/// A service rooted in a fresh temporary upload directory.
/// Returns (SiftService, TempDir) - keep TempDir alive!
pub fn setup_test_service() -> (SiftService, tempfile::TempDir) {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let config = Config {
        storage: StorageConfig {
            upload_dir: temp_dir.path().join("uploads"),
        },
        ..Config::default()
    };
    (SiftService::new(config), temp_dir)
}

/// Set up a service with one ingested workspace of `num_rows` generated rows.
pub async fn setup_ingested_workspace(
    num_rows: usize,
) -> (SiftService, Workspace, TableSummary, tempfile::TempDir) {
    let (service, temp_dir) = setup_test_service();
    let workspace = service.create_workspace().unwrap();
    generate_csv_file(&workspace.raw_path, num_rows).unwrap();
    let summary = service.ingest(&workspace).await.unwrap();
    (service, workspace, summary, temp_dir)
}

// Benchmark-specific utilities

/// RNG seed for deterministic benchmark data
pub const BENCH_RNG_SEED: u64 = 42;

/// Number of distinct categories in benchmark files
pub const BENCH_NUM_CATEGORIES: usize = 16;

/// Generate a CSV file with random measurements for benchmarks.
/// Columns: id, category, amount, quantity.
pub fn bench_generate_csv(path: &Path, num_rows: usize) -> std::io::Result<()> {
    let mut rng = StdRng::seed_from_u64(BENCH_RNG_SEED);
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "id,category,amount,quantity")?;
    for i in 0..num_rows {
        let category = rng.gen_range(0..BENCH_NUM_CATEGORIES);
        let amount: f64 = rng.gen_range(0.0..10_000.0);
        let quantity: u32 = rng.gen_range(1..100);
        writeln!(out, "{},cat_{},{:.2},{}", i, category, amount, quantity)?;
    }
    out.flush()
}
