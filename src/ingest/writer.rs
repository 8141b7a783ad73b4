use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::csv::ReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::core::SiftError;

use super::sniff::Layout;

const BATCH_SIZE: usize = 8192;

/// Removes the store file, if any. Succeeds when there is nothing to drop.
pub fn drop_store(store_path: &Path) -> Result<(), SiftError> {
    match std::fs::remove_file(store_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SiftError::Ingestion(format!(
            "dropping store {}: {}",
            store_path.display(),
            e
        ))),
    }
}

/// Converts the raw file into a Parquet store using `layout`, returning the
/// number of rows written. The store only appears once fully written.
pub fn write_store(raw_path: &Path, store_path: &Path, layout: &Layout) -> Result<u64, SiftError> {
    let tmp_path = temp_path(store_path);
    match write_to(raw_path, &tmp_path, layout) {
        Ok(rows) => {
            std::fs::rename(&tmp_path, store_path).map_err(|e| {
                let _ = std::fs::remove_file(&tmp_path);
                SiftError::Ingestion(format!(
                    "moving store into place at {}: {}",
                    store_path.display(),
                    e
                ))
            })?;
            Ok(rows)
        }
        Err(e) => {
            let _ = std::fs::remove_file(&tmp_path);
            Err(e)
        }
    }
}

fn temp_path(store_path: &Path) -> PathBuf {
    let mut name = store_path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_to(raw_path: &Path, out_path: &Path, layout: &Layout) -> Result<u64, SiftError> {
    let schema = Arc::new(layout.schema.clone());

    let input = File::open(raw_path).map_err(|e| {
        SiftError::Ingestion(format!("opening {}: {}", raw_path.display(), e))
    })?;
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_delimiter(layout.delimiter)
        .with_batch_size(BATCH_SIZE)
        .build(input)
        .map_err(|e| SiftError::Ingestion(e.to_string()))?;

    let output = File::create(out_path).map_err(|e| {
        SiftError::Ingestion(format!("creating {}: {}", out_path.display(), e))
    })?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(output, schema, Some(props))
        .map_err(|e| SiftError::Ingestion(e.to_string()))?;

    let mut rows: u64 = 0;
    for batch in reader {
        let batch = batch.map_err(|e| SiftError::Ingestion(e.to_string()))?;
        rows += batch.num_rows() as u64;
        writer
            .write(&batch)
            .map_err(|e| SiftError::Ingestion(e.to_string()))?;
    }
    writer
        .close()
        .map_err(|e| SiftError::Ingestion(e.to_string()))?;

    Ok(rows)
}
