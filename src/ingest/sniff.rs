use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema};
use log::debug;

use crate::core::SiftError;

const DELIMITERS: [u8; 4] = [b',', b'\t', b';', b'|'];
const BOM: char = '\u{feff}';

/// Delimiter and column layout inferred from a raw file.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub delimiter: u8,
    pub schema: Schema,
    pub records: usize,
}

/// Infers the layout of `raw_path`, reading every record of the file.
pub fn detect_layout(raw_path: &Path) -> Result<Layout, SiftError> {
    let header = read_header(raw_path)?;
    let candidates = rank_delimiters(&header);
    debug!(
        "Delimiter candidates for {}: {:?}",
        raw_path.display(),
        candidates.iter().map(|d| *d as char).collect::<Vec<_>>()
    );

    let mut last_error = None;
    for delimiter in candidates {
        let file = open(raw_path)?;
        let format = Format::default()
            .with_header(true)
            .with_delimiter(delimiter);
        match format.infer_schema(file, None) {
            Ok((schema, records)) => {
                if schema.fields().is_empty() {
                    return Err(SiftError::Ingestion(format!(
                        "no columns found in {}",
                        raw_path.display()
                    )));
                }
                return Ok(Layout {
                    delimiter,
                    schema: normalize_schema(&schema),
                    records,
                });
            }
            Err(e) => {
                debug!("Delimiter {:?} rejected: {}", delimiter as char, e);
                last_error = Some(e);
            }
        }
    }

    Err(SiftError::Ingestion(match last_error {
        Some(e) => format!("unparsable tabular data in {}: {}", raw_path.display(), e),
        None => format!("unparsable tabular data in {}", raw_path.display()),
    }))
}

fn open(path: &Path) -> Result<File, SiftError> {
    File::open(path)
        .map_err(|e| SiftError::Ingestion(format!("opening {}: {}", path.display(), e)))
}

fn read_header(path: &Path) -> Result<Vec<u8>, SiftError> {
    let mut header = Vec::new();
    BufReader::new(open(path)?)
        .read_until(b'\n', &mut header)
        .map_err(|e| SiftError::Ingestion(format!("reading {}: {}", path.display(), e)))?;
    Ok(header)
}

/// Delimiters present in the header, most frequent first. Falls back to a
/// comma for single-column files.
fn rank_delimiters(header: &[u8]) -> Vec<u8> {
    let mut counted: Vec<(u8, usize)> = DELIMITERS
        .iter()
        .map(|&d| (d, header.iter().filter(|&&b| b == d).count()))
        .filter(|&(_, count)| count > 0)
        .collect();
    counted.sort_by(|a, b| b.1.cmp(&a.1));

    if counted.is_empty() {
        return vec![b','];
    }
    counted.into_iter().map(|(d, _)| d).collect()
}

/// Makes header names usable as SQL identifiers and stores all-empty
/// columns as text.
fn normalize_schema(schema: &Schema) -> Schema {
    let mut seen = HashSet::new();
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let raw = field.name().trim_start_matches(BOM);
            let base = if raw.trim().is_empty() {
                format!("column{}", i)
            } else {
                raw.to_string()
            };

            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{}_{}", base, suffix);
                suffix += 1;
            }

            let dtype = match field.data_type() {
                DataType::Null => DataType::Utf8,
                other => other.clone(),
            };
            Field::new(name, dtype, true)
        })
        .collect();
    Schema::new(fields)
}
