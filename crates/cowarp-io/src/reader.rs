//! CSV signal-matrix reader with full input validation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cowarp_warp::Signal;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{Dataset, SampleId};

/// Reads one signal per row from a CSV file.
///
/// Expected CSV format:
/// - Header row required (first column is the sample id, remaining columns are positions)
/// - `id,x0,x1,...,xn`
/// - One row per sample, all rows must have the same number of columns
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::NoSignalColumns`] | Header has only the id column |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, or unparseable float |
/// | [`IoError::DuplicateSampleId`] | Same id appears twice |
pub struct SignalReader {
    path: PathBuf,
}

impl SignalReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }

    fn non_finite(&self, row_index: usize, col_index: usize, raw: &str) -> IoError {
        IoError::NonFiniteValue {
            path: self.path.clone(),
            row_index,
            col_index,
            raw: raw.to_string(),
        }
    }

    /// Read and validate the CSV file, returning a [`Dataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Dataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible so that ragged rows surface as InconsistentRowLength
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let expected_cols = rdr.headers().map_err(|e| self.csv_error(e))?.len();
        if expected_cols < 2 {
            return Err(IoError::NoSignalColumns {
                path: self.path.clone(),
            });
        }
        debug!(expected_cols, "read CSV header");

        let mut sample_ids = Vec::new();
        let mut signals = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;
            let id = record.get(0).unwrap_or("").to_string();

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    sample_id: id,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            if let Some(&first_row) = seen.get(&id) {
                return Err(IoError::DuplicateSampleId {
                    path: self.path.clone(),
                    sample_id: id,
                    first_row,
                    second_row: row_index,
                });
            }
            seen.insert(id.clone(), row_index);

            let values = record
                .iter()
                .skip(1)
                .enumerate()
                .map(|(col_index, raw)| match raw.parse::<f64>() {
                    Ok(value) if value.is_finite() => Ok(value),
                    _ => Err(self.non_finite(row_index, col_index, raw)),
                })
                .collect::<Result<Vec<f64>, IoError>>()?;

            sample_ids.push(SampleId::new(id));
            signals.push(Signal::new(values)?);
        }

        if signals.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_samples = signals.len(),
            n_points = expected_cols - 1,
            "dataset loaded"
        );

        Ok(Dataset {
            sample_ids,
            signals,
        })
    }
}
