//! CSV and JSON result writers for alignment and dissimilarity outputs.

use std::fs;
use std::path::{Path, PathBuf};

use cowarp_dissim::DissimilarityMatrix;
use cowarp_warp::{BatchOutcome, CowConfig, Segmentation, Signal};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::IoError;
use crate::domain::{ExperimentName, SampleId};

/// Writes alignment and dissimilarity results into an output directory.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_aligned.csv`,
/// `{experiment}_alignment.json` and `{experiment}_dissimilarity.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    fn artifact_path(&self, suffix: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{suffix}", self.experiment.as_str()))
    }

    fn write_json<T: Serialize>(&self, path: &Path, artifact: &T) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, json).map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the aligned signals to `{experiment}_aligned.csv`.
    ///
    /// One row per sample, `id,x0,...`. Samples reported as infeasible carry
    /// no values and are skipped with a warning. Returns the written path.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::ResultCountMismatch`] | `sample_ids` and `outcomes` differ in length |
    /// | [`IoError::CsvWrite`] | the file cannot be created or written |
    #[instrument(skip_all, fields(n = outcomes.len()))]
    pub fn write_aligned(
        &self,
        sample_ids: &[SampleId],
        outcomes: &[BatchOutcome],
    ) -> Result<PathBuf, IoError> {
        check_counts(sample_ids.len(), outcomes.len())?;
        let path = self.artifact_path("aligned.csv");
        let csv_err = |e: csv::Error| IoError::CsvWrite {
            path: path.clone(),
            source: e,
        };

        let mut wtr = csv::Writer::from_path(&path).map_err(csv_err)?;

        let width = outcomes
            .iter()
            .find_map(BatchOutcome::values)
            .map_or(0, <[f64]>::len);
        let header = std::iter::once("id".to_string()).chain((0..width).map(|i| format!("x{i}")));
        wtr.write_record(header).map_err(csv_err)?;

        let mut written = 0usize;
        for (id, outcome) in sample_ids.iter().zip(outcomes) {
            let Some(values) = outcome.values() else {
                warn!(sample_id = %id, "no aligned values, row skipped");
                continue;
            };
            let row = std::iter::once(id.as_str().to_string())
                .chain(values.iter().map(f64::to_string));
            wtr.write_record(row).map_err(csv_err)?;
            written += 1;
        }
        wtr.flush().map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), rows = written, "aligned signals written");
        Ok(path)
    }

    /// Write the alignment report to `{experiment}_alignment.json`.
    ///
    /// Records the configuration, the reference, and per-sample status,
    /// score, warped boundaries and segment scores. Returns the written path.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::ResultCountMismatch`] | `sample_ids` and `outcomes` differ in length |
    /// | [`IoError::Serialize`] | the report cannot be serialized |
    /// | [`IoError::WriteFile`] | the file cannot be written |
    #[instrument(skip_all, fields(n = outcomes.len()))]
    pub fn write_alignment(
        &self,
        sample_ids: &[SampleId],
        outcomes: &[BatchOutcome],
        reference: &Signal,
        reference_label: &str,
        config: &CowConfig,
    ) -> Result<PathBuf, IoError> {
        check_counts(sample_ids.len(), outcomes.len())?;
        let path = self.artifact_path("alignment.json");

        let samples: Vec<SampleEntry> = sample_ids
            .iter()
            .zip(outcomes)
            .map(|(id, outcome)| SampleEntry::new(id.as_str(), outcome))
            .collect();
        let n_aligned = outcomes.iter().filter(|o| o.is_aligned()).count();

        let artifact = AlignmentArtifact {
            experiment: self.experiment.as_str(),
            reference: reference_label,
            slack: config.slack(),
            segmentation: SegmentationEntry::from(config.segmentation()),
            n_samples: outcomes.len(),
            n_aligned,
            reference_values: reference.as_ref(),
            samples,
        };

        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), n_aligned, "alignment report written");
        Ok(path)
    }

    /// Write a pairwise dissimilarity matrix to `{experiment}_dissimilarity.json`.
    ///
    /// The matrix is stored dense, rows in `sample_ids` order. Returns the
    /// written path.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::ResultCountMismatch`] | `sample_ids` and the matrix differ in size |
    /// | [`IoError::Serialize`] | the matrix cannot be serialized |
    /// | [`IoError::WriteFile`] | the file cannot be written |
    #[instrument(skip_all, fields(n = matrix.len(), measure = matrix.measure().name()))]
    pub fn write_dissimilarity(
        &self,
        sample_ids: &[SampleId],
        matrix: &DissimilarityMatrix,
    ) -> Result<PathBuf, IoError> {
        check_counts(sample_ids.len(), matrix.len())?;
        let path = self.artifact_path("dissimilarity.json");

        let artifact = DissimilarityArtifact {
            experiment: self.experiment.as_str(),
            measure: matrix.measure().name(),
            sample_ids: sample_ids.iter().map(SampleId::as_str).collect(),
            matrix: matrix.to_dense(),
        };

        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "dissimilarity matrix written");
        Ok(path)
    }
}

fn check_counts(ids: usize, results: usize) -> Result<(), IoError> {
    if ids != results {
        return Err(IoError::ResultCountMismatch { ids, results });
    }
    Ok(())
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct AlignmentArtifact<'a> {
    experiment: &'a str,
    reference: &'a str,
    slack: usize,
    segmentation: SegmentationEntry<'a>,
    n_samples: usize,
    n_aligned: usize,
    reference_values: &'a [f64],
    samples: Vec<SampleEntry<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
enum SegmentationEntry<'a> {
    Auto {
        segment_size: usize,
    },
    Explicit {
        sample: &'a [usize],
        reference: &'a [usize],
    },
}

impl<'a> From<&'a Segmentation> for SegmentationEntry<'a> {
    fn from(segmentation: &'a Segmentation) -> Self {
        match segmentation {
            Segmentation::Auto { segment_size } => Self::Auto {
                segment_size: *segment_size,
            },
            Segmentation::Explicit { sample, reference } => Self::Explicit { sample, reference },
        }
    }
}

#[derive(Serialize)]
struct SampleEntry<'a> {
    sample_id: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    boundaries: Option<&'a [usize]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    segment_scores: Option<&'a [f64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    infeasible_segment: Option<usize>,
}

impl<'a> SampleEntry<'a> {
    fn new(sample_id: &'a str, outcome: &'a BatchOutcome) -> Self {
        let mut entry = Self {
            sample_id,
            status: "aligned",
            score: None,
            boundaries: None,
            segment_scores: None,
            infeasible_segment: None,
        };
        match outcome {
            BatchOutcome::Aligned(aligned) => {
                entry.score = Some(aligned.score.value());
                entry.boundaries = Some(aligned.boundaries.as_slice());
                entry.segment_scores = Some(&aligned.segment_scores);
            }
            BatchOutcome::Fallback { segment, .. } => {
                entry.status = "fallback";
                entry.infeasible_segment = Some(*segment);
            }
            BatchOutcome::Infeasible { segment } => {
                entry.status = "infeasible";
                entry.infeasible_segment = Some(*segment);
            }
        }
        entry
    }
}

#[derive(Serialize)]
struct DissimilarityArtifact<'a> {
    experiment: &'a str,
    measure: &'static str,
    sample_ids: Vec<&'a str>,
    matrix: Vec<Vec<f64>>,
}
