//! File I/O, validation, and serialization for the cowarp pipeline.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::{Dataset, ExperimentName, SampleId};
pub use error::IoError;
pub use reader::SignalReader;
pub use writer::ResultWriter;
