//! Error types for loading datasets and computing views.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning CSV text into a dataset.
///
/// Data lines never fail to split, so a missing header or data line is
/// the only parse failure.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input has no header line or no data line.
    #[error("CSV must have a header and at least one data row.")]
    MissingData,
}

/// Errors raised by the session when a load is rejected.
///
/// A rejected load never touches the dataset already held by the session.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File name does not carry the `.csv` extension.
    #[error("Please upload a CSV file (got '{filename}').")]
    NotCsv { filename: String },

    /// File could not be read.
    #[error("failed to read file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not a usable CSV.
    #[error("Failed to parse CSV. Please check the file format. ({0})")]
    Parse(#[from] ParseError),
}

/// Errors raised by a view for a selection that does not exist.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("patient #{index} does not exist (dataset has {total} patients)")]
    PatientOutOfRange { index: usize, total: usize },
}
