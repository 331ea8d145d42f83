use std::fmt::{self, Display};
use std::io;

use crate::village::VillageId;

/// Provides `TrachomaError` and maps to other errors to
/// convert to a `TrachomaError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum TrachomaError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CSVError(csv::Error),
    /// A column the loader needs is absent from the header row.
    MissingColumn(String),
    /// A cell could not be parsed. `line` is 1-based and counts the header.
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },
    UnknownVillage(VillageId),
    InvalidParameter(String),
    ReportError(String),
}

impl From<io::Error> for TrachomaError {
    fn from(error: io::Error) -> Self {
        TrachomaError::IoError(error)
    }
}

impl From<serde_json::Error> for TrachomaError {
    fn from(error: serde_json::Error) -> Self {
        TrachomaError::JsonError(error)
    }
}

impl From<csv::Error> for TrachomaError {
    fn from(error: csv::Error) -> Self {
        TrachomaError::CSVError(error)
    }
}

impl std::error::Error for TrachomaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrachomaError::IoError(error) => Some(error),
            TrachomaError::JsonError(error) => Some(error),
            TrachomaError::CSVError(error) => Some(error),
            _ => None,
        }
    }
}

impl Display for TrachomaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TrachomaError::IoError(error) => write!(f, "I/O error: {error}"),
            TrachomaError::JsonError(error) => write!(f, "JSON error: {error}"),
            TrachomaError::CSVError(error) => write!(f, "CSV error: {error}"),
            TrachomaError::MissingColumn(column) => {
                write!(f, "column `{column}` not found in header row")
            }
            TrachomaError::InvalidValue {
                line,
                column,
                value,
            } => write!(
                f,
                "line {line}: could not parse `{value}` in column `{column}`"
            ),
            TrachomaError::UnknownVillage(vid) => write!(f, "village {vid} not present in data"),
            TrachomaError::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            TrachomaError::ReportError(msg) => write!(f, "{msg}"),
        }
    }
}
