use std::{io, path::PathBuf};

use delayscope_stats::{
    combinatorics::CombinatoricsError, descriptive::WeightedMeanError, vector::VectorError,
};

/// Broad class of an [`AnalysisError`], used to decide how a failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ErrorCategory {
    /// Table not loaded, empty, or a column without any values.
    #[display("data unavailable")]
    DataUnavailable,
    /// Requested column is absent or has the wrong type.
    #[display("schema")]
    Schema,
    /// Malformed or out-of-range arguments.
    #[display("validation")]
    Validation,
    /// Undefined arithmetic (division by zero, zero vector, overflow).
    #[display("numeric")]
    Numeric,
    /// Reading or writing a file failed.
    #[display("I/O")]
    Io,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("Dataset is not loaded or is empty")]
    NoData,
    #[display("Column '{column}' has no values")]
    NoValues { column: String },
    #[display("Column '{column}' not found in dataset")]
    UnknownColumn { column: String },
    #[display("Column '{column}' is not numeric")]
    NotNumeric { column: String },
    #[display("{message}")]
    Validation { message: String },
    #[display("{message}")]
    Numeric { message: String },
    #[display("{source}")]
    Combinatorics { source: CombinatoricsError },
    #[display("{source}")]
    Vector { source: VectorError },
    #[display("Failed to access {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("Failed to process CSV file {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[display("Failed to write JSON file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl AnalysisError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn numeric(message: impl Into<String>) -> Self {
        Self::Numeric {
            message: message.into(),
        }
    }

    pub(crate) fn unknown_column(column: &str) -> Self {
        Self::UnknownColumn {
            column: column.to_owned(),
        }
    }

    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoData | Self::NoValues { .. } => ErrorCategory::DataUnavailable,
            Self::UnknownColumn { .. } | Self::NotNumeric { .. } => ErrorCategory::Schema,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::Numeric { .. } => ErrorCategory::Numeric,
            Self::Combinatorics { source } => match source {
                CombinatoricsError::Overflow { .. } => ErrorCategory::Numeric,
                CombinatoricsError::RExceedsN { .. }
                | CombinatoricsError::NTooSmall { .. }
                | CombinatoricsError::EmptyFrequencies => ErrorCategory::Validation,
            },
            Self::Vector { source } => match source {
                VectorError::ZeroVector { .. } => ErrorCategory::Numeric,
                VectorError::LengthMismatch { .. } => ErrorCategory::Validation,
            },
            Self::Io { .. } | Self::Csv { .. } | Self::Json { .. } => ErrorCategory::Io,
        }
    }
}

impl From<CombinatoricsError> for AnalysisError {
    fn from(source: CombinatoricsError) -> Self {
        Self::Combinatorics { source }
    }
}

impl From<VectorError> for AnalysisError {
    fn from(source: VectorError) -> Self {
        Self::Vector { source }
    }
}

impl From<WeightedMeanError> for AnalysisError {
    fn from(err: WeightedMeanError) -> Self {
        match err {
            WeightedMeanError::Empty => Self::NoData,
            WeightedMeanError::ZeroWeightSum | WeightedMeanError::LengthMismatch { .. } => {
                Self::numeric(format!("Error calculating weighted mean: {err}"))
            }
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
