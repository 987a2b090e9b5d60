//! Error types.
//!
//! Two layers:
//!
//! - [`PipelineError`] is the typed failure taxonomy of the load/clean pass.
//!   Every variant is fatal to a run and names its cause (path, row index or
//!   field).
//! - [`AppError`] is what the binary reports: a message plus a process exit code.
//!
//! Exit codes: `2` load/configuration, `3` data validation, `4` output/render/server.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Why a file could not be turned into raw records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadFailure {
    #[error("{0}")]
    Io(String),
    #[error("malformed CSV: {0}")]
    Csv(String),
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("row {row}: column `{column}` has invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

/// Row-level report of values that are still missing after cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingRow {
    /// Zero-based data row index in the source file.
    pub row: usize,
    /// Source column names of the missing fields.
    pub fields: Vec<&'static str>,
}

impl fmt::Display for MissingRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {} [{}]", self.row, self.fields.join(", "))
    }
}

/// Fatal failures of the load/clean pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// File or schema access failure.
    #[error("failed to load '{}': {failure}", .path.display())]
    DataLoad {
        path: PathBuf,
        #[source]
        failure: LoadFailure,
    },

    /// A date cell that does not match the expected source format.
    #[error("row {row}: invalid date '{value}' (expected format {format})")]
    DateParse {
        row: usize,
        value: String,
        format: String,
    },

    /// Missing values that survived cleaning.
    #[error("incomplete data in {} row(s): {}", .rows.len(), fmt_missing(.rows))]
    IncompleteData { rows: Vec<MissingRow> },
}

impl PipelineError {
    pub fn data_load(path: impl Into<PathBuf>, failure: LoadFailure) -> Self {
        PipelineError::DataLoad {
            path: path.into(),
            failure,
        }
    }

    /// Row indices named by this error (empty for file-level failures).
    pub fn rows(&self) -> Vec<usize> {
        match self {
            PipelineError::DataLoad {
                failure: LoadFailure::InvalidValue { row, .. },
                ..
            } => vec![*row],
            PipelineError::DataLoad { .. } => Vec::new(),
            PipelineError::DateParse { row, .. } => vec![*row],
            PipelineError::IncompleteData { rows } => rows.iter().map(|r| r.row).collect(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::DataLoad { .. } => 2,
            PipelineError::DateParse { .. } | PipelineError::IncompleteData { .. } => 3,
        }
    }
}

fn fmt_missing(rows: &[MissingRow]) -> String {
    // Large files can have thousands of gaps; the first few are enough to act on.
    const SHOWN: usize = 10;
    let mut parts: Vec<String> = rows.iter().take(SHOWN).map(ToString::to_string).collect();
    if rows.len() > SHOWN {
        parts.push(format!("... and {} more", rows.len() - SHOWN));
    }
    parts.join("; ")
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
