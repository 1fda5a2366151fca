//! Error types for the roster pipeline.
//!
//! Schema validation is the only fatal step during ingestion. Everything
//! downstream of a loaded roster is a total function, so the remaining
//! variants cover report rendering, configuration and file output.

use thiserror::Error;

/// The required department column was not found after header normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("required column '{column}' not found (columns: {found:?})")]
pub struct SchemaError {
    /// The canonical name that was looked for.
    pub column: String,
    /// The normalized headers that were present.
    pub found: Vec<String>,
}

/// Errors while reading a roster file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// Errors while composing or rendering the PDF report.
#[derive(Debug, Error)]
pub enum ReportGenerationError {
    #[error("department '{department}' has no staff rows")]
    EmptyDepartment { department: String },

    #[error("table '{title}' has no rows")]
    EmptyTable { title: String },

    #[error("table '{title}' is malformed: {message}")]
    MalformedTable { title: String, message: String },

    #[error("PDF backend error: {0}")]
    Pdf(String),
}

/// Errors while loading an analytics config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config field '{field}': {message}")]
    Invalid { field: String, message: String },
}

/// Errors while writing exported tables or summaries.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level error surfaced by the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("report generation failed: {0}")]
    Report(#[from] ReportGenerationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("department '{department}' not found in roster")]
    UnknownDepartment { department: String },
}

pub type LoadResult<T> = Result<T, LoadError>;
pub type ReportResult<T> = Result<T, ReportGenerationError>;
pub type AppResult<T> = Result<T, AppError>;
