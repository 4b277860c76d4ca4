use std::io;

use thiserror::Error;

/// Error type for every fatal condition in the pipeline.
///
/// Per-record gaps (missing headnote, unknown reference convention) are not
/// errors; they surface as absent fields or dropped rows instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },
    #[error("decision table error: {0}")]
    Table(#[from] csv::Error),
    #[error("{encoding} encoding error: {details}")]
    Encoding {
        encoding: &'static str,
        details: String,
    },
    #[error("decision table is missing column '{0}'")]
    MissingColumn(String),
    #[error("failed to build DOCX document: {0}")]
    Docx(String),
    #[error("failed to build statistics workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
