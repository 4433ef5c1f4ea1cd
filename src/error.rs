// src/error.rs
//! User-facing failures of the analyzer view

use thiserror::Error;

/// The four ways an interaction can fail.
///
/// `Display` yields the exact message shown to the user; the underlying
/// cause is logged where the failure is caught and never shown.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerError {
    #[error("Please upload a PDF file")]
    InvalidFileType,

    #[error("Failed to process PDF")]
    UploadFailed,

    #[error("Please upload a CV first")]
    NoTextToAnalyze,

    #[error("Analysis failed. Please try again.")]
    AnalysisFailed,
}
