// src/view/state.rs
//! Analyzer view state and its transitions
//!
//! Every operation here is synchronous. Network work leaves the view as an
//! [`UploadRequest`] or [`AnalysisRequest`], and its outcome comes back
//! through [`CvAnalyzerView::complete_upload`] or
//! [`CvAnalyzerView::complete_analysis`] with the ticket it was issued under.

use tracing::{debug, error, info, warn};

use crate::core::file::SelectedFile;
use crate::error::AnalyzerError;
use crate::types::response::AnalysisResult;

/// Identifies one outbound request; only the latest ticket of a kind is honored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub ticket: Ticket,
    pub file: SelectedFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub ticket: Ticket,
    pub cv: String,
    pub job_description: String,
}

/// Data-carrying stage of the view.
///
/// `previous` holds the last result while a new analysis is in flight or
/// after it failed, so a failure never loses what was shown before.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Ready {
        cv_text: String,
    },
    Analyzing {
        cv_text: String,
        previous: Option<AnalysisResult>,
    },
    Analyzed {
        cv_text: String,
        analysis: AnalysisResult,
    },
    Failed {
        cv_text: String,
        previous: Option<AnalysisResult>,
    },
}

/// Flat stage name, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Invalid,
    Ready,
    Analyzing,
    Analyzed,
    Failed,
}

#[derive(Debug, Default)]
pub struct CvAnalyzerView {
    phase: Phase,
    job_description: String,
    error: Option<AnalyzerError>,
    selected_file: Option<SelectedFile>,
    next_ticket: u64,
    pending_upload: Option<Ticket>,
    pending_analysis: Option<Ticket>,
}

impl CvAnalyzerView {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    /// Accept a PDF and ask for its text, or reject anything else
    pub fn select_file(&mut self, file: SelectedFile) -> Option<UploadRequest> {
        if !file.is_pdf() {
            warn!(
                "Rejected {}: declared media type {} is not a PDF",
                file.name, file.media_type
            );
            self.error = Some(AnalyzerError::InvalidFileType);
            return None;
        }

        self.error = None;
        self.selected_file = Some(file.clone());

        let ticket = self.issue_ticket();
        self.pending_upload = Some(ticket);
        info!("Uploading {} ({} bytes)", file.name, file.bytes.len());

        Some(UploadRequest { ticket, file })
    }

    pub fn complete_upload(&mut self, ticket: Ticket, result: anyhow::Result<String>) {
        if self.pending_upload != Some(ticket) {
            debug!("Ignoring superseded upload completion {:?}", ticket);
            return;
        }
        self.pending_upload = None;

        let text = match result {
            Ok(text) => text,
            Err(e) => {
                error!("CV upload failed: {:#}", e);
                self.error = Some(AnalyzerError::UploadFailed);
                return;
            }
        };

        // A new text keeps whatever analysis is on display.
        self.phase = match std::mem::take(&mut self.phase) {
            Phase::Idle | Phase::Ready { .. } if text.is_empty() => Phase::Idle,
            Phase::Idle | Phase::Ready { .. } => Phase::Ready { cv_text: text },
            Phase::Analyzing { previous, .. } => Phase::Analyzing {
                cv_text: text,
                previous,
            },
            Phase::Analyzed { analysis, .. } => Phase::Analyzed {
                cv_text: text,
                analysis,
            },
            Phase::Failed { previous, .. } => Phase::Failed {
                cv_text: text,
                previous,
            },
        };
    }

    pub fn update_job_description(&mut self, text: impl Into<String>) {
        self.job_description = text.into();
    }

    /// Start an analysis of the extracted text against the job description
    pub fn analyze(&mut self) -> Option<AnalysisRequest> {
        if self.pending_analysis.is_some() {
            debug!("Analysis already in flight");
            return None;
        }
        if self.cv_text().is_empty() {
            self.error = Some(AnalyzerError::NoTextToAnalyze);
            return None;
        }

        self.error = None;
        let (cv_text, previous) = match std::mem::take(&mut self.phase) {
            Phase::Idle => (String::new(), None),
            Phase::Ready { cv_text } => (cv_text, None),
            Phase::Analyzing { cv_text, previous } | Phase::Failed { cv_text, previous } => {
                (cv_text, previous)
            }
            Phase::Analyzed { cv_text, analysis } => (cv_text, Some(analysis)),
        };

        let request_cv = cv_text.clone();
        self.phase = Phase::Analyzing { cv_text, previous };

        let ticket = self.issue_ticket();
        self.pending_analysis = Some(ticket);
        info!("Requesting analysis");

        Some(AnalysisRequest {
            ticket,
            cv: request_cv,
            job_description: self.job_description.clone(),
        })
    }

    pub fn complete_analysis(&mut self, ticket: Ticket, result: anyhow::Result<AnalysisResult>) {
        if self.pending_analysis != Some(ticket) {
            debug!("Ignoring superseded analysis completion {:?}", ticket);
            return;
        }
        self.pending_analysis = None;

        let (cv_text, previous) = match std::mem::take(&mut self.phase) {
            Phase::Analyzing { cv_text, previous } => (cv_text, previous),
            other => {
                warn!("Analysis completed outside of the analyzing stage");
                self.phase = other;
                return;
            }
        };

        self.phase = match result {
            Ok(analysis) => {
                info!(
                    "Analysis received: {} matching, {} missing, {} suggestions",
                    analysis.matching_skills.len(),
                    analysis.missing_skills.len(),
                    analysis.suggestions.len()
                );
                Phase::Analyzed { cv_text, analysis }
            }
            Err(e) => {
                error!("Analysis failed: {:#}", e);
                self.error = Some(AnalyzerError::AnalysisFailed);
                Phase::Failed { cv_text, previous }
            }
        };
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn stage(&self) -> Stage {
        match (&self.phase, self.error) {
            (Phase::Analyzing { .. }, _) => Stage::Analyzing,
            (Phase::Failed { .. }, _) => Stage::Failed,
            (_, Some(AnalyzerError::InvalidFileType)) => Stage::Invalid,
            (Phase::Idle, _) => Stage::Idle,
            (Phase::Ready { .. }, _) => Stage::Ready,
            (Phase::Analyzed { .. }, _) => Stage::Analyzed,
        }
    }

    /// Extracted text; empty until an upload succeeds
    pub fn cv_text(&self) -> &str {
        match &self.phase {
            Phase::Idle => "",
            Phase::Ready { cv_text }
            | Phase::Analyzing { cv_text, .. }
            | Phase::Analyzed { cv_text, .. }
            | Phase::Failed { cv_text, .. } => cv_text,
        }
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    /// Result on display; hidden while a new analysis is in flight
    pub fn analysis(&self) -> Option<&AnalysisResult> {
        match &self.phase {
            Phase::Analyzed { analysis, .. } => Some(analysis),
            Phase::Failed { previous, .. } => previous.as_ref(),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<AnalyzerError> {
        self.error
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.map(|e| e.to_string())
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Analyzing { .. })
    }

    pub fn is_uploading(&self) -> bool {
        self.pending_upload.is_some()
    }

    pub fn analyze_disabled(&self) -> bool {
        self.is_loading() || self.cv_text().is_empty() || self.job_description.is_empty()
    }

    pub fn analyze_label(&self) -> &'static str {
        if self.is_loading() {
            "Analyzing..."
        } else {
            "Analyze CV"
        }
    }
}
