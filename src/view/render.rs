// src/view/render.rs
//! Plain-text rendering of the analyzer view

use anyhow::{Context, Result};
use std::fmt::Write;

use crate::types::response::AnalysisResult;
use crate::utils::text_preview;
use crate::view::state::CvAnalyzerView;

const PREVIEW_CHARS: usize = 200;

pub fn render(view: &CvAnalyzerView) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = write_view(&mut out, view);
    out
}

fn write_view(out: &mut String, view: &CvAnalyzerView) -> std::fmt::Result {
    writeln!(out, "CV Analyzer")?;
    writeln!(out, "===========")?;
    writeln!(out)?;

    writeln!(out, "Upload CV (PDF)")?;
    match view.selected_file() {
        Some(file) if view.is_uploading() => writeln!(out, "  {} (processing...)", file.name)?,
        Some(file) => writeln!(out, "  {}", file.name)?,
        None => writeln!(out, "  no file selected")?,
    }

    if !view.cv_text().is_empty() {
        writeln!(out)?;
        writeln!(out, "Extracted Text Preview:")?;
        writeln!(out, "  {}...", text_preview(view.cv_text(), PREVIEW_CHARS))?;
    }

    writeln!(out)?;
    writeln!(out, "Job Description")?;
    if view.job_description().is_empty() {
        writeln!(out, "  (empty)")?;
    } else {
        for line in view.job_description().lines() {
            writeln!(out, "  {}", line)?;
        }
    }

    if let Some(message) = view.error_message() {
        writeln!(out)?;
        writeln!(out, "! {}", message)?;
    }

    writeln!(out)?;
    if view.analyze_disabled() {
        writeln!(out, "[ {} ] (disabled)", view.analyze_label())?;
    } else {
        writeln!(out, "[ {} ]", view.analyze_label())?;
    }

    if let Some(analysis) = view.analysis() {
        write_panel(out, "Matching Skills", &analysis.matching_skills)?;
        write_panel(out, "Missing Skills", &analysis.missing_skills)?;
        write_panel(out, "Suggestions", &analysis.suggestions)?;
    }

    Ok(())
}

fn write_panel(out: &mut String, title: &str, items: &[String]) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "-".repeat(title.len()))?;
    for item in items {
        writeln!(out, "  * {}", item)?;
    }
    Ok(())
}

pub fn render_json(analysis: &AnalysisResult) -> Result<String> {
    serde_json::to_string_pretty(analysis).context("Failed to serialize analysis")
}

/// JSON form of the view's outcome: the analysis, or `{"error": ...}`
pub fn render_json_outcome(view: &CvAnalyzerView) -> Result<String> {
    match (view.error(), view.analysis()) {
        (Some(error), _) => {
            serde_json::to_string_pretty(&serde_json::json!({ "error": error.to_string() }))
                .context("Failed to serialize error")
        }
        (None, Some(analysis)) => render_json(analysis),
        (None, None) => Ok("{}".to_string()),
    }
}
