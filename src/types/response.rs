use serde::{Deserialize, Serialize};

// ===== Upload Service =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub text: String,
}

// ===== Analysis Service =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub cv: String,
    #[serde(rename = "jobDescription")]
    pub job_description: String,
}

/// Skill-match report returned by the analysis backend.
///
/// The three lists are kept in the order the backend sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis: AnalysisResult,
}

/// Error body the backend sends alongside 4xx/5xx statuses.
#[derive(Debug, Deserialize)]
pub struct ServiceErrorResponse {
    pub error: String,
}
