pub mod response;

pub use response::{AnalysisResult, AnalyzeRequest, AnalyzeResponse, UploadResponse};
