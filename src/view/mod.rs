// src/view/mod.rs
pub mod render;
pub mod state;

pub use render::{render, render_json, render_json_outcome};
pub use state::{AnalysisRequest, CvAnalyzerView, Phase, Stage, Ticket, UploadRequest};
