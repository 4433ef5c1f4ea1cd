//! Resume-to-job-description analyzer client.
//!
//! A PDF resume is sent to an upload service that returns its text; the
//! text and a job description are then sent to an analysis service that
//! returns matching skills, missing skills and suggestions. The
//! [`view::CvAnalyzerView`] holds all interaction state, and
//! [`session::Session`] drives it against a [`core::CvService`].

pub mod cli;
pub mod core;
pub mod error;
pub mod session;
pub mod types;
pub mod utils;
pub mod view;

pub use crate::core::{ConfigManager, CvService, SelectedFile, ServiceClient};
pub use error::AnalyzerError;
pub use session::Session;
pub use types::AnalysisResult;
pub use view::CvAnalyzerView;
