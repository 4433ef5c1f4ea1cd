// src/core/service_client.rs
//! HTTP client for the upload and analysis backends

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, error, info, trace};

use crate::core::config_manager::ServiceConfig;
use crate::core::file::SelectedFile;
use crate::types::response::{
    AnalysisResult, AnalyzeRequest, AnalyzeResponse, ServiceErrorResponse, UploadResponse,
};

const UPLOAD_CV_ENDPOINT: &str = "/upload-cv";
const ANALYZE_ENDPOINT: &str = "/analyze";

/// The two remote calls the analyzer view depends on
#[async_trait]
pub trait CvService: Send + Sync {
    /// Send a PDF, receive its plain text
    async fn upload_cv(&self, file: &SelectedFile) -> Result<String>;

    /// Compare extracted text against a job description
    async fn analyze(&self, cv: &str, job_description: &str) -> Result<AnalysisResult>;
}

pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    /// Create new service client with configuration
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Read a non-2xx body and turn it into an error
    async fn error_from_response(response: reqwest::Response, what: &str) -> anyhow::Error {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let detail = serde_json::from_str::<ServiceErrorResponse>(&error_text)
            .map(|body| body.error)
            .unwrap_or(error_text);

        error!("{} service error {}: {}", what, status, detail);
        anyhow::anyhow!("{} failed with status {}: {}", what, status, detail)
    }
}

#[async_trait]
impl CvService for ServiceClient {
    async fn upload_cv(&self, file: &SelectedFile) -> Result<String> {
        let url = self.url(UPLOAD_CV_ENDPOINT);

        let form = Form::new().part(
            "file",
            Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(&file.media_type)
                .context("Failed to create multipart")?,
        );

        info!("Calling CV upload service: {} ({})", url, file.name);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        trace!("Response status: {}", status);

        if !status.is_success() {
            return Err(Self::error_from_response(response, "CV upload").await);
        }

        let response_text = response
            .text()
            .await
            .context("Failed to read response text")?;

        let upload_response: UploadResponse = serde_json::from_str(&response_text)
            .with_context(|| {
                format!(
                    "Failed to parse response as UploadResponse. Raw response: {}",
                    response_text
                )
            })?;

        debug!("Extracted {} characters of text", upload_response.text.chars().count());
        Ok(upload_response.text)
    }

    async fn analyze(&self, cv: &str, job_description: &str) -> Result<AnalysisResult> {
        let url = self.url(ANALYZE_ENDPOINT);

        let payload = AnalyzeRequest {
            cv: cv.to_string(),
            job_description: job_description.to_string(),
        };

        info!("Calling analysis service: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .context("Failed to call analysis service")?;

        let status = response.status();
        trace!("Response status: {}", status);

        if !status.is_success() {
            return Err(Self::error_from_response(response, "Analysis").await);
        }

        let analyze_response: AnalyzeResponse = response
            .json()
            .await
            .context("Failed to parse analysis response")?;

        Ok(analyze_response.analysis)
    }
}
