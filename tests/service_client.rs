mod common;

use common::{spawn_backend, spawn_silent_listener, Backend, EXTRACTED_TEXT, PDF_BYTES};
use cv_analyzer::core::{CvService, SelectedFile, ServiceClient, ServiceConfig};
use std::time::{Duration, Instant};

fn pdf() -> SelectedFile {
    SelectedFile::new("cv.pdf", "application/pdf", PDF_BYTES.to_vec())
}

#[tokio::test]
async fn upload_sends_multipart_file_and_returns_text() {
    let backend = spawn_backend(Backend::Healthy).await;
    let client = ServiceClient::new(&backend.service_config()).unwrap();

    let text = client.upload_cv(&pdf()).await.unwrap();
    assert_eq!(text, EXTRACTED_TEXT);
    assert_eq!(backend.uploads(), 1);
}

#[tokio::test]
async fn analyze_sends_cv_and_job_description() {
    let backend = spawn_backend(Backend::Healthy).await;
    let client = ServiceClient::new(&backend.service_config()).unwrap();

    let analysis = client
        .analyze("Experience: Rust", "Backend engineer")
        .await
        .unwrap();
    assert_eq!(
        analysis.matching_skills,
        vec!["tokio", "Experience: Rust", "tokio"]
    );
    assert_eq!(analysis.missing_skills, vec!["Backend engineer"]);
    assert_eq!(
        analysis.suggestions,
        vec!["Quantify your achievements with metrics"]
    );
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let backend = spawn_backend(Backend::Failing).await;
    let client = ServiceClient::new(&backend.service_config()).unwrap();

    let upload = client.upload_cv(&pdf()).await.unwrap_err();
    assert!(format!("{:#}", upload).contains("500"));

    let analysis = client.analyze("X", "Y").await.unwrap_err();
    assert!(format!("{:#}", analysis).contains("model crashed"));
}

#[tokio::test]
async fn backend_validation_errors_are_errors() {
    let backend = spawn_backend(Backend::Healthy).await;
    let client = ServiceClient::new(&backend.service_config()).unwrap();

    let err = client.analyze("X", "").await.unwrap_err();
    assert!(format!("{:#}", err).contains("400"));
}

#[tokio::test]
async fn unexpected_body_shape_is_an_error() {
    let backend = spawn_backend(Backend::Malformed).await;
    let client = ServiceClient::new(&backend.service_config()).unwrap();

    assert!(client.upload_cv(&pdf()).await.is_err());
    assert!(client.analyze("X", "Y").await.is_err());
    assert_eq!(backend.uploads(), 1);
    assert_eq!(backend.analyses(), 1);
}

#[tokio::test]
async fn unreachable_backend_is_an_error() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let client = ServiceClient::new(&ServiceConfig {
        base_url: format!("http://127.0.0.1:{}", port),
        timeout_seconds: 2,
    })
    .unwrap();

    assert!(client.upload_cv(&pdf()).await.is_err());
    assert!(client.analyze("X", "Y").await.is_err());
}

#[tokio::test]
async fn silent_backend_times_out() {
    let base_url = spawn_silent_listener().await;
    let client = ServiceClient::new(&ServiceConfig {
        base_url,
        timeout_seconds: 1,
    })
    .unwrap();

    let started = Instant::now();
    assert!(client.analyze("X", "Y").await.is_err());
    assert!(client.upload_cv(&pdf()).await.is_err());
    assert!(started.elapsed() < Duration::from_secs(5));
}
