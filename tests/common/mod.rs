//! Stub upload/analysis backend served by rocket on a loopback port

#![allow(dead_code)]

use rocket::data::{Data, ToByteUnit};
use rocket::http::{ContentType, Status};
use rocket::serde::json::{json, Json, Value};
use rocket::{post, routes, Route, State};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cv_analyzer::core::ServiceConfig;

pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n%%EOF";

#[derive(Default)]
pub struct Hits {
    pub uploads: AtomicUsize,
    pub analyses: AtomicUsize,
}

pub enum Backend {
    /// Extracts a fixed text and echoes the analysis inputs back
    Healthy,
    /// Answers every call with HTTP 500
    Failing,
    /// Answers 200 with bodies of the wrong shape
    Malformed,
    /// Healthy upload, failing analysis
    AnalysisDown,
    /// Healthy upload, analysis that answers only after several seconds
    AnalysisHangs,
}

pub struct StubBackend {
    pub base_url: String,
    pub hits: Arc<Hits>,
}

impl StubBackend {
    pub fn service_config(&self) -> ServiceConfig {
        self.service_config_with_timeout(10)
    }

    pub fn service_config_with_timeout(&self, timeout_seconds: u64) -> ServiceConfig {
        ServiceConfig {
            base_url: self.base_url.clone(),
            timeout_seconds,
        }
    }

    pub fn uploads(&self) -> usize {
        self.hits.uploads.load(Ordering::SeqCst)
    }

    pub fn analyses(&self) -> usize {
        self.hits.analyses.load(Ordering::SeqCst)
    }
}

pub const EXTRACTED_TEXT: &str = "Experience: 5 years of Rust\nSkills: tokio, SQL\n";

#[post("/upload-cv", data = "<data>")]
async fn upload_ok(
    content_type: &ContentType,
    data: Data<'_>,
    hits: &State<Arc<Hits>>,
) -> (Status, Json<Value>) {
    hits.uploads.fetch_add(1, Ordering::SeqCst);

    if !content_type.is_form_data() {
        return (Status::BadRequest, Json(json!({"error": "No file uploaded"})));
    }
    let body = match data.open(2.mebibytes()).into_bytes().await {
        Ok(bytes) => bytes.into_inner(),
        Err(_) => return (Status::BadRequest, Json(json!({"error": "Unreadable body"}))),
    };
    let body_text = String::from_utf8_lossy(&body);
    let has_part = body_text.contains("name=\"file\"")
        && body_text.contains("filename=\"cv.pdf\"")
        && body_text.contains("application/pdf")
        && body_text.contains("%PDF-1.4");
    if !has_part {
        return (Status::BadRequest, Json(json!({"error": "No file selected"})));
    }

    (Status::Ok, Json(json!({"text": EXTRACTED_TEXT})))
}

#[post("/upload-cv")]
fn upload_fail(hits: &State<Arc<Hits>>) -> (Status, Json<Value>) {
    hits.uploads.fetch_add(1, Ordering::SeqCst);
    (
        Status::InternalServerError,
        Json(json!({"error": "Failed to extract text from PDF"})),
    )
}

#[post("/upload-cv")]
fn upload_malformed(hits: &State<Arc<Hits>>) -> &'static str {
    hits.uploads.fetch_add(1, Ordering::SeqCst);
    "this is not json"
}

#[post("/analyze", format = "json", data = "<request>")]
fn analyze_ok(request: Json<Value>, hits: &State<Arc<Hits>>) -> (Status, Json<Value>) {
    hits.analyses.fetch_add(1, Ordering::SeqCst);

    let cv = request["cv"].as_str().unwrap_or_default();
    let job = request["jobDescription"].as_str().unwrap_or_default();
    if cv.is_empty() || job.is_empty() {
        return (
            Status::BadRequest,
            Json(json!({"error": "Please provide both CV and job description"})),
        );
    }

    (
        Status::Ok,
        Json(json!({
            "analysis": {
                "matching_skills": ["tokio", cv.lines().next().unwrap_or_default(), "tokio"],
                "missing_skills": [job],
                "suggestions": ["Quantify your achievements with metrics"]
            }
        })),
    )
}

#[post("/analyze")]
fn analyze_fail(hits: &State<Arc<Hits>>) -> (Status, Json<Value>) {
    hits.analyses.fetch_add(1, Ordering::SeqCst);
    (Status::InternalServerError, Json(json!({"error": "model crashed"})))
}

#[post("/analyze")]
fn analyze_malformed(hits: &State<Arc<Hits>>) -> Json<Value> {
    hits.analyses.fetch_add(1, Ordering::SeqCst);
    Json(json!({"result": {"matching_skills": []}}))
}

#[post("/analyze")]
async fn analyze_hang(hits: &State<Arc<Hits>>) -> Json<Value> {
    hits.analyses.fetch_add(1, Ordering::SeqCst);
    rocket::tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({"analysis": {"matching_skills": [], "missing_skills": [], "suggestions": []}}))
}

fn routes_for(backend: Backend) -> Vec<Route> {
    match backend {
        Backend::Healthy => routes![upload_ok, analyze_ok],
        Backend::Failing => routes![upload_fail, analyze_fail],
        Backend::Malformed => routes![upload_malformed, analyze_malformed],
        Backend::AnalysisDown => routes![upload_ok, analyze_fail],
        Backend::AnalysisHangs => routes![upload_ok, analyze_hang],
    }
}

pub async fn spawn_backend(backend: Backend) -> StubBackend {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("no free port")
        .port();

    let hits = Arc::new(Hits::default());
    let figment = rocket::Config::figment()
        .merge(("address", "127.0.0.1"))
        .merge(("port", port))
        .merge(("log_level", "off"));
    let rocket = rocket::custom(figment)
        .mount("/", routes_for(backend))
        .manage(Arc::clone(&hits));

    tokio::spawn(async move {
        let _ = rocket.launch().await;
    });

    for _ in 0..200 {
        if tokio::net::TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    StubBackend {
        base_url: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

/// Accepts connections and never answers; returns its base URL
pub async fn spawn_silent_listener() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind failed");
    let addr = listener.local_addr().expect("no local addr");

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{}", addr)
}
