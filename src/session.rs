// src/session.rs
//! Drives a [`CvAnalyzerView`] against a [`CvService`]

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::core::file::SelectedFile;
use crate::core::service_client::CvService;
use crate::types::response::AnalysisResult;
use crate::utils::read_file_safe;
use crate::view::{render, AnalysisRequest, CvAnalyzerView, Ticket, UploadRequest};

const HELP: &str = "\
Commands:
  file <path>      select a PDF resume and extract its text
  job <text>       set the job description (empty clears it)
  job-file <path>  read the job description from a file
  analyze          compare the resume against the job description
  show             print the current view
  help             print this help
  quit             leave
";

enum Completion {
    Upload(Ticket, Result<String>),
    Analysis(Ticket, Result<AnalysisResult>),
}

#[derive(Debug, PartialEq, Eq)]
enum InteractiveCommand {
    File(PathBuf),
    Job(String),
    JobFile(PathBuf),
    Analyze,
    Show,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl InteractiveCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let (word, rest) = match line.trim_start().split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line.trim(), ""),
        };

        match word {
            "" => Self::Empty,
            "file" | "cv" if !rest.is_empty() => Self::File(PathBuf::from(rest)),
            "job" => Self::Job(rest.to_string()),
            "job-file" if !rest.is_empty() => Self::JobFile(PathBuf::from(rest)),
            "analyze" => Self::Analyze,
            "show" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(line.trim().to_string()),
        }
    }
}

pub struct Session<S: CvService + 'static> {
    view: CvAnalyzerView,
    service: Arc<S>,
}

impl<S: CvService + 'static> Session<S> {
    pub fn new(service: S) -> Self {
        Self::with_shared_service(Arc::new(service))
    }

    pub fn with_shared_service(service: Arc<S>) -> Self {
        Self {
            view: CvAnalyzerView::new(),
            service,
        }
    }

    pub fn view(&self) -> &CvAnalyzerView {
        &self.view
    }

    /// Select a file and wait for its upload to finish
    pub async fn select_file(&mut self, file: SelectedFile) {
        if let Some(UploadRequest { ticket, file }) = self.view.select_file(file) {
            let result = self.service.upload_cv(&file).await;
            self.view.complete_upload(ticket, result);
        }
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.view.update_job_description(text);
    }

    /// Run an analysis and wait for it to finish
    pub async fn analyze(&mut self) {
        if let Some(request) = self.view.analyze() {
            let result = self
                .service
                .analyze(&request.cv, &request.job_description)
                .await;
            self.view.complete_analysis(request.ticket, result);
        }
    }

    fn spawn_upload(&self, request: UploadRequest, tx: &mpsc::UnboundedSender<Completion>) {
        let service = Arc::clone(&self.service);
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = service.upload_cv(&request.file).await;
            if tx.send(Completion::Upload(request.ticket, result)).is_err() {
                debug!("Session closed before upload completed");
            }
        });
    }

    fn spawn_analysis(&self, request: AnalysisRequest, tx: &mpsc::UnboundedSender<Completion>) {
        let service = Arc::clone(&self.service);
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = service
                .analyze(&request.cv, &request.job_description)
                .await;
            if tx.send(Completion::Analysis(request.ticket, result)).is_err() {
                debug!("Session closed before analysis completed");
            }
        });
    }

    /// Line-oriented session; input stays live while requests are in flight.
    ///
    /// Returns on `quit`, or at end of input once the latest requests have
    /// completed.
    pub async fn run_interactive<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
        let mut lines = reader.lines();
        let mut input_open = true;

        write_out(&mut writer, HELP).await?;
        write_out(&mut writer, &render(&self.view)).await?;

        loop {
            if !input_open && !self.view.is_uploading() && !self.view.is_loading() {
                break;
            }

            tokio::select! {
                line = lines.next_line(), if input_open => {
                    let Some(line) = line.context("Failed to read input")? else {
                        debug!("Input closed");
                        input_open = false;
                        continue;
                    };
                    match InteractiveCommand::parse(&line) {
                        InteractiveCommand::Quit => break,
                        command => self.handle_command(command, &tx, &mut writer).await?,
                    }
                }
                Some(completion) = rx.recv() => {
                    match completion {
                        Completion::Upload(ticket, result) => {
                            self.view.complete_upload(ticket, result)
                        }
                        Completion::Analysis(ticket, result) => {
                            self.view.complete_analysis(ticket, result)
                        }
                    }
                    write_out(&mut writer, &render(&self.view)).await?;
                }
            }
        }

        info!("Interactive session finished");
        Ok(())
    }

    async fn handle_command<W>(
        &mut self,
        command: InteractiveCommand,
        tx: &mpsc::UnboundedSender<Completion>,
        writer: &mut W,
    ) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        match command {
            InteractiveCommand::File(path) => match SelectedFile::load(&path).await {
                Ok(file) => {
                    if let Some(request) = self.view.select_file(file) {
                        self.spawn_upload(request, tx);
                    }
                    write_out(writer, &render(&self.view)).await?;
                }
                Err(e) => {
                    warn!("{:#}", e);
                    write_out(writer, &format!("Could not open {}\n", path.display())).await?;
                }
            },
            InteractiveCommand::Job(text) => {
                self.view.update_job_description(text);
                write_out(writer, &render(&self.view)).await?;
            }
            InteractiveCommand::JobFile(path) => match read_file_safe(&path).await {
                Ok(text) => {
                    self.view.update_job_description(text);
                    write_out(writer, &render(&self.view)).await?;
                }
                Err(e) => {
                    warn!("{:#}", e);
                    write_out(writer, &format!("Could not open {}\n", path.display())).await?;
                }
            },
            InteractiveCommand::Analyze => {
                if self.view.is_loading() {
                    write_out(writer, "Analysis already running\n").await?;
                } else if !self.view.cv_text().is_empty() && self.view.job_description().is_empty()
                {
                    write_out(writer, "Enter a job description first\n").await?;
                } else {
                    if let Some(request) = self.view.analyze() {
                        self.spawn_analysis(request, tx);
                    }
                    write_out(writer, &render(&self.view)).await?;
                }
            }
            InteractiveCommand::Show => write_out(writer, &render(&self.view)).await?,
            InteractiveCommand::Help => write_out(writer, HELP).await?,
            InteractiveCommand::Empty => {}
            InteractiveCommand::Unknown(line) => {
                write_out(writer, &format!("Unknown command: {}\n{}", line, HELP)).await?
            }
            InteractiveCommand::Quit => {}
        }
        Ok(())
    }
}

async fn write_out<W: AsyncWrite + Unpin>(writer: &mut W, text: &str) -> Result<()> {
    writer
        .write_all(text.as_bytes())
        .await
        .context("Failed to write output")?;
    writer.flush().await.context("Failed to flush output")
}
