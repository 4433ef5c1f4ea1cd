use anyhow::{Context, Result};
use clap::Parser;
use cv_analyzer::cli::{Cli, Command, OutputFormat};
use cv_analyzer::core::{ConfigManager, SelectedFile, ServiceClient};
use cv_analyzer::session::Session;
use cv_analyzer::utils::read_file_safe;
use cv_analyzer::view::{render, render_json_outcome, CvAnalyzerView};
use std::fs::OpenOptions;
use std::path::Path;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging(log_file: &Path, verbose: bool) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(log_file)
        .with_context(|| format!("Failed to open log file: {}", log_file.display()))?;

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .init();

    Ok(())
}

fn print_outcome(view: &CvAnalyzerView, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", render_json_outcome(view)?),
        OutputFormat::Text => print!("{}", render(view)),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigManager::load(&cli.config_overrides())?;
    init_logging(&config.log_file, cli.verbose)?;

    info!(
        "Configuration loaded for environment {}",
        config.environment
    );
    info!("Analysis service: {}", config.service.base_url);
    info!("Request timeout: {}s", config.service.timeout_seconds);

    let client = ServiceClient::new(&config.service)?;
    let mut session = Session::new(client);

    match cli.command {
        Command::Extract { cv } => {
            let file = SelectedFile::load(&cv).await?;
            session.select_file(file).await;

            if let Some(error) = session.view().error() {
                anyhow::bail!(error);
            }
            println!("{}", session.view().cv_text());
        }

        Command::Analyze { cv, job, format } => {
            let job_description = match (job.job, job.job_text) {
                (Some(path), _) => read_file_safe(&path).await?,
                (None, Some(text)) => text,
                (None, None) => anyhow::bail!("A job description is required"),
            };
            if job_description.is_empty() {
                anyhow::bail!("The job description is empty");
            }

            let file = SelectedFile::load(&cv).await?;
            session.set_job_description(job_description);
            session.select_file(file).await;
            if let Some(error) = session.view().error() {
                if format == OutputFormat::Json {
                    print_outcome(session.view(), format)?;
                }
                anyhow::bail!(error);
            }

            session.analyze().await;

            print_outcome(session.view(), format)?;
            if let Some(error) = session.view().error() {
                anyhow::bail!(error);
            }
        }

        Command::Interactive => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            session.run_interactive(stdin, tokio::io::stdout()).await?;
        }
    }

    Ok(())
}
