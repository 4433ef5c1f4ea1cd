// src/cli.rs
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::ConfigOverrides;

#[derive(Parser)]
#[command(name = "cv-analyzer")]
#[command(about = "Match a PDF resume against a job description using a remote analysis service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the upload/analysis backend
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Configuration file (defaults to ./config.yaml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Upload a PDF resume and print the extracted text
    Extract {
        /// Path to the resume (PDF)
        #[arg(long)]
        cv: PathBuf,
    },
    /// Upload a resume and analyze it against a job description
    Analyze {
        /// Path to the resume (PDF)
        #[arg(long)]
        cv: PathBuf,

        #[command(flatten)]
        job: JobSource,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Line-oriented session: select files and analyze at your own pace
    Interactive,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct JobSource {
    /// File containing the job description
    #[arg(long)]
    pub job: Option<PathBuf>,

    /// Job description given inline
    #[arg(long)]
    pub job_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            api_url: self.api_url.clone(),
            timeout_seconds: self.timeout,
        }
    }
}
