// src/core/config_manager.rs
//! Layered configuration: defaults, config.yaml, environment, then CLI flags

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigManager {
    pub environment: String,
    pub service: ServiceConfig,
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// One environment section of config.yaml; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
struct EnvironmentSection {
    api_url: Option<String>,
    timeout_seconds: Option<u64>,
    log_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: EnvironmentSection,
    #[serde(default)]
    production: EnvironmentSection,
}

/// Values taken from the command line, applied last
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub api_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self {
            environment: "local".to_string(),
            service: ServiceConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_seconds: DEFAULT_TIMEOUT_SECS,
            },
            log_file: std::env::temp_dir().join("cv-analyzer.log"),
        }
    }
}

impl ConfigManager {
    /// Load all configuration layers
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = Self::default();

        config.environment = Self::get_environment();
        match &overrides.config_path {
            Some(path) => {
                let section = Self::load_section(path, &config.environment)?;
                config
                    .apply_section(section)
                    .with_context(|| format!("Invalid config file: {}", path.display()))?;
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    let section = Self::load_section(&path, &config.environment)?;
                    config
                        .apply_section(section)
                        .with_context(|| format!("Invalid config file: {}", path.display()))?;
                }
            }
        }

        config.apply_env(
            std::env::var("CV_ANALYZER_API_URL").ok(),
            std::env::var("CV_ANALYZER_TIMEOUT_SECS").ok(),
        )?;
        config.apply_overrides(overrides)?;

        Ok(config)
    }

    fn get_environment() -> String {
        std::env::var("CV_ANALYZER_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_section(path: &Path, environment: &str) -> Result<EnvironmentSection> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse_section(&content, environment)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn parse_section(content: &str, environment: &str) -> Result<EnvironmentSection> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        Ok(match environment {
            "production" => file.production,
            _ => file.local,
        })
    }

    fn apply_section(&mut self, section: EnvironmentSection) -> Result<()> {
        if let Some(url) = section.api_url {
            self.service.base_url = url;
        }
        if let Some(timeout) = section.timeout_seconds {
            self.service.timeout_seconds = check_timeout(timeout)?;
        }
        if let Some(log_file) = section.log_file {
            self.log_file = log_file;
        }
        Ok(())
    }

    fn apply_env(&mut self, api_url: Option<String>, timeout: Option<String>) -> Result<()> {
        if let Some(url) = api_url {
            self.service.base_url = url;
        }
        if let Some(timeout) = timeout {
            let timeout = timeout
                .parse()
                .context("CV_ANALYZER_TIMEOUT_SECS must be a whole number of seconds")?;
            self.service.timeout_seconds =
                check_timeout(timeout).context("Invalid CV_ANALYZER_TIMEOUT_SECS")?;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<()> {
        if let Some(url) = &overrides.api_url {
            self.service.base_url = url.clone();
        }
        if let Some(timeout) = overrides.timeout_seconds {
            self.service.timeout_seconds = check_timeout(timeout).context("Invalid --timeout")?;
        }
        Ok(())
    }
}

/// A zero timeout would fail every request before it is sent
fn check_timeout(seconds: u64) -> Result<u64> {
    if seconds == 0 {
        anyhow::bail!("timeout must be at least 1 second");
    }
    Ok(seconds)
}
