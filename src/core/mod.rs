// src/core/mod.rs
//! Configuration, file selection and the backend client

pub mod config_manager;
pub mod file;
pub mod service_client;

pub use config_manager::{ConfigManager, ConfigOverrides, ServiceConfig};
pub use file::SelectedFile;
pub use service_client::{CvService, ServiceClient};
