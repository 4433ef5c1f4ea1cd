// src/core/file.rs
//! A user-chosen file together with its declared media type

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use crate::utils::{media_type_for, PDF_MEDIA_TYPE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, declaring its media type from the extension
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| path.display().to_string());

        let media_type = media_type_for(&name);
        debug!(
            "Loaded {} ({} bytes, declared as {})",
            name,
            bytes.len(),
            media_type
        );

        Ok(Self::new(name, media_type, bytes))
    }

    pub fn is_pdf(&self) -> bool {
        self.media_type == PDF_MEDIA_TYPE
    }
}
