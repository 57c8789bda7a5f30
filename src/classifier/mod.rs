// ABOUTME: Classifier service contract and image upload validation
// ABOUTME: Defines the async trait the confidence resolver calls to recognize meal photos
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// HTTP client for the remote classifier service
pub mod http;

pub use http::HttpClassifierClient;

use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use nutrilens_core::constants::uploads::ALLOWED_IMAGE_EXTENSIONS;
use nutrilens_core::models::ClassificationResult;
use std::path::Path;

/// A meal photo selected for classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name
    pub file_name: String,
    /// MIME type
    pub content_type: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Create an upload, deriving the MIME type from the file extension
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_owned();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read an image file from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read
    pub async fn from_path(path: &Path) -> AppResult<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::invalid_input(format!("Cannot read image {}: {e}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_owned();
        Ok(Self::new(file_name, bytes))
    }

    /// Lower-cased file extension
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
    }

    /// Reject empty, oversized, or unsupported uploads
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the first problem found
    pub fn validate(&self, max_bytes: usize) -> AppResult<()> {
        if self.file_name.trim().is_empty() || self.bytes.is_empty() {
            return Err(AppError::missing_field("image"));
        }
        let supported = self
            .extension()
            .is_some_and(|ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()));
        if !supported {
            return Err(AppError::invalid_input(format!(
                "Unsupported image type '{}'. Allowed: {}",
                self.file_name,
                ALLOWED_IMAGE_EXTENSIONS.join(", ")
            )));
        }
        if self.bytes.len() > max_bytes {
            return Err(AppError::out_of_range(format!(
                "Image is {} bytes; the limit is {max_bytes} bytes",
                self.bytes.len()
            )));
        }
        Ok(())
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Image classifier collaborator
#[async_trait]
pub trait ClassifierService: Send + Sync {
    /// Classify one meal photo
    ///
    /// # Errors
    ///
    /// Returns a classification error carrying the service's message on failure
    async fn classify(&self, image: &ImageUpload) -> AppResult<ClassificationResult>;

    /// Full catalog of foods the classifier can recognize
    ///
    /// # Errors
    ///
    /// Returns `CatalogUnavailable` if the catalog cannot be fetched
    async fn supported_foods(&self) -> AppResult<Vec<String>>;
}
