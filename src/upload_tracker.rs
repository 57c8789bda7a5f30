// ABOUTME: Classification attempt tracking with outcome statistics and failure analysis
// ABOUTME: The resolver records every classifier answer here; the CLI reports from it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::classifier::ImageUpload;
use crate::database::{Database, UploadManager};
use crate::errors::AppResult;
use async_trait::async_trait;
use nutrilens_core::constants::uploads::{MAX_TRACKED_ATTEMPTS, RECENT_FAILURE_WINDOW};
use nutrilens_core::models::{
    ClassificationResult, FailureAnalysis, UploadAttempt, UploadStatistics,
};
use tracing::debug;
use uuid::Uuid;

/// Build the attempt record for one classifier answer
#[must_use]
pub fn attempt_for(
    image: &ImageUpload,
    result: Result<&ClassificationResult, &str>,
) -> UploadAttempt {
    let id = Uuid::new_v4().to_string();
    let size = u64::try_from(image.bytes.len()).unwrap_or(u64::MAX);
    match result {
        Ok(classification) => {
            UploadAttempt::classified(id, image.file_name.clone(), size, classification)
        }
        Err(message) => UploadAttempt::failed(id, image.file_name.clone(), size, message),
    }
}

/// History of classification attempts
#[async_trait]
pub trait UploadTracker: Send + Sync {
    /// Record one attempt; only the newest attempts are kept
    ///
    /// # Errors
    ///
    /// Returns an error if the attempt cannot be stored
    async fn record(&self, attempt: &UploadAttempt) -> AppResult<()>;

    /// Newest attempts first
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read
    async fn history(&self, limit: u32) -> AppResult<Vec<UploadAttempt>>;

    /// Outcome counts over every tracked attempt
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read
    async fn statistics(&self) -> AppResult<UploadStatistics> {
        let attempts = self.history(MAX_TRACKED_ATTEMPTS).await?;
        Ok(UploadStatistics::from_attempts(&attempts))
    }

    /// Pattern in the most recent failures, with tips for the most common one
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read
    async fn failure_analysis(&self) -> AppResult<FailureAnalysis> {
        let attempts = self.history(MAX_TRACKED_ATTEMPTS).await?;
        Ok(FailureAnalysis::from_attempts(&attempts, RECENT_FAILURE_WINDOW))
    }
}

/// `SQLite`-backed attempt history
pub struct SqliteUploadTracker {
    uploads: UploadManager,
}

impl SqliteUploadTracker {
    /// Track attempts in `database`
    #[must_use]
    pub fn new(database: &Database) -> Self {
        Self {
            uploads: database.uploads(),
        }
    }
}

#[async_trait]
impl UploadTracker for SqliteUploadTracker {
    async fn record(&self, attempt: &UploadAttempt) -> AppResult<()> {
        self.uploads.insert(attempt, MAX_TRACKED_ATTEMPTS).await?;
        debug!(
            file = %attempt.file_name,
            outcome = attempt.outcome.as_str(),
            "Upload attempt recorded"
        );
        Ok(())
    }

    async fn history(&self, limit: u32) -> AppResult<Vec<UploadAttempt>> {
        self.uploads.recent(limit.min(MAX_TRACKED_ATTEMPTS)).await
    }
}
