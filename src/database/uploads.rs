// ABOUTME: Database operations for the classification attempt history
// ABOUTME: Appends attempts, keeps only the newest ones, and lists them newest first
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::meals::{format_timestamp, parse_timestamp};
use crate::errors::{AppError, AppResult};
use nutrilens_core::models::{UploadAttempt, UploadOutcome};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

/// Database manager for upload attempts
pub struct UploadManager {
    pool: SqlitePool,
}

impl UploadManager {
    /// Create a new upload manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record an attempt, then drop all but the newest `keep` attempts
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn insert(&self, attempt: &UploadAttempt, keep: u32) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO upload_attempts
                (id, file_name, size_bytes, attempted_at, outcome, predicted_food, confidence, error)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(&attempt.id)
        .bind(&attempt.file_name)
        .bind(i64::try_from(attempt.size_bytes).unwrap_or(i64::MAX))
        .bind(format_timestamp(attempt.attempted_at))
        .bind(attempt.outcome.as_str())
        .bind(attempt.predicted_food.as_deref())
        .bind(attempt.confidence)
        .bind(attempt.error.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert upload attempt: {e}")))?;

        sqlx::query(
            r"
            DELETE FROM upload_attempts
            WHERE seq NOT IN (SELECT seq FROM upload_attempts ORDER BY seq DESC LIMIT $1)
            ",
        )
        .bind(i64::from(keep))
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to prune upload attempts: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit upload attempt: {e}")))?;
        Ok(())
    }

    /// Newest attempts first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or a stored value is corrupt
    pub async fn recent(&self, limit: u32) -> AppResult<Vec<UploadAttempt>> {
        let rows = sqlx::query(
            r"
            SELECT id, file_name, size_bytes, attempted_at, outcome, predicted_food, confidence, error
            FROM upload_attempts
            ORDER BY seq DESC
            LIMIT $1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list upload attempts: {e}")))?;

        rows.iter().map(row_to_attempt).collect()
    }
}

/// Convert a database row to an `UploadAttempt`
fn row_to_attempt(row: &SqliteRow) -> AppResult<UploadAttempt> {
    let size_bytes: i64 = row.get("size_bytes");
    let attempted_at: String = row.get("attempted_at");
    let outcome: String = row.get("outcome");

    Ok(UploadAttempt {
        id: row.get("id"),
        file_name: row.get("file_name"),
        size_bytes: u64::try_from(size_bytes).unwrap_or(0),
        attempted_at: parse_timestamp(&attempted_at)?,
        outcome: UploadOutcome::parse(&outcome)?,
        predicted_food: row.get("predicted_food"),
        confidence: row.get("confidence"),
        error: row.get("error"),
    })
}
