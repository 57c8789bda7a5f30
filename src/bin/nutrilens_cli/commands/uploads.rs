// ABOUTME: Classification attempt history command for nutrilens-cli
// ABOUTME: Shows recent attempts, the confident rate, and tips for recurring failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::CliContext;
use crate::helpers::display;
use nutrilens::errors::AppResult;
use nutrilens::upload_tracker::UploadTracker;
use nutrilens_core::constants::uploads::DEFAULT_ATTEMPT_HISTORY_LIMIT;
use serde_json::json;

pub async fn uploads(ctx: &CliContext, limit: Option<u32>) -> AppResult<()> {
    let history = ctx
        .uploads
        .history(limit.unwrap_or(DEFAULT_ATTEMPT_HISTORY_LIMIT))
        .await?;
    let statistics = ctx.uploads.statistics().await?;
    let analysis = ctx.uploads.failure_analysis().await?;

    if ctx.json {
        return display::print_json(&json!({
            "history": history,
            "statistics": statistics,
            "failure_analysis": analysis,
        }));
    }
    display::display_uploads(&history, &statistics, &analysis);
    Ok(())
}
