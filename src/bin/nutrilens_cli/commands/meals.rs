// ABOUTME: Meal log, history, progress, and recommendation commands for nutrilens-cli
// ABOUTME: Thin wrappers over the intake tracker and recommendation service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::CliContext;
use crate::helpers::display;
use chrono::NaiveDate;
use nutrilens::errors::AppResult;
use nutrilens_core::models::LogMealRequest;
use serde_json::json;

pub async fn log(ctx: &CliContext, food: String, confidence: Option<f64>) -> AppResult<()> {
    let request = confidence.map_or_else(
        || LogMealRequest::manual(food.clone()),
        |confidence| LogMealRequest::classified(food.clone(), confidence),
    );
    let meal = ctx.tracker.log_meal(&request).await?;
    if ctx.json {
        return display::print_json(&meal);
    }
    println!("Logged:");
    display::display_meal(&meal);
    display::display_profile_amounts("Nutrients:", &meal.nutrition);
    Ok(())
}

pub async fn history(ctx: &CliContext, date: Option<NaiveDate>, limit: Option<u32>) -> AppResult<()> {
    let limit = limit.unwrap_or(ctx.config.tracker.history_limit);
    let meals = ctx.tracker.history(date, limit).await?;
    if ctx.json {
        return display::print_json(&meals);
    }
    display::display_meals(&meals);
    Ok(())
}

pub async fn delete(ctx: &CliContext, id: &str) -> AppResult<()> {
    let meal = ctx.tracker.delete_meal(id).await?;
    if ctx.json {
        return display::print_json(&meal);
    }
    println!("Deleted {} ({})", meal.food_name, meal.id);
    Ok(())
}

pub async fn reset(ctx: &CliContext, date: Option<NaiveDate>) -> AppResult<()> {
    let removed = ctx.tracker.reset_day(date).await?;
    if ctx.json {
        return display::print_json(&json!({ "removed": removed }));
    }
    println!("Removed {removed} meal(s).");
    Ok(())
}

pub async fn progress(ctx: &CliContext, date: Option<NaiveDate>) -> AppResult<()> {
    let progress = ctx.tracker.progress(date).await?;
    if ctx.json {
        return display::print_json(&progress);
    }
    display::display_progress(&progress);
    Ok(())
}

pub async fn recommend(ctx: &CliContext, limit: Option<usize>) -> AppResult<()> {
    let limit = limit.unwrap_or(ctx.config.tracker.recommendation_limit);
    let report = ctx.recommendations.recommend(None, limit).await?;
    if ctx.json {
        return display::print_json(&report);
    }
    if report.progress.requires_profile {
        println!("Set a profile (`profile set`) to get recommendations.");
        return Ok(());
    }
    display::display_recommendations(&report.recommendations);
    Ok(())
}

pub async fn purge(ctx: &CliContext, keep_days: Option<u32>) -> AppResult<()> {
    let keep_days = keep_days.unwrap_or(ctx.config.tracker.retention_days);
    let removed = ctx.tracker.purge(keep_days).await?;
    if ctx.json {
        return display::print_json(&json!({ "removed": removed, "keep_days": keep_days }));
    }
    println!("Purged {removed} meal(s) older than {keep_days} day(s).");
    Ok(())
}
