// ABOUTME: Photo classification and catalog search commands for nutrilens-cli
// ABOUTME: Drives one ConfidenceResolver session per invocation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::CliContext;
use crate::helpers::display;
use nutrilens::classifier::{HttpClassifierClient, ImageUpload};
use nutrilens::config::ResolverConfig;
use nutrilens::errors::AppResult;
use nutrilens::resolver::{Candidate, ConfidenceResolver, MealLogger};
use nutrilens::upload_tracker::UploadTracker;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// What to do after classification
pub enum Choice {
    /// Only show the decision
    Show,
    /// Confirm a candidate
    Confirm(Candidate),
}

impl Choice {
    pub fn from_flags(accept: bool, pick: Option<String>, manual: Option<String>) -> Self {
        match (accept, pick, manual) {
            (_, _, Some(name)) => Self::Confirm(Candidate::Manual(name)),
            (_, Some(name), None) => Self::Confirm(Candidate::Alternate(name)),
            (true, None, None) => Self::Confirm(Candidate::Predicted),
            (false, None, None) => Self::Show,
        }
    }
}

fn resolver(ctx: &CliContext) -> AppResult<ConfidenceResolver> {
    let classifier = Arc::new(HttpClassifierClient::new(&ctx.config.classifier)?);
    // A one-shot process has no later frame to return to idle in
    let config = ResolverConfig {
        reset_delay: Duration::ZERO,
        ..ctx.config.resolver.clone()
    };
    let logger: Arc<dyn MealLogger> = ctx.tracker.clone();
    let uploads: Arc<dyn UploadTracker> = ctx.uploads.clone();
    Ok(ConfidenceResolver::new(classifier, logger, config).with_upload_tracker(uploads))
}

/// List supported foods, optionally filtered
pub async fn foods(ctx: &CliContext, query: Option<&str>) -> AppResult<()> {
    let foods = resolver(ctx)?.manual_search(query.unwrap_or("")).await?;
    if ctx.json {
        return display::print_json(&foods);
    }
    if foods.is_empty() {
        println!("No matching foods.");
    }
    for food in &foods {
        println!("{food}");
    }
    Ok(())
}

/// Classify `image` and act on `choice`
pub async fn classify(ctx: &CliContext, image: &Path, choice: Choice) -> AppResult<()> {
    let resolver = resolver(ctx)?;
    resolver.select_image(ImageUpload::from_path(image).await?).await?;
    let decision = resolver.classify().await?;

    let Choice::Confirm(candidate) = choice else {
        if ctx.json {
            return display::print_json(&decision);
        }
        display::display_decision(&decision);
        return Ok(());
    };

    let meal = resolver.confirm(candidate).await?;
    if ctx.json {
        return display::print_json(&json!({ "decision": decision, "meal": meal }));
    }
    display::display_decision(&decision);
    println!("\nLogged:");
    display::display_meal(&meal);
    Ok(())
}
