// ABOUTME: Profile commands for nutrilens-cli
// ABOUTME: Stores the body profile and shows the daily targets derived from it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::CliContext;
use crate::helpers::display;
use nutrilens::errors::AppResult;
use nutrilens_core::models::{ActivityLevel, Gender, UserProfile, WeightGoal};
use serde_json::json;

/// Raw `profile set` arguments
pub struct ProfileArgs {
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub gender: String,
    pub activity: String,
    pub goal: String,
    pub restrictions: Vec<String>,
}

pub async fn set(ctx: &CliContext, args: ProfileArgs) -> AppResult<()> {
    let profile = UserProfile {
        age: args.age,
        height_cm: args.height_cm,
        weight_kg: args.weight_kg,
        gender: Gender::parse(&args.gender)?,
        activity_level: ActivityLevel::parse(&args.activity)?,
        goal: WeightGoal::parse(&args.goal)?,
        dietary_restrictions: args.restrictions,
    };
    let targets = ctx.tracker.save_profile(&profile).await?;
    if ctx.json {
        return display::print_json(&json!({ "profile": profile, "targets": targets }));
    }
    display::display_user_profile(&profile);
    display::display_profile_amounts("Daily targets:", &targets);
    Ok(())
}

pub async fn show(ctx: &CliContext) -> AppResult<()> {
    let profile = ctx.tracker.profile().await?;
    let targets = ctx.tracker.targets().await?;
    if ctx.json {
        return display::print_json(&json!({ "profile": profile, "targets": targets }));
    }
    match (profile, targets) {
        (Some(profile), Some(targets)) => {
            display::display_user_profile(&profile);
            display::display_profile_amounts("Daily targets:", &targets);
        }
        _ => println!("No profile stored."),
    }
    Ok(())
}

pub async fn clear(ctx: &CliContext) -> AppResult<()> {
    let removed = ctx.tracker.clear_profile().await?;
    if ctx.json {
        return display::print_json(&json!({ "removed": removed }));
    }
    println!("{}", if removed { "Profile removed." } else { "No profile stored." });
    Ok(())
}
