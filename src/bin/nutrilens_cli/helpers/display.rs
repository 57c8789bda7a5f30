// ABOUTME: Output formatting helpers for nutrilens-cli
// ABOUTME: Renders meals, progress, decisions, and recommendations as text or JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use nutrilens::errors::{AppError, AppResult, ErrorResponse};
use nutrilens::resolver::Decision;
use nutrilens_core::models::{
    FailureAnalysis, MealRecord, Nutrient, NutrientProfile, UploadAttempt, UploadStatistics,
    UserProfile,
};
use nutrilens_intelligence::{DailyProgress, ScoredRecommendation};
use serde::Serialize;

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Report a failed command on stderr, or as an `ErrorResponse` on stdout in JSON mode
pub fn report_error(error: AppError, json: bool) {
    if json {
        if let Err(e) = print_json(&ErrorResponse::from(error)) {
            eprintln!("Error: {e}");
        }
        return;
    }
    eprintln!("Error: {error}");
}

fn confidence_label(confidence: Option<f64>) -> String {
    confidence.map_or_else(|| "-".to_owned(), |c| format!("{c:.1}%"))
}

/// One meal per line
pub fn display_meal(meal: &MealRecord) {
    println!(
        "{}  {}  {:<20} {:>7}  {}",
        meal.logged_at.format("%Y-%m-%d %H:%M"),
        meal.day,
        meal.food_name,
        confidence_label(meal.confidence_score),
        meal.id
    );
}

/// Meal list with a header
pub fn display_meals(meals: &[MealRecord]) {
    if meals.is_empty() {
        println!("No meals logged.");
        return;
    }
    println!("{:<16}  {:<10}  {:<20} {:>7}  ID", "Logged", "Day", "Food", "Conf.");
    println!("{}", "=".repeat(80));
    for meal in meals {
        display_meal(meal);
    }
}

/// Classifier decision
pub fn display_decision(decision: &Decision) {
    match decision {
        Decision::AutoAccept {
            food_name,
            confidence,
        } => {
            println!("Detected: {food_name} ({confidence:.1}%)");
            println!("Confirm with --accept, or choose another food with --manual.");
        }
        Decision::Disambiguate {
            alternates,
            manual_search_available,
        } => {
            println!("Not sure what this is. Candidates:");
            for (index, alternate) in alternates.iter().enumerate() {
                println!(
                    "  {}. {} ({:.1}%)",
                    index + 1,
                    alternate.food_name,
                    alternate.confidence
                );
            }
            if *manual_search_available {
                println!("Pick one with --pick <name>, or search with `foods --query`.");
            }
        }
    }
}

/// Nutrient amounts, one per line
pub fn display_profile_amounts(title: &str, amounts: &NutrientProfile) {
    println!("{title}");
    for (nutrient, amount) in amounts.iter() {
        println!("   {:<12} {}", nutrient.display_name(), nutrient.format_amount(amount));
    }
}

/// Daily progress report
pub fn display_progress(progress: &DailyProgress) {
    println!("\nIntake for {} ({} meals)", progress.date, progress.meal_count);
    println!("{}", "=".repeat(60));

    if progress.requires_profile {
        display_profile_amounts("Totals:", &progress.current_totals);
        println!("\nSet a profile (`profile set`) to compare against daily targets.");
        return;
    }

    for nutrient in Nutrient::ALL {
        let Some(percentage) = progress.percentage(nutrient) else {
            continue;
        };
        let target = progress
            .targets
            .as_ref()
            .map_or(0.0, |targets| targets.get(nutrient));
        let status = progress
            .statuses
            .get(&nutrient)
            .map_or_else(String::new, |status| format!("{status:?}"));
        println!(
            "   {:<12} {:>12} / {:<12} {:>6.1}%  {}",
            nutrient.display_name(),
            nutrient.format_amount(progress.current_totals.get(nutrient)),
            nutrient.format_amount(target),
            percentage,
            status
        );
    }

    if let (Some(score), Some(status)) = (progress.nutrition_score, progress.overall_status()) {
        println!("\nNutrition score: {score:.1} ({})", status.as_str());
    }
    for message in progress.summary_messages() {
        println!("• {message}");
    }
}

/// Ranked recommendations
pub fn display_recommendations(items: &[ScoredRecommendation]) {
    if items.is_empty() {
        println!("Nothing to recommend right now.");
        return;
    }
    for (index, item) in items.iter().enumerate() {
        println!("{}. {} (score {:.1})", index + 1, item.food_name, item.score);
        println!("   {}", item.reasoning);
        if !item.benefits.is_empty() {
            println!("   {}", item.benefits.join(", "));
        }
    }
}

/// Stored profile
pub fn display_user_profile(profile: &UserProfile) {
    println!("Profile:");
    println!("   Age: {}", profile.age);
    println!("   Height: {} cm", profile.height_cm);
    println!("   Weight: {} kg", profile.weight_kg);
    println!("   Gender: {}", profile.gender.as_str());
    println!("   Activity: {}", profile.activity_level.as_str());
    println!("   Goal: {}", profile.goal.as_str());
    if !profile.dietary_restrictions.is_empty() {
        println!("   Restrictions: {}", profile.dietary_restrictions.join(", "));
    }
}

/// Classification attempts with outcome statistics
pub fn display_uploads(
    history: &[UploadAttempt],
    statistics: &UploadStatistics,
    analysis: &FailureAnalysis,
) {
    if history.is_empty() {
        println!("No classification attempts recorded.");
        return;
    }
    println!("{:<16}  {:<24} {:<15} Result", "Attempted", "File", "Outcome");
    println!("{}", "=".repeat(80));
    for attempt in history {
        let result = match (&attempt.predicted_food, &attempt.error) {
            (Some(food), _) => format!("{food} ({})", confidence_label(attempt.confidence)),
            (None, Some(error)) => error.clone(),
            (None, None) => "-".to_owned(),
        };
        println!(
            "{}  {:<24} {:<15} {}",
            attempt.attempted_at.format("%Y-%m-%d %H:%M"),
            attempt.file_name,
            attempt.outcome.as_str(),
            result
        );
    }

    println!(
        "\n{} attempts, {} confident, {} not ({:.1}% confident)",
        statistics.total, statistics.confident, statistics.failed, statistics.success_rate
    );
    if let Some(outcome) = analysis.most_common {
        println!(
            "Most common recent failure: {} ({} of the last {})",
            outcome.as_str(),
            analysis.failure_types.get(&outcome).copied().unwrap_or(0),
            analysis.total_failures
        );
        for suggestion in &analysis.suggestions {
            println!("• {suggestion}");
        }
    }
}
