// ABOUTME: Core data models for NutriLens
// ABOUTME: Re-exports nutrient, meal, classification, and profile types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Classifier output types
pub mod classification;
/// Logged meal records and log requests
pub mod meal;
/// Nutrient identifiers and per-nutrient quantity maps
pub mod nutrition;
/// Body profile used to derive daily targets
pub mod profile;
/// Classification attempt history and statistics
pub mod upload;

pub use classification::{ClassificationResult, Prediction};
pub use meal::{IntakeSummary, LogMealRequest, MealRecord};
pub use nutrition::{Nutrient, NutrientProfile};
pub use profile::{ActivityLevel, Gender, UserProfile, WeightGoal};
pub use upload::{FailureAnalysis, UploadAttempt, UploadOutcome, UploadStatistics};
