// ABOUTME: Logged meal records and meal log requests
// ABOUTME: MealRecord freezes the nutrient snapshot taken when the meal was logged
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::confidence::MANUAL_SELECTION_CONFIDENCE;
use crate::errors::{AppError, AppResult};
use crate::models::NutrientProfile;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Request to record one eating event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogMealRequest {
    /// Confirmed food name
    pub food_name: String,
    /// Confidence percentage behind the confirmation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
}

impl LogMealRequest {
    /// Request for a classifier-sourced pick, carrying the classifier's confidence
    pub fn classified(food_name: impl Into<String>, confidence: f64) -> Self {
        Self {
            food_name: food_name.into(),
            confidence_score: Some(confidence),
        }
    }

    /// Request for a manual catalog pick, recorded at full confidence
    pub fn manual(food_name: impl Into<String>) -> Self {
        Self {
            food_name: food_name.into(),
            confidence_score: Some(MANUAL_SELECTION_CONFIDENCE),
        }
    }

    /// Reject empty names and out-of-range confidences
    ///
    /// # Errors
    ///
    /// Returns a validation error when the food name is blank or the confidence is not
    /// a finite percentage
    pub fn validate(&self) -> AppResult<()> {
        if self.food_name.trim().is_empty() {
            return Err(AppError::missing_field("food_name"));
        }
        if let Some(score) = self.confidence_score {
            if !score.is_finite() || !(0.0..=100.0).contains(&score) {
                return Err(AppError::out_of_range(format!(
                    "confidence_score must be within 0-100, got {score}"
                )));
            }
        }
        Ok(())
    }
}

/// One logged eating event. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecord {
    /// Store-assigned identifier
    pub id: String,
    /// Food name
    pub food_name: String,
    /// Confidence percentage, absent for legacy manual entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    /// Creation timestamp
    pub logged_at: DateTime<Utc>,
    /// Calendar day the meal counts towards
    pub day: NaiveDate,
    /// Per-serving nutrient snapshot taken at log time
    pub nutrition: NutrientProfile,
}

/// Counts for one day of logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeSummary {
    /// Day summarized
    pub day: NaiveDate,
    /// Meals logged that day
    pub total_meals: u32,
    /// Most recent meal timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_meal_at: Option<DateTime<Utc>>,
}
