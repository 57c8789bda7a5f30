// ABOUTME: Daily intake aggregation against personalized nutrient targets
// ABOUTME: Sums meal snapshots, classifies each nutrient into bands, and scores overall balance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Intake Aggregator
//!
//! [`compute_progress`] folds the meals logged on one day into a [`DailyProgress`].
//! It is a pure function of its inputs: callers re-run it after every insert, delete,
//! or reset instead of patching a cached result.
//!
//! # Bands
//!
//! With the standard table bands a nutrient's percentage of target is classified as
//! severe shortfall below 50, shortfall from 50 up to 80, balanced from 80 to 120
//! inclusive, and excess above 120.
//!
//! # Nutrition score
//!
//! Each nutrient with a positive target earns points from its intake ratio (see
//! [`ScoreWeights`]); the score is the mean, rounded to one decimal. Moving any
//! nutrient further from its balanced range never raises the score, and the mean does
//! not depend on nutrient order.

use crate::config::{IntelligenceConfig, ScoreWeights};
use chrono::{DateTime, NaiveDate, Utc};
use nutrilens_core::constants::nutrients::BandThresholds;
use nutrilens_core::models::{MealRecord, Nutrient, NutrientProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Band a nutrient's intake falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientStatus {
    /// Below the severe threshold
    SevereShortfall,
    /// Below the balanced range
    Shortfall,
    /// Within the balanced range
    Balanced,
    /// Above the balanced range
    Excess,
}

impl NutrientStatus {
    /// Classify a percentage-of-target against `bands`
    #[must_use]
    pub fn classify(percentage: f64, bands: &BandThresholds) -> Self {
        if percentage < bands.severe_below {
            Self::SevereShortfall
        } else if percentage < bands.shortfall_below {
            Self::Shortfall
        } else if percentage <= bands.excess_above {
            Self::Balanced
        } else {
            Self::Excess
        }
    }

    /// Whether the nutrient is below its balanced range
    #[must_use]
    pub const fn is_deficient(self) -> bool {
        matches!(self, Self::SevereShortfall | Self::Shortfall)
    }
}

/// Qualitative rating derived from the nutrition score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    /// Score of 85 or more
    Excellent,
    /// Score of 70 or more
    Good,
    /// Score of 50 or more
    Fair,
    /// Anything lower
    NeedsImprovement,
}

impl OverallStatus {
    /// Rating for a nutrition score
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Self::Excellent
        } else if score >= 70.0 {
            Self::Good
        } else if score >= 50.0 {
            Self::Fair
        } else {
            Self::NeedsImprovement
        }
    }

    /// Stable identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::NeedsImprovement => "needs_improvement",
        }
    }
}

/// Nutrients grouped by how urgently they need attention, each in table order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutrientPriorities {
    /// Severe shortfalls
    pub high_priority: Vec<Nutrient>,
    /// Mild shortfalls
    pub moderate_priority: Vec<Nutrient>,
    /// Nutrients over their range
    pub excess_warnings: Vec<Nutrient>,
    /// Nutrients within range
    pub balanced: Vec<Nutrient>,
}

/// Derived intake state for one day. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    /// Day aggregated
    pub date: NaiveDate,
    /// Summed quantities of the day's meals
    pub current_totals: NutrientProfile,
    /// Daily targets, absent when no profile exists
    pub targets: Option<NutrientProfile>,
    /// Set when no profile exists and targets could not be derived
    pub requires_profile: bool,
    /// `current / target * 100` for nutrients with a positive target
    pub percentages: BTreeMap<Nutrient, f64>,
    /// Band per nutrient with a percentage
    pub statuses: BTreeMap<Nutrient, NutrientStatus>,
    /// `target - current` for nutrients below the balanced range
    pub deficient_nutrients: BTreeMap<Nutrient, f64>,
    /// `current - target` for nutrients above the balanced range
    pub excess_nutrients: BTreeMap<Nutrient, f64>,
    /// `max(0, target - current)` for nutrients with a positive target
    pub remaining: BTreeMap<Nutrient, f64>,
    /// Overall balance in [0, 100], absent without targets
    pub nutrition_score: Option<f64>,
    /// Meals counted
    pub meal_count: usize,
    /// Latest meal counted
    pub last_meal_at: Option<DateTime<Utc>>,
}

/// Fold `meals` logged on `date` into a [`DailyProgress`].
///
/// Meals from other days are ignored. Without `targets` the result carries totals only
/// and sets `requires_profile`. Targets that are zero, negative, or not finite produce
/// no percentage for that nutrient.
#[must_use]
pub fn compute_progress(
    date: NaiveDate,
    meals: &[MealRecord],
    targets: Option<&NutrientProfile>,
    config: &IntelligenceConfig,
) -> DailyProgress {
    let day_meals: Vec<&MealRecord> = meals.iter().filter(|meal| meal.day == date).collect();

    let mut current_totals = NutrientProfile::new();
    for meal in &day_meals {
        current_totals += &meal.nutrition;
    }

    let mut progress = DailyProgress {
        date,
        current_totals,
        targets: targets.cloned(),
        requires_profile: targets.is_none(),
        percentages: BTreeMap::new(),
        statuses: BTreeMap::new(),
        deficient_nutrients: BTreeMap::new(),
        excess_nutrients: BTreeMap::new(),
        remaining: BTreeMap::new(),
        nutrition_score: None,
        meal_count: day_meals.len(),
        last_meal_at: day_meals.iter().map(|meal| meal.logged_at).max(),
    };

    let Some(targets) = targets else {
        return progress;
    };

    for (nutrient, target) in scorable_targets(targets) {
        let current = progress.current_totals.get(nutrient);
        let percentage = current / target * 100.0;
        let status = NutrientStatus::classify(percentage, &config.bands_for(nutrient));

        progress.percentages.insert(nutrient, percentage);
        progress.statuses.insert(nutrient, status);
        progress.remaining.insert(nutrient, (target - current).max(0.0));
        if status.is_deficient() {
            progress.deficient_nutrients.insert(nutrient, target - current);
        } else if status == NutrientStatus::Excess {
            progress.excess_nutrients.insert(nutrient, current - target);
        }
    }

    progress.nutrition_score = nutrition_score(&progress.current_totals, targets, config);
    progress
}

/// Score `totals` against `targets`, or `None` when no target is positive
#[must_use]
pub fn nutrition_score(
    totals: &NutrientProfile,
    targets: &NutrientProfile,
    config: &IntelligenceConfig,
) -> Option<f64> {
    let points: Vec<f64> = scorable_targets(targets)
        .map(|(nutrient, target)| {
            let ratio = totals.get(nutrient) / target;
            ratio_points(ratio, &config.bands_for(nutrient), &config.score)
        })
        .collect();

    if points.is_empty() {
        return None;
    }
    let mean = points.iter().sum::<f64>() / points.len() as f64;
    Some(round_one_decimal(mean))
}

fn scorable_targets(targets: &NutrientProfile) -> impl Iterator<Item = (Nutrient, f64)> + '_ {
    targets
        .iter()
        .filter(|(_, target)| target.is_finite() && *target > 0.0)
}

fn ratio_points(ratio: f64, bands: &BandThresholds, weights: &ScoreWeights) -> f64 {
    let balanced_low = bands.shortfall_below / 100.0;
    let balanced_high = bands.excess_above / 100.0;

    if (balanced_low..=balanced_high).contains(&ratio) {
        weights.balanced_points
    } else if (weights.near_low..=weights.near_high).contains(&ratio) {
        weights.near_points
    } else if (weights.far_low..=weights.far_high).contains(&ratio) {
        weights.far_points
    } else {
        weights.off_points
    }
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl DailyProgress {
    /// Percentage of target for `nutrient`, absent when its target is zero or missing
    #[must_use]
    pub fn percentage(&self, nutrient: Nutrient) -> Option<f64> {
        self.percentages.get(&nutrient).copied()
    }

    /// Qualitative rating, absent without a score
    #[must_use]
    pub fn overall_status(&self) -> Option<OverallStatus> {
        self.nutrition_score.map(OverallStatus::from_score)
    }

    /// Nutrients grouped by urgency
    #[must_use]
    pub fn priorities(&self) -> NutrientPriorities {
        let mut priorities = NutrientPriorities::default();
        for (nutrient, status) in &self.statuses {
            let bucket = match status {
                NutrientStatus::SevereShortfall => &mut priorities.high_priority,
                NutrientStatus::Shortfall => &mut priorities.moderate_priority,
                NutrientStatus::Excess => &mut priorities.excess_warnings,
                NutrientStatus::Balanced => &mut priorities.balanced,
            };
            bucket.push(*nutrient);
        }
        priorities
    }

    /// Templated guidance lines for the day
    #[must_use]
    pub fn summary_messages(&self) -> Vec<String> {
        if self.requires_profile {
            return vec!["Set up a profile to get personalized targets.".to_owned()];
        }

        let mut messages = Vec::new();
        let deficient = self.deficient_nutrients.len();
        if deficient > 3 {
            messages.push(
                "Several nutrients are short of target. A balanced meal is recommended."
                    .to_owned(),
            );
        } else if deficient > 0 {
            messages.push("Some nutrients still need topping up.".to_owned());
        }
        if self.excess_nutrients.len() > 2 {
            messages.push("Consider cutting back on some nutrients.".to_owned());
        }
        if self.nutrition_score.is_some_and(|score| score >= 80.0) {
            messages.push("You are keeping an excellent nutritional balance!".to_owned());
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        let bands = BandThresholds::STANDARD;

        assert_eq!(NutrientStatus::classify(49.9, &bands), NutrientStatus::SevereShortfall);
        assert_eq!(NutrientStatus::classify(50.0, &bands), NutrientStatus::Shortfall);
        assert_eq!(NutrientStatus::classify(79.9, &bands), NutrientStatus::Shortfall);
        assert_eq!(NutrientStatus::classify(80.0, &bands), NutrientStatus::Balanced);
        assert_eq!(NutrientStatus::classify(120.0, &bands), NutrientStatus::Balanced);
        assert_eq!(NutrientStatus::classify(120.1, &bands), NutrientStatus::Excess);
    }

    #[test]
    fn test_ratio_points_bands() {
        let bands = BandThresholds::STANDARD;
        let weights = ScoreWeights::default();

        assert!((ratio_points(1.0, &bands, &weights) - 100.0).abs() < f64::EPSILON);
        assert!((ratio_points(0.6, &bands, &weights) - 70.0).abs() < f64::EPSILON);
        assert!((ratio_points(1.4, &bands, &weights) - 70.0).abs() < f64::EPSILON);
        assert!((ratio_points(0.4, &bands, &weights) - 40.0).abs() < f64::EPSILON);
        assert!((ratio_points(1.8, &bands, &weights) - 40.0).abs() < f64::EPSILON);
        assert!((ratio_points(0.1, &bands, &weights) - 10.0).abs() < f64::EPSILON);
        assert!((ratio_points(2.5, &bands, &weights) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overall_status_thresholds() {
        assert_eq!(OverallStatus::from_score(85.0), OverallStatus::Excellent);
        assert_eq!(OverallStatus::from_score(84.9), OverallStatus::Good);
        assert_eq!(OverallStatus::from_score(50.0), OverallStatus::Fair);
        assert_eq!(OverallStatus::from_score(49.9), OverallStatus::NeedsImprovement);
    }

    #[test]
    fn test_score_absent_without_positive_targets() {
        let targets = NutrientProfile::new().with(Nutrient::Protein, 0.0);
        let totals = NutrientProfile::new().with(Nutrient::Protein, 10.0);

        assert_eq!(
            nutrition_score(&totals, &targets, &IntelligenceConfig::default()),
            None
        );
    }
}
