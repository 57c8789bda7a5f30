// ABOUTME: Personalized daily nutrient targets from body profile attributes
// ABOUTME: Harris-Benedict BMR, activity-scaled TDEE, goal adjustment, and macro split
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrient Target Provider
//!
//! # Formulas
//!
//! - BMR (Harris-Benedict, revised):
//!   - Men: `88.362 + 13.397 x weight_kg + 4.799 x height_cm - 5.677 x age`
//!   - Women: `447.593 + 9.247 x weight_kg + 3.098 x height_cm - 4.330 x age`
//! - TDEE = BMR x activity factor (low 1.2, moderate 1.55, high 1.725)
//! - Target energy = TDEE + goal adjustment (lose -500, maintain 0, gain +300 kcal)
//! - Carbohydrates 50% of energy / 4 kcal, protein 20% / 4 kcal, fat 30% / 9 kcal

use crate::config::TargetConfig;
use crate::intake_analyzer::round_one_decimal;
use nutrilens_core::errors::AppResult;
use nutrilens_core::models::{ActivityLevel, Gender, Nutrient, NutrientProfile, UserProfile, WeightGoal};

/// Derives daily nutrient targets from a body profile
pub trait TargetProvider: Send + Sync {
    /// Daily target quantity per nutrient for `profile`
    ///
    /// # Errors
    ///
    /// Returns a validation error when the profile is implausible
    fn targets_for(&self, profile: &UserProfile) -> AppResult<NutrientProfile>;
}

/// Harris-Benedict based [`TargetProvider`]
#[derive(Debug, Clone, Default)]
pub struct HarrisBenedictTargets {
    config: TargetConfig,
}

impl HarrisBenedictTargets {
    /// Create a provider with custom coefficients
    #[must_use]
    pub const fn new(config: TargetConfig) -> Self {
        Self { config }
    }

    /// Basal metabolic rate (kcal/day)
    ///
    /// # Errors
    ///
    /// Returns a validation error when the profile is implausible
    pub fn bmr(&self, profile: &UserProfile) -> AppResult<f64> {
        profile.validate()?;
        let c = &self.config;
        let age = f64::from(profile.age);
        let bmr = match profile.gender {
            Gender::Male => {
                c.male_constant + c.male_weight_coef * profile.weight_kg
                    + c.male_height_coef * profile.height_cm
                    - c.male_age_coef * age
            }
            Gender::Female => {
                c.female_constant + c.female_weight_coef * profile.weight_kg
                    + c.female_height_coef * profile.height_cm
                    - c.female_age_coef * age
            }
        };
        Ok(bmr)
    }

    /// Total daily energy expenditure (kcal/day)
    ///
    /// # Errors
    ///
    /// Returns a validation error when the profile is implausible
    pub fn tdee(&self, profile: &UserProfile) -> AppResult<f64> {
        let factor = match profile.activity_level {
            ActivityLevel::Low => self.config.low_activity_factor,
            ActivityLevel::Moderate => self.config.moderate_activity_factor,
            ActivityLevel::High => self.config.high_activity_factor,
        };
        Ok(self.bmr(profile)? * factor)
    }

    /// Goal-adjusted daily energy target (kcal/day)
    ///
    /// # Errors
    ///
    /// Returns a validation error when the profile is implausible
    pub fn target_calories(&self, profile: &UserProfile) -> AppResult<f64> {
        let adjustment = match profile.goal {
            WeightGoal::Lose => self.config.lose_adjustment_kcal,
            WeightGoal::Maintain => 0.0,
            WeightGoal::Gain => self.config.gain_adjustment_kcal,
        };
        Ok(self.tdee(profile)? + adjustment)
    }
}

impl TargetProvider for HarrisBenedictTargets {
    fn targets_for(&self, profile: &UserProfile) -> AppResult<NutrientProfile> {
        let c = &self.config;
        let calories = self.target_calories(profile)?;
        let carbohydrates = calories * c.carbohydrate_ratio / 4.0;
        let protein = calories * c.protein_ratio / 4.0;
        let fat = calories * c.fat_ratio / 9.0;
        let fiber = if profile.goal == WeightGoal::Lose {
            c.fiber_g_weight_loss
        } else {
            c.fiber_g
        };

        Ok([
            (Nutrient::Calories, calories),
            (Nutrient::Carbohydrates, carbohydrates),
            (Nutrient::Sugars, carbohydrates * c.sugar_share_of_carbs),
            (Nutrient::Protein, protein),
            (Nutrient::Fat, fat),
            (Nutrient::SaturatedFat, fat * c.saturated_share_of_fat),
            (Nutrient::Cholesterol, c.cholesterol_mg),
            (Nutrient::Sodium, c.sodium_mg),
            (Nutrient::Fiber, fiber),
        ]
        .into_iter()
        .map(|(nutrient, amount)| (nutrient, round_one_decimal(amount)))
        .collect())
    }
}
