// ABOUTME: Policy configuration for intake classification, scoring, and ranking
// ABOUTME: Every tunable constant lives here with a Default matching documented behaviour
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use nutrilens_core::constants::nutrients::BandThresholds;
use nutrilens_core::models::Nutrient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level policy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntelligenceConfig {
    /// Per-nutrient band overrides; nutrients not listed use the nutrient table's bands
    #[serde(default)]
    pub band_overrides: BTreeMap<Nutrient, BandThresholds>,
    /// Nutrition score weights
    #[serde(default)]
    pub score: ScoreWeights,
    /// Recommendation ranking weights
    #[serde(default)]
    pub ranker: RankerConfig,
}

impl IntelligenceConfig {
    /// Bands in effect for `nutrient`
    #[must_use]
    pub fn bands_for(&self, nutrient: Nutrient) -> BandThresholds {
        self.band_overrides
            .get(&nutrient)
            .copied()
            .unwrap_or(nutrient.spec().bands)
    }
}

/// Points awarded per nutrient when computing the nutrition score.
///
/// The balanced range comes from the nutrient's bands. Outside it, ratios within
/// `[near_low, near_high]` earn `near_points`, ratios within `[far_low, far_high]` earn
/// `far_points`, and anything else earns `off_points`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Points for a balanced nutrient
    pub balanced_points: f64,
    /// Points for a mildly out-of-band nutrient
    pub near_points: f64,
    /// Points for a clearly out-of-band nutrient
    pub far_points: f64,
    /// Points for anything further out
    pub off_points: f64,
    /// Lower ratio bound of the near band
    pub near_low: f64,
    /// Upper ratio bound of the near band
    pub near_high: f64,
    /// Lower ratio bound of the far band
    pub far_low: f64,
    /// Upper ratio bound of the far band
    pub far_high: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            balanced_points: 100.0,
            near_points: 70.0,
            far_points: 40.0,
            off_points: 10.0,
            near_low: 0.5,
            near_high: 1.5,
            far_low: 0.3,
            far_high: 2.0,
        }
    }
}

/// Inclusive `[min, max]` range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShareRange {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl ShareRange {
    /// Whether `value` lies within the range, bounds included
    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Recommendation ranking weights and text thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankerConfig {
    /// Points for fully closing one deficiency gap
    pub deficiency_weight: f64,
    /// Points removed for fully adding to one excess
    pub excess_penalty: f64,
    /// Multiplier on the projected nutrition score gain (0 disables)
    pub balance_improvement_weight: f64,
    /// Share of a remaining allowance that earns `ideal_share_points`
    pub ideal_share: ShareRange,
    /// Points for a serving inside `ideal_share`
    pub ideal_share_points: f64,
    /// Wider share of a remaining allowance that earns `acceptable_share_points`
    pub acceptable_share: ShareRange,
    /// Points for a serving inside `acceptable_share` only
    pub acceptable_share_points: f64,
    /// Fraction of a gap a food must cover to be named in the reasoning
    pub reasoning_min_coverage: f64,
    /// Fraction of a gap a food must cover to earn a nutrient benefit
    pub benefit_min_coverage: f64,
    /// Most nutrients named in one reasoning line
    pub max_reasons: usize,
    /// Protein per serving (g) above which a food is tagged high-protein
    pub high_protein_grams: f64,
    /// Fiber per serving (g) above which a food is tagged fiber-rich
    pub high_fiber_grams: f64,
    /// Calories per serving below which a food is tagged low-calorie
    pub low_calorie_kcal: f64,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            deficiency_weight: 30.0,
            excess_penalty: 20.0,
            balance_improvement_weight: 0.5,
            ideal_share: ShareRange { min: 0.1, max: 0.5 },
            ideal_share_points: 10.0,
            acceptable_share: ShareRange {
                min: 0.05,
                max: 0.8,
            },
            acceptable_share_points: 5.0,
            reasoning_min_coverage: 0.1,
            benefit_min_coverage: 0.15,
            max_reasons: 3,
            high_protein_grams: 15.0,
            high_fiber_grams: 5.0,
            low_calorie_kcal: 200.0,
        }
    }
}

/// Harris-Benedict coefficients and macronutrient split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Male BMR constant
    pub male_constant: f64,
    /// Male weight coefficient
    pub male_weight_coef: f64,
    /// Male height coefficient
    pub male_height_coef: f64,
    /// Male age coefficient
    pub male_age_coef: f64,
    /// Female BMR constant
    pub female_constant: f64,
    /// Female weight coefficient
    pub female_weight_coef: f64,
    /// Female height coefficient
    pub female_height_coef: f64,
    /// Female age coefficient
    pub female_age_coef: f64,
    /// TDEE multiplier for low activity
    pub low_activity_factor: f64,
    /// TDEE multiplier for moderate activity
    pub moderate_activity_factor: f64,
    /// TDEE multiplier for high activity
    pub high_activity_factor: f64,
    /// kcal adjustment for a weight-loss goal
    pub lose_adjustment_kcal: f64,
    /// kcal adjustment for a weight-gain goal
    pub gain_adjustment_kcal: f64,
    /// Share of energy from carbohydrates
    pub carbohydrate_ratio: f64,
    /// Share of energy from protein
    pub protein_ratio: f64,
    /// Share of energy from fat
    pub fat_ratio: f64,
    /// Sugars as a share of carbohydrates
    pub sugar_share_of_carbs: f64,
    /// Saturated fat as a share of fat
    pub saturated_share_of_fat: f64,
    /// Daily cholesterol ceiling (mg)
    pub cholesterol_mg: f64,
    /// Daily sodium ceiling (mg)
    pub sodium_mg: f64,
    /// Daily fiber target (g)
    pub fiber_g: f64,
    /// Daily fiber target while losing weight (g)
    pub fiber_g_weight_loss: f64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            male_constant: 88.362,
            male_weight_coef: 13.397,
            male_height_coef: 4.799,
            male_age_coef: 5.677,
            female_constant: 447.593,
            female_weight_coef: 9.247,
            female_height_coef: 3.098,
            female_age_coef: 4.330,
            low_activity_factor: 1.2,
            moderate_activity_factor: 1.55,
            high_activity_factor: 1.725,
            lose_adjustment_kcal: -500.0,
            gain_adjustment_kcal: 300.0,
            carbohydrate_ratio: 0.5,
            protein_ratio: 0.2,
            fat_ratio: 0.3,
            sugar_share_of_carbs: 0.1,
            saturated_share_of_fat: 0.33,
            cholesterol_mg: 300.0,
            sodium_mg: 2300.0,
            fiber_g: 25.0,
            fiber_g_weight_loss: 30.0,
        }
    }
}
