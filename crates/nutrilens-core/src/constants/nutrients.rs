// ABOUTME: Static nutrient configuration table keyed by nutrient
// ABOUTME: Holds display name, unit, raw data-file key, and classification bands per nutrient
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrient configuration table.
//!
//! Every place that needs a nutrient's label, unit, or band boundaries looks it up here
//! instead of carrying its own mapping literal.

use crate::models::Nutrient;
use serde::{Deserialize, Serialize};

/// Percentage-of-target band boundaries used to classify intake
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    /// Below this percentage intake is a severe shortfall
    pub severe_below: f64,
    /// Below this percentage (and at or above `severe_below`) intake is a shortfall
    pub shortfall_below: f64,
    /// Above this percentage intake is in excess
    pub excess_above: f64,
}

impl BandThresholds {
    /// Default bands: < 50 severe, 50-80 caution, 80-120 balanced, > 120 excess
    pub const STANDARD: Self = Self {
        severe_below: 50.0,
        shortfall_below: 80.0,
        excess_above: 120.0,
    };
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Configuration entry for one nutrient
#[derive(Debug, Clone, Copy)]
pub struct NutrientSpec {
    /// Nutrient this entry describes
    pub nutrient: Nutrient,
    /// Human-readable label
    pub display_name: &'static str,
    /// Measurement unit
    pub unit: &'static str,
    /// Key used by the per-food nutrient data files
    pub source_key: &'static str,
    /// Classification bands
    pub bands: BandThresholds,
}

/// The nutrient table, in canonical display order
pub static NUTRIENT_TABLE: [NutrientSpec; 9] = [
    NutrientSpec {
        nutrient: Nutrient::Calories,
        display_name: "칼로리",
        unit: "kcal",
        source_key: "e",
        bands: BandThresholds::STANDARD,
    },
    NutrientSpec {
        nutrient: Nutrient::Carbohydrates,
        display_name: "탄수화물",
        unit: "g",
        source_key: "cal",
        bands: BandThresholds::STANDARD,
    },
    NutrientSpec {
        nutrient: Nutrient::Sugars,
        display_name: "당류",
        unit: "g",
        source_key: "sug",
        bands: BandThresholds::STANDARD,
    },
    NutrientSpec {
        nutrient: Nutrient::Protein,
        display_name: "단백질",
        unit: "g",
        source_key: "pro",
        bands: BandThresholds::STANDARD,
    },
    NutrientSpec {
        nutrient: Nutrient::Fat,
        display_name: "지방",
        unit: "g",
        source_key: "fat",
        bands: BandThresholds::STANDARD,
    },
    NutrientSpec {
        nutrient: Nutrient::SaturatedFat,
        display_name: "포화지방",
        unit: "g",
        source_key: "total_sfa",
        bands: BandThresholds::STANDARD,
    },
    NutrientSpec {
        nutrient: Nutrient::Cholesterol,
        display_name: "콜레스테롤",
        unit: "mg",
        source_key: "chol",
        bands: BandThresholds::STANDARD,
    },
    NutrientSpec {
        nutrient: Nutrient::Sodium,
        display_name: "나트륨",
        unit: "mg",
        source_key: "na",
        bands: BandThresholds::STANDARD,
    },
    NutrientSpec {
        nutrient: Nutrient::Fiber,
        display_name: "식이섬유",
        unit: "g",
        source_key: "total_tfa",
        bands: BandThresholds::STANDARD,
    },
];

/// Key in the per-food data files holding the serving size in grams
pub const SERVING_SIZE_KEY: &str = "g";

/// Serving size assumed when a data file omits it
pub const DEFAULT_SERVING_GRAMS: f64 = 100.0;

/// Look up a nutrient by its data-file key
#[must_use]
pub fn by_source_key(key: &str) -> Option<&'static NutrientSpec> {
    NUTRIENT_TABLE.iter().find(|spec| spec.source_key == key)
}
