// ABOUTME: Per-food nutrient lookup table backed by a directory of JSON data files
// ABOUTME: Parses the food_info nutrition layout into NutrientProfile snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrient Table
//!
//! Each food lives in `<food name>.json` with the layout
//! `{"data": {"food_info": {"name": .., "nutrition": {"e": .., "pro": .., "g": ..}}}}`.
//! Nutrition keys map onto nutrients through the static nutrient table; values may be
//! numbers or numeric strings, and anything unparseable counts as zero.

use crate::errors::{AppError, AppResult};
use nutrilens_core::constants::nutrients::{by_source_key, DEFAULT_SERVING_GRAMS, SERVING_SIZE_KEY};
use nutrilens_core::models::NutrientProfile;
use nutrilens_intelligence::CandidateFood;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Lookup data for per-serving nutrient quantities
pub trait NutrientTable: Send + Sync {
    /// Nutrients in one serving of `food_name`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the food is not in the table
    fn nutrition_of(&self, food_name: &str) -> AppResult<NutrientProfile>;

    /// Every food the table knows, sorted by name
    fn foods(&self) -> Vec<String>;

    /// Every food as a recommendation candidate, in [`foods`](Self::foods) order
    fn candidates(&self) -> Vec<CandidateFood> {
        self.foods()
            .into_iter()
            .filter_map(|name| {
                let nutrition = self.nutrition_of(&name).ok()?;
                Some(CandidateFood::new(name, nutrition))
            })
            .collect()
    }
}

/// One food's table entry
#[derive(Debug, Clone, PartialEq)]
pub struct FoodEntry {
    /// Nutrients per serving
    pub nutrition: NutrientProfile,
    /// Serving size in grams
    pub serving_grams: f64,
}

/// In-memory [`NutrientTable`] loaded from JSON files
#[derive(Debug, Clone, Default)]
pub struct JsonNutrientTable {
    entries: BTreeMap<String, FoodEntry>,
}

impl JsonNutrientTable {
    /// Load every `*.json` file in `dir`. Files that fail to parse are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read
    pub async fn load(dir: &Path) -> AppResult<Self> {
        let mut entries = BTreeMap::new();
        let mut listing = tokio::fs::read_dir(dir).await.map_err(|e| {
            AppError::config(format!(
                "Cannot read nutrition data directory {}: {e}",
                dir.display()
            ))
        })?;

        while let Some(dir_entry) = listing.next_entry().await? {
            let path = dir_entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(food_name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match tokio::fs::read_to_string(&path)
                .await
                .map_err(AppError::from)
                .and_then(|raw| parse_food_file(&raw))
            {
                Ok(entry) => {
                    entries.insert(food_name.to_owned(), entry);
                }
                Err(e) => warn!(file = %path.display(), error = %e, "Skipping nutrition file"),
            }
        }

        info!(foods = entries.len(), dir = %dir.display(), "Nutrition data loaded");
        Ok(Self { entries })
    }

    /// Build a table from explicit entries
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, NutrientProfile)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, nutrition)| {
                    (
                        name.into(),
                        FoodEntry {
                            nutrition,
                            serving_grams: DEFAULT_SERVING_GRAMS,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Full entry for `food_name`, matching exactly first and then case-insensitively
    #[must_use]
    pub fn entry(&self, food_name: &str) -> Option<&FoodEntry> {
        self.entries.get(food_name).or_else(|| {
            let wanted = food_name.trim().to_lowercase();
            self.entries
                .iter()
                .find(|(name, _)| name.trim().to_lowercase() == wanted)
                .map(|(_, entry)| entry)
        })
    }

    /// Number of foods loaded
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no food is loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl NutrientTable for JsonNutrientTable {
    fn nutrition_of(&self, food_name: &str) -> AppResult<NutrientProfile> {
        self.entry(food_name)
            .map(|entry| entry.nutrition.clone())
            .ok_or_else(|| AppError::not_found(format!("Nutrition data for '{food_name}'")))
    }

    fn foods(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// Parse one data file body
///
/// # Errors
///
/// Returns an error if the JSON is malformed or lacks `data.food_info.nutrition`
pub fn parse_food_file(raw: &str) -> AppResult<FoodEntry> {
    let document: Value = serde_json::from_str(raw)?;
    let nutrition = document
        .pointer("/data/food_info/nutrition")
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::invalid_input("missing data.food_info.nutrition"))?;

    let mut profile = NutrientProfile::new();
    for (key, value) in nutrition {
        if let Some(spec) = by_source_key(key) {
            profile.set(spec.nutrient, numeric(value).unwrap_or(0.0));
        }
    }

    let serving_grams = nutrition
        .get(SERVING_SIZE_KEY)
        .and_then(numeric)
        .unwrap_or(DEFAULT_SERVING_GRAMS);

    Ok(FoodEntry {
        nutrition: profile,
        serving_grams,
    })
}

fn numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutrilens_core::models::Nutrient;

    #[test]
    fn test_parse_food_file_maps_source_keys() {
        let raw = r#"{"data": {"food_info": {"name": "꿀떡", "nutrition": {
            "e": 220, "pro": "3.5", "na": "-", "total_tfa": 1.2, "g": 150, "unknown": 9
        }}}}"#;

        let entry = parse_food_file(raw).unwrap();

        assert!((entry.nutrition.get(Nutrient::Calories) - 220.0).abs() < f64::EPSILON);
        assert!((entry.nutrition.get(Nutrient::Protein) - 3.5).abs() < f64::EPSILON);
        assert_eq!(entry.nutrition.defined(Nutrient::Sodium), Some(0.0));
        assert!((entry.nutrition.get(Nutrient::Fiber) - 1.2).abs() < f64::EPSILON);
        assert!((entry.serving_grams - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_food_file_rejects_wrong_layout() {
        assert!(parse_food_file(r#"{"data": {}}"#).is_err());
        assert!(parse_food_file("not json").is_err());
    }

    #[test]
    fn test_lookup_is_case_insensitive_fallback() {
        let table = JsonNutrientTable::from_entries([(
            "Bibimbap",
            NutrientProfile::new().with(Nutrient::Calories, 560.0),
        )]);

        assert!(table.nutrition_of("bibimbap ").is_ok());
        let missing = table.nutrition_of("ramen").unwrap_err();
        assert_eq!(missing.code, nutrilens_core::ErrorCode::ResourceNotFound);
    }
}
