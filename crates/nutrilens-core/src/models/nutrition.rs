// ABOUTME: Nutrient identifiers and per-nutrient quantity maps
// ABOUTME: NutrientProfile sums, scales, and looks up quantities with absent-as-zero semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::nutrients::{NutrientSpec, NUTRIENT_TABLE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::AddAssign;

/// Nutrients tracked by `NutriLens`, in canonical display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    /// Energy (kcal)
    Calories,
    /// Carbohydrates (g)
    Carbohydrates,
    /// Sugars (g)
    Sugars,
    /// Protein (g)
    Protein,
    /// Total fat (g)
    Fat,
    /// Saturated fat (g)
    SaturatedFat,
    /// Cholesterol (mg)
    Cholesterol,
    /// Sodium (mg)
    Sodium,
    /// Dietary fiber (g)
    Fiber,
}

impl Nutrient {
    /// Every nutrient, in canonical order
    pub const ALL: [Self; 9] = [
        Self::Calories,
        Self::Carbohydrates,
        Self::Sugars,
        Self::Protein,
        Self::Fat,
        Self::SaturatedFat,
        Self::Cholesterol,
        Self::Sodium,
        Self::Fiber,
    ];

    /// Snake-case identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calories => "calories",
            Self::Carbohydrates => "carbohydrates",
            Self::Sugars => "sugars",
            Self::Protein => "protein",
            Self::Fat => "fat",
            Self::SaturatedFat => "saturated_fat",
            Self::Cholesterol => "cholesterol",
            Self::Sodium => "sodium",
            Self::Fiber => "fiber",
        }
    }

    /// Parse from the snake-case identifier
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|nutrient| nutrient.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Configuration table entry for this nutrient
    #[must_use]
    pub fn spec(self) -> &'static NutrientSpec {
        &NUTRIENT_TABLE[self as usize]
    }

    /// Human-readable label
    #[must_use]
    pub fn display_name(self) -> &'static str {
        self.spec().display_name
    }

    /// Measurement unit
    #[must_use]
    pub fn unit(self) -> &'static str {
        self.spec().unit
    }

    /// Format a quantity with one decimal and this nutrient's unit
    #[must_use]
    pub fn format_amount(self, amount: f64) -> String {
        format!("{amount:.1}{}", self.unit())
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping nutrient → quantity. Missing entries read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NutrientProfile(BTreeMap<Nutrient, f64>);

impl NutrientProfile {
    /// Empty profile
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantity of `nutrient`, zero when absent
    #[must_use]
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        self.0.get(&nutrient).copied().unwrap_or(0.0)
    }

    /// Quantity of `nutrient` only when the profile defines it
    #[must_use]
    pub fn defined(&self, nutrient: Nutrient) -> Option<f64> {
        self.0.get(&nutrient).copied()
    }

    /// Set the quantity of `nutrient`
    pub fn set(&mut self, nutrient: Nutrient, amount: f64) {
        self.0.insert(nutrient, amount);
    }

    /// Builder-style [`set`](Self::set)
    #[must_use]
    pub fn with(mut self, nutrient: Nutrient, amount: f64) -> Self {
        self.set(nutrient, amount);
        self
    }

    /// Whether no nutrient is defined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Defined nutrients in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Nutrient, f64)> + '_ {
        self.0.iter().map(|(nutrient, amount)| (*nutrient, *amount))
    }

    /// Element-wise sum with `other`
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        let mut sum = self.clone();
        sum += other;
        sum
    }
}

impl AddAssign<&Self> for NutrientProfile {
    fn add_assign(&mut self, other: &Self) {
        for (nutrient, amount) in other.iter() {
            *self.0.entry(nutrient).or_insert(0.0) += amount;
        }
    }
}

impl FromIterator<(Nutrient, f64)> for NutrientProfile {
    fn from_iter<I: IntoIterator<Item = (Nutrient, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
