// ABOUTME: Body profile attributes used to derive personalized daily targets
// ABOUTME: Gender, activity level, and weight goal enums with lenient parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Biological sex used by the BMR equations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
}

impl Gender {
    /// Stable identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    /// Parse `M`/`F` or `male`/`female`, case-insensitive
    ///
    /// # Errors
    ///
    /// Returns a validation error for any other value
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" => Ok(Self::Male),
            "f" | "female" => Ok(Self::Female),
            other => Err(AppError::invalid_input(format!(
                "gender must be M or F, got '{other}'"
            ))),
        }
    }
}

/// Daily physical activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Low,
    /// Exercise 3-5 days a week
    Moderate,
    /// Hard exercise 6-7 days a week
    High,
}

impl ActivityLevel {
    /// Stable identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }

    /// Parse `low`, `moderate`, or `high`
    ///
    /// # Errors
    ///
    /// Returns a validation error for any other value
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "moderate" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            other => Err(AppError::invalid_input(format!(
                "activity level must be low, moderate, or high, got '{other}'"
            ))),
        }
    }
}

/// Body weight goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightGoal {
    /// Calorie deficit
    Lose,
    /// Energy balance
    Maintain,
    /// Calorie surplus
    Gain,
}

impl WeightGoal {
    /// Stable identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lose => "lose",
            Self::Maintain => "maintain",
            Self::Gain => "gain",
        }
    }

    /// Parse `lose`, `maintain`, or `gain`
    ///
    /// # Errors
    ///
    /// Returns a validation error for any other value
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "lose" => Ok(Self::Lose),
            "maintain" => Ok(Self::Maintain),
            "gain" => Ok(Self::Gain),
            other => Err(AppError::invalid_input(format!(
                "goal must be lose, maintain, or gain, got '{other}'"
            ))),
        }
    }
}

/// Body profile of the single tracked user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Age in years
    pub age: u32,
    /// Height in centimetres
    pub height_cm: f64,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Sex used by the BMR equations
    pub gender: Gender,
    /// Activity level
    pub activity_level: ActivityLevel,
    /// Weight goal
    pub goal: WeightGoal,
    /// Free-form dietary restrictions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dietary_restrictions: Vec<String>,
}

impl UserProfile {
    /// Check that body measurements are physiologically plausible
    ///
    /// # Errors
    ///
    /// Returns a range error naming the first implausible field
    pub fn validate(&self) -> AppResult<()> {
        if !(1..=120).contains(&self.age) {
            return Err(AppError::out_of_range(format!(
                "age must be between 1 and 120, got {}",
                self.age
            )));
        }
        if !(50.0..=250.0).contains(&self.height_cm) {
            return Err(AppError::out_of_range(format!(
                "height must be between 50 and 250 cm, got {}",
                self.height_cm
            )));
        }
        if !(20.0..=300.0).contains(&self.weight_kg) {
            return Err(AppError::out_of_range(format!(
                "weight must be between 20 and 300 kg, got {}",
                self.weight_kg
            )));
        }
        Ok(())
    }
}
