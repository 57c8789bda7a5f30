// ABOUTME: Nutrition intelligence algorithms for NutriLens
// ABOUTME: Intake aggregation, nutrition scoring, recommendation ranking, and target calculation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # NutriLens Intelligence
//!
//! Pure functions over meal records and targets. Nothing here performs I/O or keeps
//! state between calls, so every result is reproducible from its inputs.

/// Policy configuration (bands, score weights, ranking weights, target coefficients)
pub mod config;

/// Daily intake aggregation, classification, and nutrition score
pub mod intake_analyzer;

/// Candidate food ranking against the current deficiency set
pub mod recommendation_engine;

/// Personalized daily nutrient targets
pub mod targets;

pub use config::{IntelligenceConfig, RankerConfig, ScoreWeights, ShareRange, TargetConfig};
pub use intake_analyzer::{
    compute_progress, nutrition_score, DailyProgress, NutrientPriorities, NutrientStatus,
    OverallStatus,
};
pub use recommendation_engine::{rank, CandidateFood, ScoredRecommendation};
pub use targets::{HarrisBenedictTargets, TargetProvider};
