// ABOUTME: Classifier output types for meal photo recognition
// ABOUTME: Normalizes raw predictions into a ranked, thresholded ClassificationResult
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::confidence::MAX_TOP_PREDICTIONS;
use serde::{Deserialize, Serialize};

/// One (food, confidence) pair from the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Food name as known to the nutrient table
    pub food_name: String,
    /// Confidence percentage in [0, 100]
    pub confidence: f64,
}

impl Prediction {
    /// Create a prediction
    pub fn new(food_name: impl Into<String>, confidence: f64) -> Self {
        Self {
            food_name: food_name.into(),
            confidence,
        }
    }
}

/// Result of classifying a single image. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Highest-ranked food
    pub predicted_food: String,
    /// Confidence percentage of `predicted_food`
    pub confidence: f64,
    /// Whether `confidence` reached the acceptance threshold
    pub is_confident: bool,
    /// Ranked alternates, confidence descending
    pub top_predictions: Vec<Prediction>,
}

impl ClassificationResult {
    /// Build a result, normalizing confidences and ordering.
    ///
    /// Confidences are clamped to [0, 100] and rounded to one decimal. The threshold is
    /// checked against the clamped value before rounding. Alternates are sorted
    /// descending (ties keep their incoming order) and truncated.
    #[must_use]
    pub fn new(
        predicted_food: impl Into<String>,
        confidence: f64,
        top_predictions: Vec<Prediction>,
        acceptance_threshold: f64,
    ) -> Self {
        let clamped = clamp_confidence(confidence);
        let is_confident = clamped >= acceptance_threshold;
        let mut top_predictions: Vec<Prediction> = top_predictions
            .into_iter()
            .map(|p| Prediction::new(p.food_name, normalize_confidence(p.confidence)))
            .collect();
        top_predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        top_predictions.truncate(MAX_TOP_PREDICTIONS);

        Self {
            predicted_food: predicted_food.into(),
            confidence: round_confidence(clamped),
            is_confident,
            top_predictions,
        }
    }

    /// Build a result from a ranked prediction list, taking the best as the prediction
    #[must_use]
    pub fn from_ranked(predictions: Vec<Prediction>, acceptance_threshold: f64) -> Option<Self> {
        let best = predictions
            .iter()
            .fold(None::<&Prediction>, |best, candidate| match best {
                Some(current) if current.confidence >= candidate.confidence => Some(current),
                _ => Some(candidate),
            })?
            .clone();
        Some(Self::new(
            best.food_name,
            best.confidence,
            predictions,
            acceptance_threshold,
        ))
    }

    /// Confidence the classifier assigned to `food_name`, if it was ranked
    #[must_use]
    pub fn confidence_for(&self, food_name: &str) -> Option<f64> {
        if self.predicted_food == food_name {
            return Some(self.confidence);
        }
        self.top_predictions
            .iter()
            .find(|p| p.food_name == food_name)
            .map(|p| p.confidence)
    }
}

fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

fn round_confidence(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn normalize_confidence(value: f64) -> f64 {
    round_confidence(clamp_confidence(value))
}
