// ABOUTME: Confidence resolution from classifier output to a confirmed food identity
// ABOUTME: Pure decision and catalog-filter functions plus the interactive workflow state machine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Confidence Resolver
//!
//! [`resolve`] turns a [`ClassificationResult`] into a [`Decision`]: confident results
//! are accepted as-is, anything else is presented as ranked alternates. Manual catalog
//! search ([`filter_catalog`]) is available regardless of the decision.
//!
//! [`ConfidenceResolver`] wraps both in the interactive workflow:
//!
//! ```text
//! Idle -> Ready -> Pending -> {Confident, NeedsDisambiguation} -> Submitting -> {Logged -> Idle, Failed}
//! ```
//!
//! Selecting a new image is allowed from every state and returns to `Ready`.

/// Interactive workflow around classification and confirmation
pub mod workflow;

pub use workflow::{Candidate, ConfidenceResolver, MealLogger, ResolverSnapshot, ResolverStatus};

use nutrilens_core::models::{ClassificationResult, Prediction};
use serde::{Deserialize, Serialize};

/// Outcome of resolving a classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    /// The prediction is confident enough to confirm directly
    AutoAccept {
        /// Predicted food
        food_name: String,
        /// Classifier confidence percentage
        confidence: f64,
    },
    /// The user must pick an alternate or search the catalog
    Disambiguate {
        /// Ranked alternates, confidence descending
        alternates: Vec<Prediction>,
        /// Manual catalog search can be offered
        manual_search_available: bool,
    },
}

impl Decision {
    /// Whether the decision accepts the prediction without user input
    #[must_use]
    pub const fn is_auto_accept(&self) -> bool {
        matches!(self, Self::AutoAccept { .. })
    }
}

/// Decide how to proceed from a classification
#[must_use]
pub fn resolve(classification: &ClassificationResult) -> Decision {
    if classification.is_confident {
        return Decision::AutoAccept {
            food_name: classification.predicted_food.clone(),
            confidence: classification.confidence,
        };
    }

    let mut alternates = classification.top_predictions.clone();
    alternates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    Decision::Disambiguate {
        alternates,
        manual_search_available: true,
    }
}

/// Catalog entries containing `query`, case-insensitively, in catalog order.
/// A blank query returns the whole catalog.
#[must_use]
pub fn filter_catalog(catalog: &[String], query: &str) -> Vec<String> {
    if query.trim().is_empty() {
        return catalog.to_vec();
    }
    let needle = query.to_lowercase();
    catalog
        .iter()
        .filter(|food| food.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
