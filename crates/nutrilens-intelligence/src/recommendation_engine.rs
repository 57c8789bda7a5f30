// ABOUTME: Ranks candidate foods by how well they close today's deficiency gaps
// ABOUTME: Deterministic scoring with templated reasoning and benefit text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Recommendation Ranker
//!
//! A candidate earns up to `deficiency_weight` points per deficient nutrient in
//! proportion to the share of the gap one serving closes, loses up to `excess_penalty`
//! points per excess nutrient it adds to, earns allowance points when one serving is a
//! sensible share of what remains for the day, and gains a fraction of the nutrition
//! score improvement eating it would produce. Output order is stable: equal scores keep the
//! candidates' input order.

use crate::config::{IntelligenceConfig, RankerConfig};
use crate::intake_analyzer::{nutrition_score, round_one_decimal, DailyProgress};
use nutrilens_core::models::{Nutrient, NutrientProfile};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A food that may be recommended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateFood {
    /// Food name
    pub name: String,
    /// Nutrients in one serving
    pub nutrition: NutrientProfile,
}

impl CandidateFood {
    /// Create a candidate
    pub fn new(name: impl Into<String>, nutrition: NutrientProfile) -> Self {
        Self {
            name: name.into(),
            nutrition,
        }
    }
}

/// One ranked suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecommendation {
    /// Food name
    pub food_name: String,
    /// Ranking score, one decimal
    pub score: f64,
    /// One-line explanation
    pub reasoning: String,
    /// Short benefit phrases, deduplicated
    pub benefits: Vec<String>,
    /// Deficient nutrients this food helps with, in table order
    pub addresses: Vec<Nutrient>,
    /// Nutrients in one serving
    pub nutrition: NutrientProfile,
}

/// Rank `candidates` against `progress`, returning at most `limit` positive-scoring foods.
///
/// Returns an empty list when there are no candidates, no deficiencies, no targets, or a
/// zero limit.
#[must_use]
pub fn rank(
    candidates: &[CandidateFood],
    progress: &DailyProgress,
    limit: usize,
    config: &IntelligenceConfig,
) -> Vec<ScoredRecommendation> {
    if candidates.is_empty() || limit == 0 || progress.deficient_nutrients.is_empty() {
        return Vec::new();
    }
    let Some(targets) = progress.targets.as_ref() else {
        return Vec::new();
    };

    let mut scored: Vec<ScoredRecommendation> = candidates
        .iter()
        .filter_map(|candidate| {
            let score = score_candidate(candidate, progress, targets, config);
            (score > 0.0).then(|| describe(candidate, score, progress, &config.ranker))
        })
        .collect();

    // sort_by is stable, so equal scores keep candidate order
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);

    debug!(
        candidates = candidates.len(),
        returned = scored.len(),
        "Ranked recommendation candidates"
    );
    scored
}

fn score_candidate(
    candidate: &CandidateFood,
    progress: &DailyProgress,
    targets: &NutrientProfile,
    config: &IntelligenceConfig,
) -> f64 {
    let ranker = &config.ranker;
    let food = &candidate.nutrition;
    let mut score = 0.0;

    for (nutrient, gap) in &progress.deficient_nutrients {
        let amount = food.get(*nutrient);
        if amount > 0.0 && *gap > 0.0 {
            score += (amount / gap).min(1.0) * ranker.deficiency_weight;
        }
    }

    for (nutrient, excess) in &progress.excess_nutrients {
        let amount = food.get(*nutrient);
        if amount > 0.0 && *excess > 0.0 {
            score -= (amount / excess).min(1.0) * ranker.excess_penalty;
        }
    }

    score += allowance_fit(food, progress, ranker);

    if ranker.balance_improvement_weight > 0.0 {
        if let Some(current) = progress.nutrition_score {
            let projected = progress.current_totals.plus(food);
            if let Some(after) = nutrition_score(&projected, targets, config) {
                score += (after - current).max(0.0) * ranker.balance_improvement_weight;
            }
        }
    }

    round_one_decimal(score)
}

/// Mean points over nutrients with allowance left, by the share one serving uses
fn allowance_fit(food: &NutrientProfile, progress: &DailyProgress, ranker: &RankerConfig) -> f64 {
    let mut points = 0.0;
    let mut counted = 0_u32;
    for (nutrient, remaining) in &progress.remaining {
        if *remaining <= 0.0 {
            continue;
        }
        let share = food.get(*nutrient) / remaining;
        if ranker.ideal_share.contains(share) {
            points += ranker.ideal_share_points;
        } else if ranker.acceptable_share.contains(share) {
            points += ranker.acceptable_share_points;
        }
        counted += 1;
    }
    if counted == 0 {
        0.0
    } else {
        points / f64::from(counted)
    }
}

fn describe(
    candidate: &CandidateFood,
    score: f64,
    progress: &DailyProgress,
    ranker: &RankerConfig,
) -> ScoredRecommendation {
    let food = &candidate.nutrition;
    let coverage = |nutrient: Nutrient, gap: f64| {
        if gap > 0.0 {
            food.get(nutrient) / gap
        } else {
            0.0
        }
    };

    let addresses: Vec<Nutrient> = progress
        .deficient_nutrients
        .iter()
        .filter(|(nutrient, gap)| coverage(**nutrient, **gap) >= ranker.reasoning_min_coverage)
        .map(|(nutrient, _)| *nutrient)
        .collect();

    let reasoning = if addresses.is_empty() {
        "Provides balanced nutrients".to_owned()
    } else {
        let names: Vec<&str> = addresses
            .iter()
            .take(ranker.max_reasons)
            .map(|nutrient| nutrient.display_name())
            .collect();
        format!("Replenishes {}", names.join(", "))
    };

    let mut benefits: Vec<String> = Vec::new();
    let mut push_unique = |benefit: String| {
        if !benefits.contains(&benefit) {
            benefits.push(benefit);
        }
    };
    for (nutrient, gap) in &progress.deficient_nutrients {
        if coverage(*nutrient, *gap) >= ranker.benefit_min_coverage {
            push_unique(nutrient_benefit(*nutrient));
        }
    }
    if food.get(Nutrient::Protein) > ranker.high_protein_grams {
        push_unique("High-protein food".to_owned());
    }
    if food.get(Nutrient::Fiber) > ranker.high_fiber_grams {
        push_unique("Rich in dietary fiber".to_owned());
    }
    if food.get(Nutrient::Calories) < ranker.low_calorie_kcal {
        push_unique("Low-calorie food".to_owned());
    }

    ScoredRecommendation {
        food_name: candidate.name.clone(),
        score,
        reasoning,
        benefits,
        addresses,
        nutrition: candidate.nutrition.clone(),
    }
}

fn nutrient_benefit(nutrient: Nutrient) -> String {
    match nutrient {
        Nutrient::Protein => "Supports muscle maintenance".to_owned(),
        Nutrient::Fiber => "Aids digestion".to_owned(),
        Nutrient::Calories => "Restores energy".to_owned(),
        Nutrient::Carbohydrates => "Fuels brain activity".to_owned(),
        Nutrient::Fat => "Supplies essential fatty acids".to_owned(),
        other => format!("Improves {} intake", other.display_name()),
    }
}
