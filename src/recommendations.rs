// ABOUTME: Recommendation service ranking catalog foods against the day's deficiencies
// ABOUTME: Draws candidates from the nutrient table and skips foods already eaten that day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppResult;
use crate::nutrient_table::NutrientTable;
use crate::tracker::IntakeTracker;
use chrono::NaiveDate;
use nutrilens_intelligence::{rank, DailyProgress, ScoredRecommendation};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Ranked foods together with the progress they were ranked against
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationReport {
    /// Progress the ranking used
    pub progress: DailyProgress,
    /// Best foods first
    pub recommendations: Vec<ScoredRecommendation>,
}

/// Food recommendations for a day
pub struct RecommendationService {
    tracker: Arc<IntakeTracker>,
    nutrients: Arc<dyn NutrientTable>,
}

impl RecommendationService {
    /// Create a service over `tracker` drawing candidates from `nutrients`
    #[must_use]
    pub fn new(tracker: Arc<IntakeTracker>, nutrients: Arc<dyn NutrientTable>) -> Self {
        Self { tracker, nutrients }
    }

    /// Up to `limit` foods for `day` (today when absent)
    ///
    /// # Errors
    ///
    /// Returns an error if the day's progress cannot be computed
    pub async fn recommend(
        &self,
        day: Option<NaiveDate>,
        limit: usize,
    ) -> AppResult<RecommendationReport> {
        let progress = self.tracker.progress(day).await?;
        let eaten: HashSet<String> = self
            .tracker
            .history(Some(progress.date), u32::MAX)
            .await?
            .into_iter()
            .map(|meal| meal.food_name.to_lowercase())
            .collect();

        let candidates: Vec<_> = self
            .nutrients
            .candidates()
            .into_iter()
            .filter(|candidate| !eaten.contains(&candidate.name.to_lowercase()))
            .collect();

        let recommendations = rank(&candidates, &progress, limit, self.tracker.config());
        info!(
            day = %progress.date,
            candidates = candidates.len(),
            returned = recommendations.len(),
            "Recommendations ranked"
        );

        Ok(RecommendationReport {
            progress,
            recommendations,
        })
    }
}
