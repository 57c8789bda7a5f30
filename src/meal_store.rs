// ABOUTME: Meal store contract and its SQLite implementation
// ABOUTME: Captures the nutrient snapshot at log time so historical totals never change
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::database::{Database, MealManager};
use crate::errors::{AppError, AppResult};
use crate::nutrient_table::NutrientTable;
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};
use nutrilens_core::models::{IntakeSummary, LogMealRequest, MealRecord};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Calendar day (local time) a timestamp counts towards
#[must_use]
pub fn local_day(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.with_timezone(&Local).date_naive()
}

/// Today's calendar day in local time
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Durable list of logged meals
#[async_trait]
pub trait MealStore: Send + Sync {
    /// Record a meal now, snapshotting its nutrients
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name or bad confidence, `NotFound` for a
    /// food missing from the nutrient table, or a database error
    async fn append(&self, request: &LogMealRequest) -> AppResult<MealRecord>;

    /// Most recent meals first, optionally for one day only
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    async fn history(&self, day: Option<NaiveDate>, limit: u32) -> AppResult<Vec<MealRecord>>;

    /// Delete one meal, returning the removed record
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no meal has this id
    async fn delete_by_id(&self, id: &str) -> AppResult<MealRecord>;

    /// Delete every meal of `day` (today when absent), returning the count removed.
    /// Nothing to delete is a success with a count of zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written
    async fn reset_day(&self, day: Option<NaiveDate>) -> AppResult<u64>;

    /// Every meal of `day`, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    async fn meals_for_day(&self, day: NaiveDate) -> AppResult<Vec<MealRecord>>;

    /// Meal count and latest meal time for `day`
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    async fn intake_summary(&self, day: NaiveDate) -> AppResult<IntakeSummary>;

    /// Delete meals of days before `day`, returning the count removed
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written
    async fn purge_before(&self, day: NaiveDate) -> AppResult<u64>;
}

/// [`MealStore`] persisted in `SQLite`
pub struct SqliteMealStore {
    meals: MealManager,
    nutrients: Arc<dyn NutrientTable>,
}

impl SqliteMealStore {
    /// Create a store over `database`, resolving nutrients through `nutrients`
    #[must_use]
    pub fn new(database: &Database, nutrients: Arc<dyn NutrientTable>) -> Self {
        Self {
            meals: database.meals(),
            nutrients,
        }
    }

    /// Record a meal with an explicit timestamp
    ///
    /// # Errors
    ///
    /// Same as [`MealStore::append`]
    #[instrument(skip(self), fields(food = %request.food_name))]
    pub async fn append_at(
        &self,
        request: &LogMealRequest,
        logged_at: DateTime<Utc>,
    ) -> AppResult<MealRecord> {
        request.validate()?;
        let food_name = request.food_name.trim().to_owned();
        let nutrition = self.nutrients.nutrition_of(&food_name)?;

        let record = MealRecord {
            id: Uuid::new_v4().to_string(),
            food_name,
            confidence_score: request.confidence_score,
            logged_at,
            day: local_day(logged_at),
            nutrition,
        };
        self.meals.insert(&record).await?;

        info!(meal_id = %record.id, day = %record.day, "Meal logged");
        Ok(record)
    }
}

#[async_trait]
impl MealStore for SqliteMealStore {
    async fn append(&self, request: &LogMealRequest) -> AppResult<MealRecord> {
        self.append_at(request, Utc::now()).await
    }

    async fn history(&self, day: Option<NaiveDate>, limit: u32) -> AppResult<Vec<MealRecord>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.meals.list_recent(day, limit).await
    }

    async fn delete_by_id(&self, id: &str) -> AppResult<MealRecord> {
        let Some(record) = self.meals.get(id).await? else {
            return Err(AppError::not_found(format!("Meal {id}")));
        };
        if !self.meals.delete(id).await? {
            return Err(AppError::not_found(format!("Meal {id}")));
        }
        info!(meal_id = %id, day = %record.day, "Meal deleted");
        Ok(record)
    }

    async fn reset_day(&self, day: Option<NaiveDate>) -> AppResult<u64> {
        let day = day.unwrap_or_else(today);
        let removed = self.meals.delete_day(day).await?;
        info!(%day, removed, "Day reset");
        Ok(removed)
    }

    async fn meals_for_day(&self, day: NaiveDate) -> AppResult<Vec<MealRecord>> {
        self.meals.list_for_day(day).await
    }

    async fn intake_summary(&self, day: NaiveDate) -> AppResult<IntakeSummary> {
        self.meals.summary(day).await
    }

    async fn purge_before(&self, day: NaiveDate) -> AppResult<u64> {
        let removed = self.meals.delete_before(day).await?;
        info!(before = %day, removed, "Old meals purged");
        Ok(removed)
    }
}
