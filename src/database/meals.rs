// ABOUTME: Database operations for logged meal records
// ABOUTME: Insert, query by day, delete by id, and bulk delete by day or age
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use nutrilens_core::models::{IntakeSummary, MealRecord, NutrientProfile};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Database manager for meal records
pub struct MealManager {
    pool: SqlitePool,
}

impl MealManager {
    /// Create a new meal manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a meal record
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized or the insert fails
    pub async fn insert(&self, meal: &MealRecord) -> AppResult<()> {
        let nutrition = serde_json::to_string(&meal.nutrition)?;
        sqlx::query(
            r"
            INSERT INTO meals (id, food_name, confidence_score, logged_at, day, nutrition)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&meal.id)
        .bind(&meal.food_name)
        .bind(meal.confidence_score)
        .bind(format_timestamp(meal.logged_at))
        .bind(format_day(meal.day))
        .bind(nutrition)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert meal: {e}")))?;
        Ok(())
    }

    /// Get a meal by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, id: &str) -> AppResult<Option<MealRecord>> {
        let row = sqlx::query(
            r"
            SELECT id, food_name, confidence_score, logged_at, day, nutrition
            FROM meals
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get meal: {e}")))?;

        row.map(|r| row_to_meal(&r)).transpose()
    }

    /// Most recent meals first, optionally restricted to one day
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_recent(&self, day: Option<NaiveDate>, limit: u32) -> AppResult<Vec<MealRecord>> {
        let limit_val = i64::from(limit);
        let rows = match day {
            Some(day) => {
                sqlx::query(
                    r"
                    SELECT id, food_name, confidence_score, logged_at, day, nutrition
                    FROM meals
                    WHERE day = $1
                    ORDER BY logged_at DESC, seq DESC
                    LIMIT $2
                    ",
                )
                .bind(format_day(day))
                .bind(limit_val)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r"
                    SELECT id, food_name, confidence_score, logged_at, day, nutrition
                    FROM meals
                    ORDER BY logged_at DESC, seq DESC
                    LIMIT $1
                    ",
                )
                .bind(limit_val)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| AppError::database(format!("Failed to list meals: {e}")))?;

        rows.iter().map(row_to_meal).collect()
    }

    /// Every meal of `day`, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_for_day(&self, day: NaiveDate) -> AppResult<Vec<MealRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, food_name, confidence_score, logged_at, day, nutrition
            FROM meals
            WHERE day = $1
            ORDER BY logged_at ASC, seq ASC
            ",
        )
        .bind(format_day(day))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list meals for day: {e}")))?;

        rows.iter().map(row_to_meal).collect()
    }

    /// Delete one meal, returning whether it existed
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete meal: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every meal of `day`, returning the count removed
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete_day(&self, day: NaiveDate) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM meals WHERE day = $1")
            .bind(format_day(day))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to reset day: {e}")))?;
        Ok(result.rows_affected())
    }

    /// Delete meals of days strictly before `day`, returning the count removed
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete_before(&self, day: NaiveDate) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM meals WHERE day < $1")
            .bind(format_day(day))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to purge meals: {e}")))?;
        Ok(result.rows_affected())
    }

    /// Meal count and latest timestamp for `day`
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn summary(&self, day: NaiveDate) -> AppResult<IntakeSummary> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total, MAX(logged_at) AS last_logged FROM meals WHERE day = $1",
        )
        .bind(format_day(day))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to summarize day: {e}")))?;

        let total: i64 = row.get("total");
        let last_logged: Option<String> = row.get("last_logged");
        Ok(IntakeSummary {
            day,
            total_meals: u32::try_from(total).unwrap_or(u32::MAX),
            last_meal_at: last_logged.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

pub(super) fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    // Fixed-width UTC form so ORDER BY on the text column is chronological
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

pub(super) fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
        .with_timezone(&Utc))
}

/// Convert a database row to a `MealRecord`
fn row_to_meal(row: &SqliteRow) -> AppResult<MealRecord> {
    let logged_at_str: String = row.get("logged_at");
    let day_str: String = row.get("day");
    let nutrition_json: String = row.get("nutrition");

    let nutrition: NutrientProfile = serde_json::from_str(&nutrition_json)?;

    Ok(MealRecord {
        id: row.get("id"),
        food_name: row.get("food_name"),
        confidence_score: row.get("confidence_score"),
        logged_at: parse_timestamp(&logged_at_str)?,
        day: NaiveDate::parse_from_str(&day_str, DAY_FORMAT)
            .map_err(|e| AppError::internal(format!("Invalid day: {e}")))?,
        nutrition,
    })
}
