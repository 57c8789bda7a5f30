// ABOUTME: Database operations for the single tracked user's body profile
// ABOUTME: Upsert, fetch, and clear the one-row profile table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use chrono::Utc;
use nutrilens_core::models::{ActivityLevel, Gender, UserProfile, WeightGoal};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

/// Database manager for the user profile
pub struct ProfileManager {
    pool: SqlitePool,
}

impl ProfileManager {
    /// Create a new profile manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or replace the profile
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn save(&self, profile: &UserProfile) -> AppResult<()> {
        let restrictions = serde_json::to_string(&profile.dietary_restrictions)?;
        sqlx::query(
            r"
            INSERT INTO user_profile
                (id, age, height_cm, weight_kg, gender, activity_level, goal,
                 dietary_restrictions, updated_at)
            VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT(id) DO UPDATE SET
                age = excluded.age,
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg,
                gender = excluded.gender,
                activity_level = excluded.activity_level,
                goal = excluded.goal,
                dietary_restrictions = excluded.dietary_restrictions,
                updated_at = excluded.updated_at
            ",
        )
        .bind(i64::from(profile.age))
        .bind(profile.height_cm)
        .bind(profile.weight_kg)
        .bind(profile.gender.as_str())
        .bind(profile.activity_level.as_str())
        .bind(profile.goal.as_str())
        .bind(restrictions)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save profile: {e}")))?;
        Ok(())
    }

    /// Stored profile, if any
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or a stored value is corrupt
    pub async fn get(&self) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query(
            r"
            SELECT age, height_cm, weight_kg, gender, activity_level, goal, dietary_restrictions
            FROM user_profile
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get profile: {e}")))?;

        row.map(|r| row_to_profile(&r)).transpose()
    }

    /// Remove the stored profile, returning whether one existed
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn clear(&self) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM user_profile WHERE id = 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear profile: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}

/// Convert a database row to a `UserProfile`
fn row_to_profile(row: &SqliteRow) -> AppResult<UserProfile> {
    let age: i64 = row.get("age");
    let gender: String = row.get("gender");
    let activity_level: String = row.get("activity_level");
    let goal: String = row.get("goal");
    let restrictions_json: String = row.get("dietary_restrictions");

    Ok(UserProfile {
        age: u32::try_from(age)
            .map_err(|e| AppError::internal(format!("Invalid stored age {age}: {e}")))?,
        height_cm: row.get("height_cm"),
        weight_kg: row.get("weight_kg"),
        gender: Gender::parse(&gender)?,
        activity_level: ActivityLevel::parse(&activity_level)?,
        goal: WeightGoal::parse(&goal)?,
        dietary_restrictions: serde_json::from_str(&restrictions_json)?,
    })
}
