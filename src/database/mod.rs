// ABOUTME: SQLite database connection and schema management for NutriLens
// ABOUTME: Owns the sqlx pool and hands it to the meal, profile, and upload managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Meal record persistence
pub mod meals;
/// Single-user profile persistence
pub mod profiles;
/// Classification attempt persistence
pub mod uploads;

pub use meals::MealManager;
pub use profiles::ProfileManager;
pub use uploads::UploadManager;

use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Database handle shared by the store adapters
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to `url` and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn new(url: &DatabaseUrl) -> AppResult<Self> {
        let pool = match url {
            // Every pooled connection to :memory: would open its own empty database
            DatabaseUrl::Memory => SqlitePoolOptions::new()
                .max_connections(1)
                .connect("sqlite::memory:")
                .await
                .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?,
            DatabaseUrl::SQLite { path } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await?;
                }
                // Ensure SQLite creates the database file if it doesn't exist
                let connection_options = format!("{}?mode=rwc", url.to_connection_string());
                SqlitePool::connect(&connection_options)
                    .await
                    .map_err(|e| AppError::database(format!("Failed to open database {url}: {e}")))?
            }
        };

        let db = Self { pool };
        db.migrate().await?;
        info!(database = %url, "Database ready");
        Ok(db)
    }

    /// Create tables and indexes if missing
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        let statements = [
            r"
            CREATE TABLE IF NOT EXISTS meals (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                food_name TEXT NOT NULL,
                confidence_score REAL,
                logged_at TEXT NOT NULL,
                day TEXT NOT NULL,
                nutrition TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_meals_day ON meals(day)",
            "CREATE INDEX IF NOT EXISTS idx_meals_logged_at ON meals(logged_at)",
            r"
            CREATE TABLE IF NOT EXISTS user_profile (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                age INTEGER NOT NULL,
                height_cm REAL NOT NULL,
                weight_kg REAL NOT NULL,
                gender TEXT NOT NULL,
                activity_level TEXT NOT NULL,
                goal TEXT NOT NULL,
                dietary_restrictions TEXT NOT NULL DEFAULT '[]',
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS upload_attempts (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                file_name TEXT NOT NULL,
                size_bytes INTEGER NOT NULL,
                attempted_at TEXT NOT NULL,
                outcome TEXT NOT NULL,
                predicted_food TEXT,
                confidence REAL,
                error TEXT
            )
            ",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }
        debug!("Database migrations applied");
        Ok(())
    }

    /// Underlying connection pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Meal persistence over this database
    #[must_use]
    pub fn meals(&self) -> MealManager {
        MealManager::new(self.pool.clone())
    }

    /// Profile persistence over this database
    #[must_use]
    pub fn profiles(&self) -> ProfileManager {
        ProfileManager::new(self.pool.clone())
    }

    /// Classification attempt persistence over this database
    #[must_use]
    pub fn uploads(&self) -> UploadManager {
        UploadManager::new(self.pool.clone())
    }
}
