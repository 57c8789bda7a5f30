// ABOUTME: Command modules for nutrilens-cli and the shared service context
// ABOUTME: Builds the database, nutrient table, tracker, and upload history once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod classify;
pub mod meals;
pub mod profile;
pub mod uploads;

use nutrilens::config::AppConfig;
use nutrilens::database::Database;
use nutrilens::errors::AppResult;
use nutrilens::events::EventBus;
use nutrilens::meal_store::SqliteMealStore;
use nutrilens::nutrient_table::{JsonNutrientTable, NutrientTable};
use nutrilens::recommendations::RecommendationService;
use nutrilens::tracker::IntakeTracker;
use nutrilens::upload_tracker::SqliteUploadTracker;
use nutrilens_intelligence::{HarrisBenedictTargets, IntelligenceConfig};
use std::sync::Arc;
use tracing::info;

/// Services shared by every command
pub struct CliContext {
    pub config: AppConfig,
    pub tracker: Arc<IntakeTracker>,
    pub recommendations: RecommendationService,
    pub uploads: Arc<SqliteUploadTracker>,
    pub json: bool,
}

impl CliContext {
    pub async fn initialize(config: AppConfig, json: bool) -> AppResult<Self> {
        info!("Connecting to database: {}", config.database.url);
        let database = Database::new(&config.database.url).await?;
        database.migrate().await?;

        let nutrients: Arc<dyn NutrientTable> =
            Arc::new(JsonNutrientTable::load(&config.nutrition_data_path).await?);
        let store = Arc::new(SqliteMealStore::new(&database, Arc::clone(&nutrients)));

        let tracker = Arc::new(IntakeTracker::new(
            store,
            database.profiles(),
            Arc::new(HarrisBenedictTargets::default()),
            IntelligenceConfig::default(),
            EventBus::default(),
        ));
        let recommendations = RecommendationService::new(Arc::clone(&tracker), nutrients);
        let uploads = Arc::new(SqliteUploadTracker::new(&database));

        Ok(Self {
            config,
            tracker,
            recommendations,
            uploads,
            json,
        })
    }
}
