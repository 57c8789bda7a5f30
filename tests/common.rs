// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, a sample nutrient table, and classifier/logger doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `nutrilens`

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use nutrilens::classifier::{ClassifierService, ImageUpload};
use nutrilens::config::DatabaseUrl;
use nutrilens::database::Database;
use nutrilens::errors::{AppError, AppResult};
use nutrilens::events::EventBus;
use nutrilens::meal_store::SqliteMealStore;
use nutrilens::nutrient_table::{JsonNutrientTable, NutrientTable};
use nutrilens::resolver::MealLogger;
use nutrilens::tracker::IntakeTracker;
use nutrilens_core::models::{
    ActivityLevel, ClassificationResult, Gender, LogMealRequest, MealRecord, Nutrient,
    NutrientProfile, Prediction, UserProfile, WeightGoal,
};
use nutrilens_intelligence::{HarrisBenedictTargets, IntelligenceConfig};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use tokio::sync::Notify;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Migrated in-memory database
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    let database = Database::new(&DatabaseUrl::Memory).await?;
    database.migrate().await?;
    Ok(database)
}

/// Fixed timestamp at noon UTC on the given date
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

/// A handful of foods with round nutrient values
pub fn sample_nutrient_table() -> Arc<JsonNutrientTable> {
    Arc::new(JsonNutrientTable::from_entries([
        (
            "김치찌개",
            NutrientProfile::new()
                .with(Nutrient::Calories, 250.0)
                .with(Nutrient::Protein, 15.0)
                .with(Nutrient::Sodium, 1500.0)
                .with(Nutrient::Fat, 12.0),
        ),
        (
            "된장찌개",
            NutrientProfile::new()
                .with(Nutrient::Calories, 180.0)
                .with(Nutrient::Protein, 12.0)
                .with(Nutrient::Sodium, 1200.0),
        ),
        (
            "비빔밥",
            NutrientProfile::new()
                .with(Nutrient::Calories, 560.0)
                .with(Nutrient::Carbohydrates, 85.0)
                .with(Nutrient::Protein, 18.0)
                .with(Nutrient::Fiber, 6.0),
        ),
        (
            "닭가슴살 샐러드",
            NutrientProfile::new()
                .with(Nutrient::Calories, 180.0)
                .with(Nutrient::Protein, 30.0)
                .with(Nutrient::Fiber, 4.0),
        ),
        (
            "현미밥",
            NutrientProfile::new()
                .with(Nutrient::Calories, 300.0)
                .with(Nutrient::Carbohydrates, 65.0)
                .with(Nutrient::Protein, 6.0)
                .with(Nutrient::Fiber, 3.0),
        ),
    ]))
}

/// Male, 30 years, 175 cm, 70 kg, moderately active, maintaining weight
pub fn sample_profile() -> UserProfile {
    UserProfile {
        age: 30,
        height_cm: 175.0,
        weight_kg: 70.0,
        gender: Gender::Male,
        activity_level: ActivityLevel::Moderate,
        goal: WeightGoal::Maintain,
        dietary_restrictions: Vec::new(),
    }
}

/// Everything needed to exercise the tracker against a real store
pub struct TrackerFixture {
    pub database: Database,
    pub store: Arc<SqliteMealStore>,
    pub tracker: Arc<IntakeTracker>,
    pub nutrients: Arc<JsonNutrientTable>,
}

pub async fn create_tracker() -> Result<TrackerFixture> {
    let database = create_test_database().await?;
    let nutrients = sample_nutrient_table();
    let table: Arc<dyn NutrientTable> = nutrients.clone();
    let store = Arc::new(SqliteMealStore::new(&database, table));
    let tracker = Arc::new(IntakeTracker::new(
        store.clone(),
        database.profiles(),
        Arc::new(HarrisBenedictTargets::default()),
        IntelligenceConfig::default(),
        EventBus::default(),
    ));
    Ok(TrackerFixture {
        database,
        store,
        tracker,
        nutrients,
    })
}

/// Classification with the given ranked predictions and the default 70% threshold
pub fn classification(predictions: &[(&str, f64)]) -> ClassificationResult {
    let ranked = predictions
        .iter()
        .map(|(name, confidence)| Prediction::new(*name, *confidence))
        .collect();
    ClassificationResult::from_ranked(ranked, 70.0).unwrap()
}

pub fn test_image(name: &str) -> ImageUpload {
    ImageUpload::new(name, vec![0xFF, 0xD8, 0xFF, 0xE0])
}

/// Scripted classifier: answers from a queue and counts calls
#[derive(Default)]
pub struct MockClassifier {
    responses: Mutex<VecDeque<AppResult<ClassificationResult>>>,
    catalog: Mutex<VecDeque<AppResult<Vec<String>>>>,
    pub classify_calls: AtomicUsize,
    pub catalog_calls: AtomicUsize,
    /// When set, `classify` signals `started` and waits for `release`
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier whose calls block until `release` is notified
    pub fn gated(started: Arc<Notify>, release: Arc<Notify>) -> Self {
        Self {
            gate: Some((started, release)),
            ..Self::default()
        }
    }

    pub fn push_result(&self, result: AppResult<ClassificationResult>) {
        self.responses.lock().unwrap().push_back(result);
    }

    pub fn push_catalog(&self, result: AppResult<Vec<String>>) {
        self.catalog.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassifierService for MockClassifier {
    async fn classify(&self, _image: &ImageUpload) -> AppResult<ClassificationResult> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::classification("no scripted response")));
        if let Some((started, release)) = &self.gate {
            started.notify_one();
            release.notified().await;
        }
        response
    }

    async fn supported_foods(&self) -> AppResult<Vec<String>> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        self.catalog
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::catalog_unavailable("no scripted catalog")))
    }
}

/// Logger that records requests and fails a configurable number of times
#[derive(Default)]
pub struct RecordingLogger {
    pub requests: Mutex<Vec<LogMealRequest>>,
    failures_remaining: AtomicUsize,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(times: usize) -> Self {
        Self {
            failures_remaining: AtomicUsize::new(times),
            ..Self::default()
        }
    }

    pub fn gated(started: Arc<Notify>, release: Arc<Notify>) -> Self {
        Self {
            gate: Some((started, release)),
            ..Self::default()
        }
    }

    pub fn recorded(&self) -> Vec<LogMealRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MealLogger for RecordingLogger {
    async fn log_meal(&self, request: LogMealRequest) -> AppResult<MealRecord> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some((started, release)) = &self.gate {
            started.notify_one();
            release.notified().await;
        }
        let failing = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(AppError::database("meal store offline"));
        }

        let logged_at = Utc::now();
        Ok(MealRecord {
            id: format!("meal-{}", self.requests.lock().unwrap().len()),
            food_name: request.food_name,
            confidence_score: request.confidence_score,
            logged_at,
            day: nutrilens::meal_store::local_day(logged_at),
            nutrition: NutrientProfile::new(),
        })
    }
}
