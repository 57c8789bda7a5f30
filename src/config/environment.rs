// ABOUTME: Top-level application configuration loaded from environment variables
// ABOUTME: Typed parsing with config errors for malformed values and range validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::database::DatabaseConfig;
use crate::errors::{AppError, AppResult};
use crate::logging::LoggingConfig;
use nutrilens_core::constants::{confidence, history, uploads};
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Classifier service endpoint and HTTP settings
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Whole-request timeout
    pub request_timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Confidence percentage at or above which a prediction is auto-accepted
    pub acceptance_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            acceptance_threshold: confidence::DEFAULT_ACCEPTANCE_THRESHOLD,
        }
    }
}

/// Confidence resolver behaviour
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Largest accepted image in bytes
    pub max_image_bytes: usize,
    /// Delay between a successful submit and the return to idle
    pub reset_delay: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: uploads::DEFAULT_MAX_IMAGE_BYTES,
            reset_delay: Duration::from_millis(2000),
        }
    }
}

/// Meal history and recommendation defaults
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Default history page size
    pub history_limit: u32,
    /// Default number of recommendations
    pub recommendation_limit: usize,
    /// Days of meals kept by a retention purge
    pub retention_days: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            history_limit: history::DEFAULT_HISTORY_LIMIT,
            recommendation_limit: history::DEFAULT_RECOMMENDATION_LIMIT,
            retention_days: history::DEFAULT_RETENTION_DAYS,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Meal store
    pub database: DatabaseConfig,
    /// Classifier service
    pub classifier: ClassifierConfig,
    /// Directory of per-food nutrient JSON files
    pub nutrition_data_path: PathBuf,
    /// Confidence resolver
    pub resolver: ResolverConfig,
    /// Intake tracker
    pub tracker: TrackerConfig,
    /// Logging
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            classifier: ClassifierConfig::default(),
            nutrition_data_path: PathBuf::from("./data/nutrition"),
            resolver: ResolverConfig::default(),
            tracker: TrackerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a config error if a variable is set but cannot be parsed, or if the
    /// resulting configuration fails validation
    pub fn from_env() -> AppResult<Self> {
        let defaults = ClassifierConfig::default();
        let classifier = ClassifierConfig {
            base_url: env_var_or("CLASSIFIER_URL", &defaults.base_url)
                .trim_end_matches('/')
                .to_owned(),
            request_timeout: Duration::from_secs(env_parse("CLASSIFIER_TIMEOUT_SECS", 30)?),
            connect_timeout: Duration::from_secs(env_parse(
                "CLASSIFIER_CONNECT_TIMEOUT_SECS",
                10,
            )?),
            acceptance_threshold: env_parse(
                "CONFIDENCE_THRESHOLD",
                confidence::DEFAULT_ACCEPTANCE_THRESHOLD,
            )?,
        };

        let resolver = ResolverConfig {
            max_image_bytes: env_parse("MAX_IMAGE_BYTES", uploads::DEFAULT_MAX_IMAGE_BYTES)?,
            reset_delay: Duration::from_millis(env_parse("RESET_DELAY_MS", 2000)?),
        };

        let tracker = TrackerConfig {
            history_limit: env_parse("HISTORY_LIMIT", history::DEFAULT_HISTORY_LIMIT)?,
            recommendation_limit: env_parse(
                "RECOMMENDATION_LIMIT",
                history::DEFAULT_RECOMMENDATION_LIMIT,
            )?,
            retention_days: env_parse("DATA_RETENTION_DAYS", history::DEFAULT_RETENTION_DAYS)?,
        };

        let config = Self {
            database: DatabaseConfig::from_env(),
            classifier,
            nutrition_data_path: PathBuf::from(env_var_or(
                "NUTRITION_DATA_PATH",
                "./data/nutrition",
            )),
            resolver,
            tracker,
            logging: LoggingConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns a config error naming the first invalid setting
    pub fn validate(&self) -> AppResult<()> {
        let threshold = self.classifier.acceptance_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(AppError::config(format!(
                "CONFIDENCE_THRESHOLD must be within 0-100, got {threshold}"
            )));
        }
        if self.classifier.base_url.is_empty() {
            return Err(AppError::config("CLASSIFIER_URL must not be empty"));
        }
        if self.tracker.history_limit == 0 {
            return Err(AppError::config("HISTORY_LIMIT must be positive"));
        }
        if self.tracker.recommendation_limit == 0 {
            return Err(AppError::config("RECOMMENDATION_LIMIT must be positive"));
        }
        if self.resolver.max_image_bytes == 0 {
            return Err(AppError::config("MAX_IMAGE_BYTES must be positive"));
        }
        Ok(())
    }

    /// Log a one-line summary of the effective configuration
    pub fn log_summary(&self) {
        info!(
            database = %self.database.url,
            classifier = %self.classifier.base_url,
            threshold = self.classifier.acceptance_threshold,
            nutrition_data = %self.nutrition_data_path.display(),
            "Configuration loaded"
        );
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset
fn env_parse<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid value for {key} ('{raw}'): {e}"))),
        Err(_) => Ok(default),
    }
}
