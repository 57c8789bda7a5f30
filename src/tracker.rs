// ABOUTME: Intake tracker coordinating the meal store, profile, targets, and event bus
// ABOUTME: Recomputes daily progress from the store on every read and on meal events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::database::ProfileManager;
use crate::errors::{AppError, AppResult};
use crate::events::{EventBus, MealEvent};
use crate::meal_store::{today, MealStore};
use crate::resolver::MealLogger;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate};
use nutrilens_core::models::{IntakeSummary, LogMealRequest, MealRecord, NutrientProfile, UserProfile};
use nutrilens_intelligence::{compute_progress, DailyProgress, IntelligenceConfig, TargetProvider};
use std::sync::Arc;
use tokio::sync::{broadcast::error::RecvError, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Owns every write to the meal log and keeps intake views consistent with it
pub struct IntakeTracker {
    store: Arc<dyn MealStore>,
    profiles: ProfileManager,
    targets: Arc<dyn TargetProvider>,
    config: IntelligenceConfig,
    events: EventBus,
}

impl IntakeTracker {
    /// Create a tracker
    #[must_use]
    pub fn new(
        store: Arc<dyn MealStore>,
        profiles: ProfileManager,
        targets: Arc<dyn TargetProvider>,
        config: IntelligenceConfig,
        events: EventBus,
    ) -> Self {
        Self {
            store,
            profiles,
            targets,
            config,
            events,
        }
    }

    /// Event bus carrying meal events
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// Intelligence configuration used for progress and ranking
    #[must_use]
    pub const fn config(&self) -> &IntelligenceConfig {
        &self.config
    }

    /// Record a meal and announce it
    ///
    /// # Errors
    ///
    /// Returns the store's validation, lookup, or database error; nothing is announced
    pub async fn log_meal(&self, request: &LogMealRequest) -> AppResult<MealRecord> {
        let meal = self.store.append(request).await?;
        self.events.publish(MealEvent::Logged { meal: meal.clone() });
        Ok(meal)
    }

    /// Delete a meal and announce it
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no meal has this id
    pub async fn delete_meal(&self, id: &str) -> AppResult<MealRecord> {
        let meal = self.store.delete_by_id(id).await?;
        self.events.publish(MealEvent::Deleted {
            id: meal.id.clone(),
            day: meal.day,
        });
        Ok(meal)
    }

    /// Delete every meal of `day` (today when absent)
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written
    pub async fn reset_day(&self, day: Option<NaiveDate>) -> AppResult<u64> {
        let day = day.unwrap_or_else(today);
        let removed = self.store.reset_day(Some(day)).await?;
        self.events.publish(MealEvent::DayReset { day, removed });
        Ok(removed)
    }

    /// Most recent meals first
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn history(&self, day: Option<NaiveDate>, limit: u32) -> AppResult<Vec<MealRecord>> {
        self.store.history(day, limit).await
    }

    /// Meal count and latest meal time
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn summary(&self, day: Option<NaiveDate>) -> AppResult<IntakeSummary> {
        self.store.intake_summary(day.unwrap_or_else(today)).await
    }

    /// Stored profile, if any
    ///
    /// # Errors
    ///
    /// Returns a database error if the profile cannot be read
    pub async fn profile(&self) -> AppResult<Option<UserProfile>> {
        self.profiles.get().await
    }

    /// Validate and store the profile, then announce that targets changed
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-range measurements or a database error
    pub async fn save_profile(&self, profile: &UserProfile) -> AppResult<NutrientProfile> {
        profile.validate()?;
        let targets = self.targets.targets_for(profile)?;
        self.profiles.save(profile).await?;
        info!(age = profile.age, goal = profile.goal.as_str(), "Profile saved");
        self.events.publish(MealEvent::ProfileChanged);
        Ok(targets)
    }

    /// Remove the stored profile
    ///
    /// # Errors
    ///
    /// Returns a database error if the profile cannot be removed
    pub async fn clear_profile(&self) -> AppResult<bool> {
        let removed = self.profiles.clear().await?;
        if removed {
            self.events.publish(MealEvent::ProfileChanged);
        }
        Ok(removed)
    }

    /// Daily targets for the stored profile, or `None` without one
    ///
    /// # Errors
    ///
    /// Returns a database error, or a validation error if the stored profile is invalid
    pub async fn targets(&self) -> AppResult<Option<NutrientProfile>> {
        match self.profiles.get().await? {
            Some(profile) => self.targets.targets_for(&profile).map(Some),
            None => Ok(None),
        }
    }

    /// Progress for `day` (today when absent), always derived from the current store
    ///
    /// # Errors
    ///
    /// Returns an error if the store or profile cannot be read
    pub async fn progress(&self, day: Option<NaiveDate>) -> AppResult<DailyProgress> {
        let day = day.unwrap_or_else(today);
        let meals = self.store.meals_for_day(day).await?;
        let targets = self.targets().await?;
        Ok(compute_progress(day, &meals, targets.as_ref(), &self.config))
    }

    /// Delete meals older than `retention_days` whole days
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written
    pub async fn purge(&self, retention_days: u32) -> AppResult<u64> {
        let cutoff = today() - ChronoDuration::days(i64::from(retention_days));
        self.store.purge_before(cutoff).await
    }

    /// Follow the progress of `day`, recomputed whenever an event touches it
    ///
    /// # Errors
    ///
    /// Returns an error if the initial progress cannot be computed
    pub async fn watch_day(self: &Arc<Self>, day: NaiveDate) -> AppResult<ProgressWatch> {
        // Subscribe before the first read so no event slips between the two
        let mut events = self.events.subscribe();
        let initial = self.progress(Some(day)).await?;
        let (sender, receiver) = watch::channel(initial);

        let tracker = Arc::clone(self);
        let task = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) if event.day().is_some_and(|d| d != day) => continue,
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Progress watcher lagged; recomputing");
                    }
                    Err(RecvError::Closed) => break,
                }
                match tracker.progress(Some(day)).await {
                    Ok(progress) => {
                        if sender.send(progress).is_err() {
                            break;
                        }
                    }
                    Err(error) => warn!(error = %error, %day, "Failed to recompute progress"),
                }
            }
        });

        Ok(ProgressWatch { receiver, task })
    }
}

#[async_trait]
impl MealLogger for IntakeTracker {
    async fn log_meal(&self, request: LogMealRequest) -> AppResult<MealRecord> {
        Self::log_meal(self, &request).await
    }
}

/// Live view of one day's progress; stops following when dropped
pub struct ProgressWatch {
    receiver: watch::Receiver<DailyProgress>,
    task: JoinHandle<()>,
}

impl ProgressWatch {
    /// Latest computed progress
    #[must_use]
    pub fn current(&self) -> DailyProgress {
        self.receiver.borrow().clone()
    }

    /// Wait for the next recomputation
    ///
    /// # Errors
    ///
    /// Returns an internal error if the watcher stopped
    pub async fn changed(&mut self) -> AppResult<DailyProgress> {
        self.receiver
            .changed()
            .await
            .map_err(|e| AppError::internal(format!("Progress watcher stopped: {e}")))?;
        Ok(self.receiver.borrow_and_update().clone())
    }
}

impl Drop for ProgressWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}
