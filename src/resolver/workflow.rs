// ABOUTME: Interactive confidence-resolution workflow with request-identity stale discard
// ABOUTME: Guards classify and confirm against overlapping submissions and caches the catalog
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{filter_catalog, resolve, Decision};
use crate::classifier::{ClassifierService, ImageUpload};
use crate::config::ResolverConfig;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::upload_tracker::{attempt_for, UploadTracker};
use async_trait::async_trait;
use nutrilens_core::models::{ClassificationResult, LogMealRequest, MealRecord};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

/// Receives confirmed meals
#[async_trait]
pub trait MealLogger: Send + Sync {
    /// Record one confirmed meal
    ///
    /// # Errors
    ///
    /// Returns the store's error when the meal cannot be recorded
    async fn log_meal(&self, request: LogMealRequest) -> AppResult<MealRecord>;
}

/// Workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverStatus {
    /// Nothing selected
    Idle,
    /// Image selected, not yet classified
    Ready,
    /// Classification in flight
    Pending,
    /// Confident prediction awaiting confirmation
    Confident,
    /// Low-confidence prediction awaiting a pick
    NeedsDisambiguation,
    /// Log request in flight
    Submitting,
    /// Meal logged, returning to idle shortly
    Logged,
    /// Log request failed; retry allowed
    Failed,
}

/// What the user confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// The classifier's top prediction
    Predicted,
    /// One of the ranked alternates, by food name
    Alternate(String),
    /// A pick from the manual catalog search
    Manual(String),
}

/// Read-only view of the workflow
#[derive(Debug, Clone, Serialize)]
pub struct ResolverSnapshot {
    /// Current state
    pub status: ResolverStatus,
    /// Selected image file name
    pub image_name: Option<String>,
    /// Current classification
    pub classification: Option<ClassificationResult>,
    /// Decision derived from the classification
    pub decision: Option<Decision>,
    /// Message of the last failure
    pub last_error: Option<String>,
    /// Most recently logged meal
    pub last_logged: Option<MealRecord>,
}

#[derive(Debug)]
struct Inner {
    status: ResolverStatus,
    // Bumped by every action that makes in-flight responses obsolete
    generation: u64,
    image: Option<ImageUpload>,
    classification: Option<ClassificationResult>,
    pending_request: Option<LogMealRequest>,
    last_error: Option<String>,
    last_logged: Option<MealRecord>,
}

impl Inner {
    const fn new() -> Self {
        Self {
            status: ResolverStatus::Idle,
            generation: 0,
            image: None,
            classification: None,
            pending_request: None,
            last_error: None,
            last_logged: None,
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn return_to_idle(&mut self) {
        self.next_generation();
        self.status = ResolverStatus::Idle;
        self.image = None;
        self.classification = None;
        self.pending_request = None;
        self.last_error = None;
    }

    fn ensure_not_submitting(&self) -> AppResult<()> {
        if self.status == ResolverStatus::Submitting {
            return Err(AppError::busy("A meal is still being logged"));
        }
        Ok(())
    }
}

/// Confidence-resolution workflow for one user session
pub struct ConfidenceResolver {
    classifier: Arc<dyn ClassifierService>,
    logger: Arc<dyn MealLogger>,
    config: ResolverConfig,
    state: Arc<Mutex<Inner>>,
    catalog: OnceCell<Vec<String>>,
    uploads: Option<Arc<dyn UploadTracker>>,
}

impl ConfidenceResolver {
    /// Create a resolver in the `Idle` state
    #[must_use]
    pub fn new(
        classifier: Arc<dyn ClassifierService>,
        logger: Arc<dyn MealLogger>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            classifier,
            logger,
            config,
            state: Arc::new(Mutex::new(Inner::new())),
            catalog: OnceCell::new(),
            uploads: None,
        }
    }

    /// Record every classifier answer, superseded ones included, in `uploads`
    #[must_use]
    pub fn with_upload_tracker(mut self, uploads: Arc<dyn UploadTracker>) -> Self {
        self.uploads = Some(uploads);
        self
    }

    /// Select a new image, discarding any previous classification.
    /// Allowed in every state; in-flight classifications become stale.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty or unsupported image; state is unchanged
    pub async fn select_image(&self, image: ImageUpload) -> AppResult<()> {
        image.validate(self.config.max_image_bytes)?;

        let mut inner = self.state.lock().await;
        inner.next_generation();
        debug!(file = %image.file_name, generation = inner.generation, "Image selected");
        inner.image = Some(image);
        inner.classification = None;
        inner.pending_request = None;
        inner.last_error = None;
        inner.status = ResolverStatus::Ready;
        Ok(())
    }

    /// Classify the selected image and decide how to proceed
    ///
    /// # Errors
    ///
    /// - validation error when no image is selected (the classifier is not called)
    /// - `RESOURCE_LOCKED` while a meal is being submitted
    /// - `INVALID_STATE` once the image has been logged
    /// - the classifier's error, with the workflow back in its pre-call state
    /// - `REQUEST_SUPERSEDED` when a newer action made this response stale
    pub async fn classify(&self) -> AppResult<Decision> {
        let (image, request_id, prior_status) = {
            let mut inner = self.state.lock().await;
            inner.ensure_not_submitting()?;
            // The logged image is consumed; only a reset or a new image leaves Logged
            if inner.status == ResolverStatus::Logged {
                return Err(AppError::invalid_state(
                    "The meal was already logged; select a new image",
                ));
            }
            let Some(image) = inner.image.clone() else {
                return Err(AppError::missing_field("image"));
            };
            let prior_status = inner.status;
            inner.status = ResolverStatus::Pending;
            (image, inner.next_generation(), prior_status)
        };

        let result = self.classifier.classify(&image).await;
        self.track_attempt(&image, &result).await;

        let mut inner = self.state.lock().await;
        if inner.generation != request_id {
            debug!(request_id, current = inner.generation, "Discarding stale classification");
            return Err(AppError::superseded(
                "Classification result arrived after a newer request",
            ));
        }

        match result {
            Ok(classification) => {
                let decision = resolve(&classification);
                inner.status = if decision.is_auto_accept() {
                    ResolverStatus::Confident
                } else {
                    ResolverStatus::NeedsDisambiguation
                };
                info!(
                    food = %classification.predicted_food,
                    confidence = classification.confidence,
                    confident = classification.is_confident,
                    "Image classified"
                );
                inner.classification = Some(classification);
                inner.last_error = None;
                Ok(decision)
            }
            Err(error) => {
                warn!(error = %error, "Classification failed");
                inner.status = prior_status;
                inner.last_error = Some(error.message.clone());
                Err(error)
            }
        }
    }

    /// Confirm a candidate, emitting exactly one log request
    ///
    /// # Errors
    ///
    /// - `RESOURCE_LOCKED` while another submission is in flight
    /// - `INVALID_STATE` when confirming a classifier pick with no classification
    /// - validation error for a blank manual pick or an unranked alternate
    /// - the logger's error, leaving the workflow in `Failed`
    pub async fn confirm(&self, candidate: Candidate) -> AppResult<MealRecord> {
        let (request, request_id) = {
            let mut inner = self.state.lock().await;
            inner.ensure_not_submitting()?;
            let request = Self::build_request(&inner, &candidate)?;
            request.validate()?;

            inner.status = ResolverStatus::Submitting;
            inner.pending_request = Some(request.clone());
            (request, inner.next_generation())
        };

        self.submit(request, request_id).await
    }

    /// Resubmit the request that failed
    ///
    /// # Errors
    ///
    /// Returns `INVALID_STATE` unless the workflow is in `Failed`, otherwise the
    /// logger's error
    pub async fn retry(&self) -> AppResult<MealRecord> {
        let (request, request_id) = {
            let mut inner = self.state.lock().await;
            inner.ensure_not_submitting()?;
            let request = match (&inner.status, &inner.pending_request) {
                (ResolverStatus::Failed, Some(request)) => request.clone(),
                _ => return Err(AppError::invalid_state("There is no failed submission to retry")),
            };
            inner.status = ResolverStatus::Submitting;
            (request, inner.next_generation())
        };

        self.submit(request, request_id).await
    }

    /// Return to `Idle`, discarding image, classification, and pending requests
    pub async fn reset(&self) {
        self.state.lock().await.return_to_idle();
    }

    /// Search the supported-food catalog. The catalog is fetched on first use and cached
    /// for the lifetime of this resolver; a failed fetch is retried on the next search.
    ///
    /// # Errors
    ///
    /// Returns `CatalogUnavailable` if the catalog cannot be fetched
    pub async fn manual_search(&self, query: &str) -> AppResult<Vec<String>> {
        let catalog = self
            .catalog
            .get_or_try_init(|| async {
                let foods = self.classifier.supported_foods().await.map_err(|e| {
                    if e.code == ErrorCode::ResourceUnavailable {
                        e
                    } else {
                        AppError::catalog_unavailable(e.message)
                    }
                })?;
                info!(foods = foods.len(), "Supported-food catalog loaded");
                Ok::<_, AppError>(foods)
            })
            .await?;
        Ok(filter_catalog(catalog, query))
    }

    /// Current workflow state
    pub async fn snapshot(&self) -> ResolverSnapshot {
        let inner = self.state.lock().await;
        ResolverSnapshot {
            status: inner.status,
            image_name: inner.image.as_ref().map(|image| image.file_name.clone()),
            decision: inner.classification.as_ref().map(resolve),
            classification: inner.classification.clone(),
            last_error: inner.last_error.clone(),
            last_logged: inner.last_logged.clone(),
        }
    }

    /// Current workflow status
    pub async fn status(&self) -> ResolverStatus {
        self.state.lock().await.status
    }

    async fn track_attempt(&self, image: &ImageUpload, result: &AppResult<ClassificationResult>) {
        let Some(uploads) = &self.uploads else {
            return;
        };
        let attempt = attempt_for(image, result.as_ref().map_err(|e| e.message.as_str()));
        // Recording failures never fail the classification
        if let Err(error) = uploads.record(&attempt).await {
            warn!(error = %error, "Failed to record upload attempt");
        }
    }

    fn build_request(inner: &Inner, candidate: &Candidate) -> AppResult<LogMealRequest> {
        if let Candidate::Manual(food_name) = candidate {
            if food_name.trim().is_empty() {
                return Err(AppError::missing_field("food_name"));
            }
            return Ok(LogMealRequest::manual(food_name.trim()));
        }

        let classification = match (inner.status, &inner.classification) {
            (
                ResolverStatus::Confident
                | ResolverStatus::NeedsDisambiguation
                | ResolverStatus::Failed,
                Some(classification),
            ) => classification,
            _ => {
                return Err(AppError::invalid_state(
                    "There is no classification to confirm",
                ))
            }
        };

        match candidate {
            Candidate::Alternate(food_name) => {
                let confidence = classification.confidence_for(food_name).ok_or_else(|| {
                    AppError::invalid_input(format!(
                        "'{food_name}' is not among the ranked predictions"
                    ))
                })?;
                Ok(LogMealRequest::classified(food_name.clone(), confidence))
            }
            _ => Ok(LogMealRequest::classified(
                classification.predicted_food.clone(),
                classification.confidence,
            )),
        }
    }

    async fn submit(&self, request: LogMealRequest, request_id: u64) -> AppResult<MealRecord> {
        let result = self.logger.log_meal(request).await;

        let mut inner = self.state.lock().await;
        if inner.generation != request_id {
            // A new image was selected meanwhile; its state takes precedence
            return result;
        }

        match result {
            Ok(record) => {
                inner.status = ResolverStatus::Logged;
                inner.pending_request = None;
                inner.last_error = None;
                inner.last_logged = Some(record.clone());
                self.schedule_reset(&mut inner, request_id);
                Ok(record)
            }
            Err(error) => {
                warn!(error = %error, "Meal submission failed");
                inner.status = ResolverStatus::Failed;
                inner.last_error = Some(error.message.clone());
                Err(error)
            }
        }
    }

    fn schedule_reset(&self, inner: &mut Inner, request_id: u64) {
        let delay = self.config.reset_delay;
        if delay == Duration::ZERO {
            inner.return_to_idle();
            return;
        }

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut inner = state.lock().await;
            if inner.generation == request_id && inner.status == ResolverStatus::Logged {
                inner.return_to_idle();
            }
        });
    }
}
