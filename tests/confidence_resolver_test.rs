// ABOUTME: Integration tests for the confidence resolution workflow
// ABOUTME: Covers auto-accept, disambiguation, stale responses, busy guards, and catalog caching
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{classification, test_image, MockClassifier, RecordingLogger};
use nutrilens::config::ResolverConfig;
use nutrilens::errors::{AppError, ErrorCode};
use nutrilens::resolver::{Candidate, ConfidenceResolver, Decision, MealLogger, ResolverStatus};
use nutrilens_core::models::Nutrient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

fn resolver_config(reset_delay: Duration) -> ResolverConfig {
    ResolverConfig {
        max_image_bytes: 1024 * 1024,
        reset_delay,
    }
}

fn build(
    classifier: &Arc<MockClassifier>,
    logger: &Arc<RecordingLogger>,
) -> ConfidenceResolver {
    common::init_test_logging();
    ConfidenceResolver::new(
        classifier.clone(),
        logger.clone(),
        resolver_config(Duration::ZERO),
    )
}

#[tokio::test]
async fn test_confident_prediction_logs_once_and_returns_to_idle() {
    let classifier = Arc::new(MockClassifier::new());
    classifier.push_result(Ok(classification(&[("김치찌개", 92.0), ("된장찌개", 5.0)])));
    let logger = Arc::new(RecordingLogger::new());
    let resolver = build(&classifier, &logger);

    resolver.select_image(test_image("lunch.jpg")).await.unwrap();
    let decision = resolver.classify().await.unwrap();
    assert_eq!(
        decision,
        Decision::AutoAccept {
            food_name: "김치찌개".into(),
            confidence: 92.0,
        }
    );
    assert_eq!(resolver.status().await, ResolverStatus::Confident);

    let meal = resolver.confirm(Candidate::Predicted).await.unwrap();
    assert_eq!(meal.food_name, "김치찌개");

    let recorded = logger.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].food_name, "김치찌개");
    assert_eq!(recorded[0].confidence_score, Some(92.0));

    let snapshot = resolver.snapshot().await;
    assert_eq!(snapshot.status, ResolverStatus::Idle);
    assert!(snapshot.image_name.is_none());
    assert!(snapshot.classification.is_none());
    assert_eq!(snapshot.last_logged.unwrap().food_name, "김치찌개");
}

#[tokio::test]
async fn test_threshold_is_inclusive() {
    let classifier = Arc::new(MockClassifier::new());
    classifier.push_result(Ok(classification(&[("비빔밥", 70.0)])));
    let logger = Arc::new(RecordingLogger::new());
    let resolver = build(&classifier, &logger);

    resolver.select_image(test_image("dinner.png")).await.unwrap();
    assert!(resolver.classify().await.unwrap().is_auto_accept());
}

#[tokio::test]
async fn test_low_confidence_offers_alternates_and_logs_picked_confidence() {
    let classifier = Arc::new(MockClassifier::new());
    classifier.push_result(Ok(classification(&[
        ("김치찌개", 30.0),
        ("된장찌개", 45.0),
        ("순두부찌개", 10.0),
    ])));
    let logger = Arc::new(RecordingLogger::new());
    let resolver = build(&classifier, &logger);

    resolver.select_image(test_image("stew.jpg")).await.unwrap();
    let decision = resolver.classify().await.unwrap();
    let Decision::Disambiguate {
        alternates,
        manual_search_available,
    } = decision
    else {
        panic!("expected disambiguation");
    };
    let names: Vec<&str> = alternates.iter().map(|p| p.food_name.as_str()).collect();
    assert_eq!(names, vec!["된장찌개", "김치찌개", "순두부찌개"]);
    assert!(manual_search_available);
    assert_eq!(resolver.status().await, ResolverStatus::NeedsDisambiguation);

    resolver
        .confirm(Candidate::Alternate("김치찌개".into()))
        .await
        .unwrap();

    let recorded = logger.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].food_name, "김치찌개");
    assert_eq!(recorded[0].confidence_score, Some(30.0));
}

#[tokio::test]
async fn test_unranked_alternate_is_rejected() {
    let classifier = Arc::new(MockClassifier::new());
    classifier.push_result(Ok(classification(&[("된장찌개", 45.0)])));
    let logger = Arc::new(RecordingLogger::new());
    let resolver = build(&classifier, &logger);

    resolver.select_image(test_image("stew.jpg")).await.unwrap();
    resolver.classify().await.unwrap();

    let err = resolver
        .confirm(Candidate::Alternate("라면".into()))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert!(logger.recorded().is_empty());
    assert_eq!(resolver.status().await, ResolverStatus::NeedsDisambiguation);
}

#[tokio::test]
async fn test_manual_pick_logs_full_confidence() {
    let classifier = Arc::new(MockClassifier::new());
    classifier.push_result(Ok(classification(&[("된장찌개", 20.0)])));
    let logger = Arc::new(RecordingLogger::new());
    let resolver = build(&classifier, &logger);

    resolver.select_image(test_image("stew.jpg")).await.unwrap();
    resolver.classify().await.unwrap();

    let blank = resolver
        .confirm(Candidate::Manual("   ".into()))
        .await
        .unwrap_err();
    assert_eq!(blank.code, ErrorCode::MissingRequiredField);

    resolver
        .confirm(Candidate::Manual("현미밥".into()))
        .await
        .unwrap();
    let recorded = logger.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].confidence_score, Some(100.0));
}

#[tokio::test]
async fn test_classify_without_image_never_calls_classifier() {
    let classifier = Arc::new(MockClassifier::new());
    let logger = Arc::new(RecordingLogger::new());
    let resolver = build(&classifier, &logger);

    let err = resolver.classify().await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(classifier.calls(), 0);
    assert_eq!(resolver.status().await, ResolverStatus::Idle);
}

#[tokio::test]
async fn test_rejected_image_leaves_state_unchanged() {
    let classifier = Arc::new(MockClassifier::new());
    let logger = Arc::new(RecordingLogger::new());
    let resolver = build(&classifier, &logger);

    let err = resolver
        .select_image(test_image("notes.txt"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert_eq!(resolver.status().await, ResolverStatus::Idle);
}

#[tokio::test]
async fn test_classifier_failure_keeps_prior_state() {
    let classifier = Arc::new(MockClassifier::new());
    classifier.push_result(Err(AppError::classification("model not loaded")));
    classifier.push_result(Ok(classification(&[("비빔밥", 88.0)])));
    let logger = Arc::new(RecordingLogger::new());
    let resolver = build(&classifier, &logger);

    resolver.select_image(test_image("lunch.jpg")).await.unwrap();
    let err = resolver.classify().await.unwrap_err();
    assert_eq!(err.message, "model not loaded");

    let snapshot = resolver.snapshot().await;
    assert_eq!(snapshot.status, ResolverStatus::Ready);
    assert_eq!(snapshot.image_name.as_deref(), Some("lunch.jpg"));
    assert_eq!(snapshot.last_error.as_deref(), Some("model not loaded"));
    assert!(logger.recorded().is_empty());

    // Same image can be classified again
    assert!(resolver.classify().await.unwrap().is_auto_accept());
}

#[tokio::test]
async fn test_stale_classification_is_discarded() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let classifier = Arc::new(MockClassifier::gated(started.clone(), release.clone()));
    classifier.push_result(Ok(classification(&[("김치찌개", 95.0)])));
    let logger = Arc::new(RecordingLogger::new());
    let resolver = Arc::new(build(&classifier, &logger));

    resolver.select_image(test_image("first.jpg")).await.unwrap();
    let in_flight = {
        let resolver = resolver.clone();
        tokio::spawn(async move { resolver.classify().await })
    };
    started.notified().await;

    resolver.select_image(test_image("second.jpg")).await.unwrap();
    release.notify_one();

    let err = in_flight.await.unwrap().unwrap_err();
    assert_eq!(err.code, ErrorCode::RequestSuperseded);

    let snapshot = resolver.snapshot().await;
    assert_eq!(snapshot.status, ResolverStatus::Ready);
    assert_eq!(snapshot.image_name.as_deref(), Some("second.jpg"));
    assert!(snapshot.classification.is_none());
}

#[tokio::test]
async fn test_second_submission_rejected_while_submitting() {
    let classifier = Arc::new(MockClassifier::new());
    classifier.push_result(Ok(classification(&[("김치찌개", 92.0)])));
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let logger = Arc::new(RecordingLogger::gated(started.clone(), release.clone()));
    let resolver = Arc::new(build(&classifier, &logger));

    resolver.select_image(test_image("lunch.jpg")).await.unwrap();
    resolver.classify().await.unwrap();

    let submitting = {
        let resolver = resolver.clone();
        tokio::spawn(async move { resolver.confirm(Candidate::Predicted).await })
    };
    started.notified().await;
    assert_eq!(resolver.status().await, ResolverStatus::Submitting);

    let busy = resolver.confirm(Candidate::Predicted).await.unwrap_err();
    assert_eq!(busy.code, ErrorCode::ResourceLocked);
    let busy = resolver.classify().await.unwrap_err();
    assert_eq!(busy.code, ErrorCode::ResourceLocked);

    release.notify_one();
    submitting.await.unwrap().unwrap();
    assert_eq!(logger.recorded().len(), 1);
}

#[tokio::test]
async fn test_failed_submission_can_be_retried() {
    let classifier = Arc::new(MockClassifier::new());
    classifier.push_result(Ok(classification(&[("된장찌개", 81.5)])));
    let logger = Arc::new(RecordingLogger::failing(1));
    let resolver = build(&classifier, &logger);

    resolver.select_image(test_image("lunch.jpg")).await.unwrap();
    resolver.classify().await.unwrap();

    let err = resolver.confirm(Candidate::Predicted).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DatabaseError);
    let snapshot = resolver.snapshot().await;
    assert_eq!(snapshot.status, ResolverStatus::Failed);
    assert!(snapshot.last_error.is_some());

    let meal = resolver.retry().await.unwrap();
    assert_eq!(meal.food_name, "된장찌개");

    let recorded = logger.recorded();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0], recorded[1]);
    assert_eq!(resolver.status().await, ResolverStatus::Idle);
}

#[tokio::test]
async fn test_retry_requires_failed_submission() {
    let classifier = Arc::new(MockClassifier::new());
    let logger = Arc::new(RecordingLogger::new());
    let resolver = build(&classifier, &logger);

    let err = resolver.retry().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);
}

#[tokio::test]
async fn test_logged_state_lingers_for_reset_delay() {
    common::init_test_logging();
    let classifier = Arc::new(MockClassifier::new());
    classifier.push_result(Ok(classification(&[("비빔밥", 90.0)])));
    let logger = Arc::new(RecordingLogger::new());
    let resolver = ConfidenceResolver::new(
        classifier.clone(),
        logger.clone(),
        resolver_config(Duration::from_millis(20)),
    );

    resolver.select_image(test_image("lunch.jpg")).await.unwrap();
    resolver.classify().await.unwrap();
    resolver.confirm(Candidate::Predicted).await.unwrap();
    assert_eq!(resolver.status().await, ResolverStatus::Logged);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(resolver.status().await, ResolverStatus::Idle);
}

#[tokio::test]
async fn test_logged_image_cannot_be_reclassified() {
    common::init_test_logging();
    let classifier = Arc::new(MockClassifier::new());
    classifier.push_result(Ok(classification(&[("비빔밥", 90.0)])));
    classifier.push_result(Err(AppError::classification("model not loaded")));
    let logger = Arc::new(RecordingLogger::new());
    let resolver = ConfidenceResolver::new(
        classifier.clone(),
        logger.clone(),
        resolver_config(Duration::from_millis(20)),
    );

    resolver.select_image(test_image("lunch.jpg")).await.unwrap();
    resolver.classify().await.unwrap();
    resolver.confirm(Candidate::Predicted).await.unwrap();
    assert_eq!(resolver.status().await, ResolverStatus::Logged);

    let err = resolver.classify().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);
    assert_eq!(classifier.calls(), 1);
    assert_eq!(resolver.status().await, ResolverStatus::Logged);

    // The scheduled reset still fires
    tokio::time::sleep(Duration::from_millis(200)).await;
    let snapshot = resolver.snapshot().await;
    assert_eq!(snapshot.status, ResolverStatus::Idle);
    assert!(snapshot.image_name.is_none());
    assert!(snapshot.classification.is_none());
    assert_eq!(logger.recorded().len(), 1);
}

#[tokio::test]
async fn test_confirmed_meal_lands_in_tracker() {
    let fixture = common::create_tracker().await.unwrap();
    let classifier = Arc::new(MockClassifier::new());
    classifier.push_result(Ok(classification(&[("된장찌개", 87.0)])));
    let logger: Arc<dyn MealLogger> = fixture.tracker.clone();
    let resolver = ConfidenceResolver::new(
        classifier.clone(),
        logger,
        resolver_config(Duration::ZERO),
    );

    resolver.select_image(test_image("dinner.jpg")).await.unwrap();
    resolver.classify().await.unwrap();
    let meal = resolver.confirm(Candidate::Predicted).await.unwrap();

    let history = fixture.tracker.history(None, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, meal.id);
    assert_eq!(history[0].confidence_score, Some(87.0));
    assert!(history[0].nutrition.get(Nutrient::Sodium) > 0.0);
}

#[tokio::test]
async fn test_reset_discards_everything() {
    let classifier = Arc::new(MockClassifier::new());
    classifier.push_result(Ok(classification(&[("비빔밥", 90.0)])));
    let logger = Arc::new(RecordingLogger::new());
    let resolver = build(&classifier, &logger);

    resolver.select_image(test_image("lunch.jpg")).await.unwrap();
    resolver.classify().await.unwrap();
    resolver.reset().await;

    let snapshot = resolver.snapshot().await;
    assert_eq!(snapshot.status, ResolverStatus::Idle);
    assert!(snapshot.classification.is_none());
    let err = resolver.confirm(Candidate::Predicted).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);
}

#[tokio::test]
async fn test_catalog_is_fetched_once_and_filtered() {
    let classifier = Arc::new(MockClassifier::new());
    classifier.push_catalog(Ok(vec![
        "김치찌개".into(),
        "비빔밥".into(),
        "된장찌개".into(),
        "Bulgogi".into(),
    ]));
    let logger = Arc::new(RecordingLogger::new());
    let resolver = build(&classifier, &logger);

    assert_eq!(resolver.manual_search("  ").await.unwrap().len(), 4);
    assert_eq!(
        resolver.manual_search("찌개").await.unwrap(),
        vec!["김치찌개", "된장찌개"]
    );
    assert_eq!(resolver.manual_search("bulgo").await.unwrap(), vec!["Bulgogi"]);
    assert_eq!(
        classifier
            .catalog_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        1
    );
}

#[tokio::test]
async fn test_catalog_failure_is_retried_on_next_search() {
    let classifier = Arc::new(MockClassifier::new());
    classifier.push_catalog(Err(AppError::classification("connection refused")));
    classifier.push_catalog(Ok(vec!["비빔밥".into()]));
    let logger = Arc::new(RecordingLogger::new());
    let resolver = build(&classifier, &logger);

    let err = resolver.manual_search("").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceUnavailable);

    assert_eq!(resolver.manual_search("").await.unwrap(), vec!["비빔밥"]);
    assert_eq!(
        classifier
            .catalog_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        2
    );
}
