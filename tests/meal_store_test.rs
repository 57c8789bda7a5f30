// ABOUTME: Integration tests for the SQLite meal store
// ABOUTME: Validates history ordering, deletion, day resets, purging, and nutrient snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{at, create_test_database, sample_nutrient_table};
use nutrilens::errors::ErrorCode;
use nutrilens::meal_store::{local_day, MealStore, SqliteMealStore};
use nutrilens::nutrient_table::{JsonNutrientTable, NutrientTable};
use nutrilens_core::models::{LogMealRequest, Nutrient, NutrientProfile};
use std::sync::Arc;

async fn store() -> SqliteMealStore {
    let database = create_test_database().await.unwrap();
    let table: Arc<dyn NutrientTable> = sample_nutrient_table();
    SqliteMealStore::new(&database, table)
}

#[tokio::test]
async fn test_append_snapshots_nutrients() {
    let store = store().await;
    let meal = store
        .append_at(&LogMealRequest::classified("김치찌개", 92.0), at(2025, 3, 10, 12))
        .await
        .unwrap();

    assert_eq!(meal.food_name, "김치찌개");
    assert_eq!(meal.confidence_score, Some(92.0));
    assert_eq!(meal.day, local_day(at(2025, 3, 10, 12)));
    assert!((meal.nutrition.get(Nutrient::Sodium) - 1500.0).abs() < f64::EPSILON);

    let stored = store.history(None, 10).await.unwrap();
    assert_eq!(stored, vec![meal]);
}

#[tokio::test]
async fn test_append_rejects_bad_requests() {
    let store = store().await;

    let blank = store.append(&LogMealRequest::manual("  ")).await.unwrap_err();
    assert_eq!(blank.code, ErrorCode::MissingRequiredField);

    let out_of_range = store
        .append(&LogMealRequest::classified("비빔밥", 140.0))
        .await
        .unwrap_err();
    assert_eq!(out_of_range.code, ErrorCode::ValueOutOfRange);

    let unknown = store.append(&LogMealRequest::manual("라면")).await.unwrap_err();
    assert_eq!(unknown.code, ErrorCode::ResourceNotFound);

    assert!(store.history(None, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_history_is_most_recent_first_and_limited() {
    let store = store().await;
    for (hour, food) in [(8, "현미밥"), (12, "비빔밥"), (18, "된장찌개")] {
        store
            .append_at(&LogMealRequest::manual(food), at(2025, 3, 10, hour))
            .await
            .unwrap();
    }

    let names: Vec<String> = store
        .history(None, 2)
        .await
        .unwrap()
        .into_iter()
        .map(|meal| meal.food_name)
        .collect();
    assert_eq!(names, vec!["된장찌개", "비빔밥"]);
    assert!(store.history(None, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_history_filters_by_day() {
    let store = store().await;
    store
        .append_at(&LogMealRequest::manual("현미밥"), at(2025, 3, 9, 12))
        .await
        .unwrap();
    store
        .append_at(&LogMealRequest::manual("비빔밥"), at(2025, 3, 10, 12))
        .await
        .unwrap();

    let day = local_day(at(2025, 3, 9, 12));
    let meals = store.history(Some(day), 10).await.unwrap();
    assert_eq!(meals.len(), 1);
    assert_eq!(meals[0].food_name, "현미밥");
}

#[tokio::test]
async fn test_delete_by_id() {
    let store = store().await;
    let meal = store.append(&LogMealRequest::manual("비빔밥")).await.unwrap();

    let removed = store.delete_by_id(&meal.id).await.unwrap();
    assert_eq!(removed.id, meal.id);
    assert!(store.history(None, 10).await.unwrap().is_empty());

    let again = store.delete_by_id(&meal.id).await.unwrap_err();
    assert_eq!(again.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_reset_day_counts_and_tolerates_empty_days() {
    let store = store().await;
    let ts = at(2025, 3, 10, 12);
    let day = local_day(ts);
    store.append_at(&LogMealRequest::manual("비빔밥"), ts).await.unwrap();
    store.append_at(&LogMealRequest::manual("현미밥"), ts).await.unwrap();
    store
        .append_at(&LogMealRequest::manual("된장찌개"), at(2025, 3, 11, 12))
        .await
        .unwrap();

    assert_eq!(store.reset_day(Some(day)).await.unwrap(), 2);
    assert_eq!(store.reset_day(Some(day)).await.unwrap(), 0);
    assert_eq!(store.history(None, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_purge_before_keeps_recent_days() {
    let store = store().await;
    store
        .append_at(&LogMealRequest::manual("비빔밥"), at(2025, 3, 1, 12))
        .await
        .unwrap();
    store
        .append_at(&LogMealRequest::manual("현미밥"), at(2025, 3, 10, 12))
        .await
        .unwrap();

    let removed = store
        .purge_before(local_day(at(2025, 3, 5, 12)))
        .await
        .unwrap();
    assert_eq!(removed, 1);
    let remaining = store.history(None, 10).await.unwrap();
    assert_eq!(remaining[0].food_name, "현미밥");
}

#[tokio::test]
async fn test_intake_summary() {
    let store = store().await;
    let day = local_day(at(2025, 3, 10, 12));

    let empty = store.intake_summary(day).await.unwrap();
    assert_eq!(empty.total_meals, 0);
    assert!(empty.last_meal_at.is_none());

    store
        .append_at(&LogMealRequest::manual("현미밥"), at(2025, 3, 10, 9))
        .await
        .unwrap();
    store
        .append_at(&LogMealRequest::manual("비빔밥"), at(2025, 3, 10, 13))
        .await
        .unwrap();

    let summary = store.intake_summary(day).await.unwrap();
    assert_eq!(summary.total_meals, 2);
    assert_eq!(summary.last_meal_at, Some(at(2025, 3, 10, 13)));
}

#[tokio::test]
async fn test_history_keeps_snapshot_after_table_changes() {
    let database = create_test_database().await.unwrap();
    let original: Arc<dyn NutrientTable> = Arc::new(JsonNutrientTable::from_entries([(
        "비빔밥",
        NutrientProfile::new().with(Nutrient::Calories, 560.0),
    )]));
    let store = SqliteMealStore::new(&database, original);
    store.append(&LogMealRequest::manual("비빔밥")).await.unwrap();

    // A second store over the same database with revised nutrient data
    let revised: Arc<dyn NutrientTable> = Arc::new(JsonNutrientTable::from_entries([(
        "비빔밥",
        NutrientProfile::new().with(Nutrient::Calories, 999.0),
    )]));
    let reader = SqliteMealStore::new(&database, revised);

    let meals = reader.history(None, 10).await.unwrap();
    assert!((meals[0].nutrition.get(Nutrient::Calories) - 560.0).abs() < f64::EPSILON);
}
