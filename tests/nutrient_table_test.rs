// ABOUTME: Integration tests for loading the JSON nutrient table from disk
// ABOUTME: Uses temporary directories to exercise file discovery and malformed-file handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use nutrilens::errors::ErrorCode;
use nutrilens::nutrient_table::{JsonNutrientTable, NutrientTable};
use nutrilens_core::models::Nutrient;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, body: &str) {
    fs::write(dir.path().join(name), body).unwrap();
}

fn food_file(name: &str, kcal: &str, protein: &str) -> String {
    format!(
        r#"{{"data": {{"food_info": {{"name": "{name}", "nutrition": {{"e": {kcal}, "pro": {protein}, "na": "850", "g": 400}}}}}}}}"#
    )
}

#[tokio::test]
async fn test_load_directory() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    write(&dir, "비빔밥.json", &food_file("비빔밥", "560", "\"18.5\""));
    write(&dir, "김치찌개.json", &food_file("김치찌개", "250", "15"));
    write(&dir, "broken.json", "{ not json");
    write(&dir, "readme.txt", "ignored");

    let table = JsonNutrientTable::load(dir.path()).await.unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.foods(), vec!["김치찌개", "비빔밥"]);

    let bibimbap = table.nutrition_of("비빔밥").unwrap();
    assert!((bibimbap.get(Nutrient::Calories) - 560.0).abs() < f64::EPSILON);
    assert!((bibimbap.get(Nutrient::Protein) - 18.5).abs() < f64::EPSILON);
    assert!((bibimbap.get(Nutrient::Sodium) - 850.0).abs() < f64::EPSILON);
    assert!((table.entry("비빔밥").unwrap().serving_grams - 400.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_candidates_follow_food_order() {
    let dir = TempDir::new().unwrap();
    write(&dir, "b.json", &food_file("b", "1", "1"));
    write(&dir, "a.json", &food_file("a", "2", "2"));

    let table = JsonNutrientTable::load(dir.path()).await.unwrap();
    let names: Vec<String> = table.candidates().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[tokio::test]
async fn test_unknown_food_is_not_found() {
    let dir = TempDir::new().unwrap();
    let table = JsonNutrientTable::load(dir.path()).await.unwrap();

    assert!(table.is_empty());
    let err = table.nutrition_of("라면").unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_missing_directory_is_config_error() {
    let dir = TempDir::new().unwrap();
    let err = JsonNutrientTable::load(&dir.path().join("absent"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigError);
}
