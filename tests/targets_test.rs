// ABOUTME: Integration tests for profile-derived daily nutrient targets
// ABOUTME: Checks activity and goal adjustments and the fixed nutrient limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::sample_profile;
use nutrilens_core::models::{ActivityLevel, Gender, Nutrient, WeightGoal};
use nutrilens_intelligence::{HarrisBenedictTargets, TargetProvider};

#[test]
fn test_every_nutrient_gets_a_target() {
    let targets = HarrisBenedictTargets::default()
        .targets_for(&sample_profile())
        .unwrap();

    for nutrient in Nutrient::ALL {
        assert!(targets.get(nutrient) > 0.0, "{nutrient} has no target");
    }
    assert!((targets.get(Nutrient::Sodium) - 2300.0).abs() < f64::EPSILON);
    assert!((targets.get(Nutrient::Cholesterol) - 300.0).abs() < f64::EPSILON);
}

#[test]
fn test_activity_raises_calories() {
    let provider = HarrisBenedictTargets::default();
    let mut profile = sample_profile();

    profile.activity_level = ActivityLevel::Low;
    let low = provider.targets_for(&profile).unwrap().get(Nutrient::Calories);
    profile.activity_level = ActivityLevel::High;
    let high = provider.targets_for(&profile).unwrap().get(Nutrient::Calories);

    assert!(high > low);
}

#[test]
fn test_goal_adjusts_calories() {
    let provider = HarrisBenedictTargets::default();
    let mut profile = sample_profile();

    let maintain = provider.targets_for(&profile).unwrap().get(Nutrient::Calories);
    profile.goal = WeightGoal::Gain;
    let gain = provider.targets_for(&profile).unwrap().get(Nutrient::Calories);
    profile.goal = WeightGoal::Lose;
    let lose = provider.targets_for(&profile).unwrap().get(Nutrient::Calories);

    assert!((gain - maintain - 300.0).abs() < 0.2);
    assert!((maintain - lose - 500.0).abs() < 0.2);
}

#[test]
fn test_female_targets_differ() {
    let provider = HarrisBenedictTargets::default();
    let mut profile = sample_profile();
    let male = provider.targets_for(&profile).unwrap().get(Nutrient::Calories);
    profile.gender = Gender::Female;
    let female = provider.targets_for(&profile).unwrap().get(Nutrient::Calories);

    assert!(female < male);
}

#[test]
fn test_implausible_profile_is_rejected() {
    let mut profile = sample_profile();
    profile.age = 0;

    let err = HarrisBenedictTargets::default()
        .targets_for(&profile)
        .unwrap_err();
    assert!(err.is_validation());
}
