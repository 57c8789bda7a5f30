// ABOUTME: Main library entry point for the nutrilens meal tracker
// ABOUTME: Wires classification, confidence resolution, intake tracking, and recommendations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Nutrilens
//!
//! Photo-based meal logging with daily nutrient tracking.
//!
//! A meal photo is sent to an external classifier. Confident predictions are offered for
//! one-step confirmation; uncertain ones fall back to ranked alternates or a manual search
//! of the supported-food catalog. Confirmed meals are stored with a snapshot of their
//! nutrients, folded into daily progress against targets derived from the user's profile,
//! and used to rank foods that close the day's gaps.
//!
//! ## Architecture
//!
//! - **Resolver**: confidence-driven confirmation workflow
//! - **Tracker**: meal log writes, profile, daily progress, and meal events
//! - **Recommendations**: catalog ranking against deficiencies
//! - **Upload tracking**: outcome history of every classification attempt
//! - **Collaborators**: classifier client, `SQLite` meal store, JSON nutrient table
//!
//! Pure aggregation and ranking live in `nutrilens-intelligence`; shared models and the
//! error taxonomy live in `nutrilens-core`.

/// Image classification client and contract
pub mod classifier;

/// Environment-driven configuration
pub mod config;

/// `SQLite` persistence for meals and the profile
pub mod database;

/// Error taxonomy
pub mod errors;

/// Meal event channel
pub mod events;

/// Structured logging setup
pub mod logging;

/// Meal store contract and implementation
pub mod meal_store;

/// Per-food nutrient lookup
pub mod nutrient_table;

/// Food recommendations
pub mod recommendations;

/// Confidence resolution workflow
pub mod resolver;

/// Intake tracking and progress
pub mod tracker;

/// Classification attempt history
pub mod upload_tracker;
