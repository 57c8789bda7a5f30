// ABOUTME: Core types and constants for the NutriLens meal tracker
// ABOUTME: Foundation crate with error handling, nutrient configuration, and domain models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # NutriLens Core
//!
//! Foundation crate providing shared types and constants for NutriLens. Nothing in
//! here performs I/O; collaborators and algorithms live in the other workspace crates.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `AppResult`
//! - **constants**: Static nutrient configuration table and shared limits
//! - **models**: Nutrients, meal records, classification results, and user profiles

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants and the static nutrient configuration table
pub mod constants;

/// Core data models (nutrients, meals, classification, profile)
pub mod models;

pub use errors::{AppError, AppResult, ErrorCode};
