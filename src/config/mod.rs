// ABOUTME: Configuration module for NutriLens
// ABOUTME: Environment-driven settings for storage, classifier, resolver, and tracker
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration is read from environment variables only. Every setting has a default,
//! so an empty environment yields a working local setup.

/// Database URL parsing and connection settings
pub mod database;
/// Top-level application configuration assembled from the environment
pub mod environment;

pub use database::{DatabaseConfig, DatabaseUrl};
pub use environment::{AppConfig, ClassifierConfig, ResolverConfig, TrackerConfig};
