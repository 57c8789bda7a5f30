// ABOUTME: Application constants shared across NutriLens crates
// ABOUTME: Groups the nutrient configuration table with workflow and upload limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Static nutrient configuration table (display names, units, bands)
pub mod nutrients;

/// Confidence policy constants
pub mod confidence {
    /// Classifier confidence (percent) at or above which a prediction is auto-accepted
    pub const DEFAULT_ACCEPTANCE_THRESHOLD: f64 = 70.0;

    /// Confidence recorded for foods picked from the manual catalog search
    pub const MANUAL_SELECTION_CONFIDENCE: f64 = 100.0;

    /// Number of ranked alternates kept from a classifier response
    pub const MAX_TOP_PREDICTIONS: usize = 3;
}

/// Image upload limits
pub mod uploads {
    /// Largest accepted image (16 MiB)
    pub const DEFAULT_MAX_IMAGE_BYTES: usize = 16 * 1024 * 1024;

    /// File extensions accepted for meal photos
    pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

    /// Classification attempts kept in the upload history
    pub const MAX_TRACKED_ATTEMPTS: u32 = 50;

    /// Default number of attempts shown by a history query
    pub const DEFAULT_ATTEMPT_HISTORY_LIMIT: u32 = 10;

    /// Most recent failures considered by a failure analysis
    pub const RECENT_FAILURE_WINDOW: usize = 5;
}

/// Meal history limits
pub mod history {
    /// Default number of meals returned by a history query
    pub const DEFAULT_HISTORY_LIMIT: u32 = 10;

    /// Days of meals kept by a retention purge
    pub const DEFAULT_RETENTION_DAYS: u32 = 7;

    /// Default number of ranked recommendations
    pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 3;
}
