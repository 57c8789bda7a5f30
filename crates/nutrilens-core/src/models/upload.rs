// ABOUTME: Classification attempt records with outcome statistics and failure analysis
// ABOUTME: Every photo sent to the classifier is recorded as confident, low confidence, or error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use crate::models::ClassificationResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a classification attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadOutcome {
    /// Prediction reached the acceptance threshold
    Confident,
    /// Prediction fell below the threshold
    LowConfidence,
    /// The classifier call failed
    Error,
}

impl UploadOutcome {
    /// Stable identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confident => "confident",
            Self::LowConfidence => "low_confidence",
            Self::Error => "error",
        }
    }

    /// Parse a stored identifier
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown outcome
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "confident" => Ok(Self::Confident),
            "low_confidence" => Ok(Self::LowConfidence),
            "error" => Ok(Self::Error),
            other => Err(AppError::invalid_input(format!(
                "unknown upload outcome '{other}'"
            ))),
        }
    }

    /// Photo tips for retrying after this outcome
    #[must_use]
    pub fn suggestions(self) -> Vec<String> {
        let tips: &[&str] = match self {
            Self::Confident => &[],
            Self::LowConfidence => &[
                "Improve the lighting, natural light works best",
                "Move closer so the dish fills the frame",
                "Use a plain background",
                "Make the dish's distinctive features visible",
            ],
            Self::Error => &[
                "Use a supported format (JPG, PNG, WEBP)",
                "Keep the file under 16 MB",
                "Check that the image is not corrupted",
            ],
        };
        tips.iter().map(|tip| (*tip).to_owned()).collect()
    }
}

/// One photo sent to the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadAttempt {
    /// Attempt identifier
    pub id: String,
    /// Image file name
    pub file_name: String,
    /// Image size in bytes
    pub size_bytes: u64,
    /// When the classifier answered
    pub attempted_at: DateTime<Utc>,
    /// How the attempt ended
    pub outcome: UploadOutcome,
    /// Top prediction, absent on error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_food: Option<String>,
    /// Confidence of the top prediction, absent on error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Classifier error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadAttempt {
    /// Attempt that produced a classification
    pub fn classified(
        id: impl Into<String>,
        file_name: impl Into<String>,
        size_bytes: u64,
        result: &ClassificationResult,
    ) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            size_bytes,
            attempted_at: Utc::now(),
            outcome: if result.is_confident {
                UploadOutcome::Confident
            } else {
                UploadOutcome::LowConfidence
            },
            predicted_food: Some(result.predicted_food.clone()),
            confidence: Some(result.confidence),
            error: None,
        }
    }

    /// Attempt whose classifier call failed
    pub fn failed(
        id: impl Into<String>,
        file_name: impl Into<String>,
        size_bytes: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            size_bytes,
            attempted_at: Utc::now(),
            outcome: UploadOutcome::Error,
            predicted_food: None,
            confidence: None,
            error: Some(error.into()),
        }
    }
}

/// Outcome counts over the tracked attempts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadStatistics {
    /// Attempts tracked
    pub total: u32,
    /// Attempts with a confident prediction
    pub confident: u32,
    /// Low-confidence and failed attempts
    pub failed: u32,
    /// Share of confident attempts in percent, one decimal; 0 when nothing is tracked
    pub success_rate: f64,
}

impl UploadStatistics {
    /// Tally `attempts`
    #[must_use]
    pub fn from_attempts(attempts: &[UploadAttempt]) -> Self {
        let total = u32::try_from(attempts.len()).unwrap_or(u32::MAX);
        let confident = u32::try_from(
            attempts
                .iter()
                .filter(|attempt| attempt.outcome == UploadOutcome::Confident)
                .count(),
        )
        .unwrap_or(u32::MAX);
        let success_rate = if total == 0 {
            0.0
        } else {
            (f64::from(confident) / f64::from(total) * 1000.0).round() / 10.0
        };
        Self {
            total,
            confident,
            failed: total - confident,
            success_rate,
        }
    }
}

/// Pattern in the most recent failed attempts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureAnalysis {
    /// Failures considered
    pub total_failures: usize,
    /// Failures per outcome
    pub failure_types: BTreeMap<UploadOutcome, usize>,
    /// Most frequent failure outcome; ties go to the one seen most recently
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common: Option<UploadOutcome>,
    /// Tips for the most common failure
    pub suggestions: Vec<String>,
}

impl FailureAnalysis {
    /// Analyze the `window` most recent failures of `attempts` (newest first)
    #[must_use]
    pub fn from_attempts(attempts: &[UploadAttempt], window: usize) -> Self {
        let failures: Vec<UploadOutcome> = attempts
            .iter()
            .map(|attempt| attempt.outcome)
            .filter(|outcome| *outcome != UploadOutcome::Confident)
            .take(window)
            .collect();

        let mut failure_types = BTreeMap::new();
        for outcome in &failures {
            *failure_types.entry(*outcome).or_insert(0) += 1;
        }

        let mut most_common: Option<(UploadOutcome, usize)> = None;
        for outcome in &failures {
            let count = failure_types.get(outcome).copied().unwrap_or(0);
            match most_common {
                Some((_, best)) if count <= best => {}
                _ => most_common = Some((*outcome, count)),
            }
        }
        let most_common = most_common.map(|(outcome, _)| outcome);

        Self {
            total_failures: failures.len(),
            failure_types,
            most_common,
            suggestions: most_common.map(UploadOutcome::suggestions).unwrap_or_default(),
        }
    }

    /// Whether any recent attempt failed
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.total_failures > 0
    }
}
