// ABOUTME: Unified error handling for NutriLens with standard error codes
// ABOUTME: Maps validation, service, not-found, and state failures onto one AppError type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every fallible operation in the workspace returns [`AppResult`]. Error codes are
//! grouped in numeric families so callers can branch on the family (validation,
//! resource, external service, state, internal) without string matching.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::io;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange = 3003,

    // Resource Management (4000-4999)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    #[serde(rename = "RESOURCE_LOCKED")]
    ResourceLocked = 4002,
    #[serde(rename = "RESOURCE_UNAVAILABLE")]
    ResourceUnavailable = 4003,

    // External Services (5000-5999)
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,

    // Workflow State (6000-6999)
    #[serde(rename = "INVALID_STATE")]
    InvalidState = 6000,
    #[serde(rename = "REQUEST_SUPERSEDED")]
    RequestSuperseded = 6001,

    // Internal (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 9002,
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing",
            Self::ValueOutOfRange => "A value is outside the allowed range",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceLocked => "The resource is busy with another request",
            Self::ResourceUnavailable => "The resource is temporarily unavailable",
            Self::ExternalServiceError => "An external service returned an error",
            Self::ExternalServiceUnavailable => "An external service is unavailable",
            Self::InvalidState => "The operation is not allowed in the current state",
            Self::RequestSuperseded => "The request was superseded by a newer one",
            Self::InternalError => "An internal error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::ConfigError => "Configuration error",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// True for codes that reject user input before any collaborator is called
    #[must_use]
    pub const fn is_validation(self) -> bool {
        matches!(
            self,
            Self::InvalidInput | Self::MissingRequiredField | Self::ValueOutOfRange
        )
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Collaborator that produced the failure (`classifier`, `catalog`, `meal_store`)
    pub service: Option<String>,
    /// Resource ID if applicable
    pub resource_id: Option<String>,
}

/// Unified error type for the application
#[derive(Debug, Error)]
#[error("{}: {}", .code.description(), .message)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Name the collaborator responsible for this error
    #[must_use]
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.context.service = Some(service.into());
        self
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// True when the error rejected input before any collaborator was called
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        self.code.is_validation()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Serializable error envelope printed by `--json` output
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Body of an [`ErrorResponse`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Collaborator that failed, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Resource the error refers to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                service: error.context.service,
                resource_id: error.context.resource_id,
            },
        }
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Input rejected before any work was attempted (`ValidationError`)
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// A required input is missing, e.g. no image selected or an empty food name
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("{field} is required"),
        )
    }

    /// A numeric input is outside its accepted range
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self::new(ErrorCode::ResourceNotFound, format!("{resource} not found"))
            .with_resource_id(resource)
    }

    /// Collaborator call failed (`ServiceError`), carrying the collaborator's message
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        let service = service.into();
        let message = message.into();
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{service}: {message}"),
        )
        .with_service(service)
    }

    /// Collaborator could not be reached at all
    pub fn service_unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        let service = service.into();
        let message = message.into();
        Self::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("{service}: {message}"),
        )
        .with_service(service)
    }

    /// Classifier call failed (`ClassificationError`); message is the service's own
    pub fn classification(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalServiceError, message).with_service("classifier")
    }

    /// Supported-food catalog could not be fetched (`CatalogUnavailable`)
    pub fn catalog_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceUnavailable, message).with_service("catalog")
    }

    /// A request was rejected because another one is still being submitted
    pub fn busy(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceLocked, message)
    }

    /// Operation not allowed in the current workflow state
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidState, message)
    }

    /// A late response was discarded because a newer request replaced it
    pub fn superseded(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RequestSuperseded, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message).with_service("meal_store")
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization(error.to_string()).with_source(error)
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::internal(format!("I/O error: {error}")).with_source(error)
    }
}
