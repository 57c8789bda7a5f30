// ABOUTME: Error types shared across the nutrilens application
// ABOUTME: Re-exports the core error taxonomy so callers import from one place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use nutrilens_core::errors::{
    AppError, AppResult, ErrorCode, ErrorContext, ErrorResponse, ErrorResponseDetails,
};
