// ABOUTME: HTTP client for the remote food classifier service
// ABOUTME: Uploads meal photos as multipart forms and fetches the supported-food catalog
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{ClassifierService, ImageUpload};
use crate::config::ClassifierConfig;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use nutrilens_core::models::{ClassificationResult, Prediction};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, Response};
use serde::Deserialize;
use tracing::{debug, warn};

/// Wire shape of a classification response
#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    predicted_food: String,
    confidence: f64,
    #[serde(default)]
    top_predictions: Vec<Prediction>,
}

/// Wire shape of the catalog response
#[derive(Debug, Deserialize)]
struct SupportedFoodsResponse {
    supported_foods: Vec<String>,
}

/// Wire shape of an error body
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`ClassifierService`] backed by the classifier's HTTP API
pub struct HttpClassifierClient {
    client: Client,
    base_url: String,
    acceptance_threshold: f64,
}

impl HttpClassifierClient {
    /// Build a client with the configured timeouts
    ///
    /// # Errors
    ///
    /// Returns a config error if the HTTP client cannot be constructed
    pub fn new(config: &ClassifierConfig) -> AppResult<Self> {
        let client = ClientBuilder::new()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            acceptance_threshold: config.acceptance_threshold,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Extract the service's own error message from a failed response
async fn failure_message(response: Response) -> String {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => format!("classifier responded with HTTP {status}"),
    }
}

#[async_trait]
impl ClassifierService for HttpClassifierClient {
    async fn classify(&self, image: &ImageUpload) -> AppResult<ClassificationResult> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(|e| AppError::invalid_input(format!("Invalid image content type: {e}")))?;
        let form = Form::new().part("image", part);

        let response = self
            .client
            .post(self.endpoint("/api/classify"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Classifier request failed");
                AppError::classification(format!("Classifier request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let message = failure_message(response).await;
            warn!(%message, "Classifier rejected image");
            return Err(AppError::classification(message));
        }

        let body: ClassifyResponse = response.json().await.map_err(|e| {
            AppError::classification(format!("Malformed classifier response: {e}"))
        })?;
        debug!(
            food = %body.predicted_food,
            confidence = body.confidence,
            "Classifier responded"
        );

        Ok(ClassificationResult::new(
            body.predicted_food,
            body.confidence,
            body.top_predictions,
            self.acceptance_threshold,
        ))
    }

    async fn supported_foods(&self) -> AppResult<Vec<String>> {
        let response = self
            .client
            .get(self.endpoint("/api/foods/supported"))
            .send()
            .await
            .map_err(|e| AppError::catalog_unavailable(format!("Catalog request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::catalog_unavailable(failure_message(response).await));
        }

        let body: SupportedFoodsResponse = response
            .json()
            .await
            .map_err(|e| AppError::catalog_unavailable(format!("Malformed catalog response: {e}")))?;
        Ok(body.supported_foods)
    }
}
