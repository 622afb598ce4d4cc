mod types;

use chrono::Utc;
use reqwest::header::AUTHORIZATION;

pub use types::*;

use crate::config::Config;
use crate::core::{GenerateParams, GenerationRecord, SparkError, NUM_INFERENCE_STEPS};
use crate::http_client::HTTP_CLIENT;

/// fal.ai synchronous inference client
pub struct FalClient {
    api_key: String,
    endpoint: String,
}

impl FalClient {
    /// Create a new client from config. Fails before any network traffic when
    /// no credential is configured.
    pub fn from_config(config: &Config) -> Result<Self, SparkError> {
        let api_key = config
            .api_key()
            .ok_or(SparkError::MissingApiKey)?
            .to_string();

        let endpoint = format!(
            "{}/{}",
            config.api.base_url.trim_end_matches('/'),
            config.api.model.trim_start_matches('/')
        );

        Ok(Self { api_key, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run one generation and return the resulting record.
    ///
    /// The seed is resolved right before the call. The record keeps the
    /// unstyled prompt while the service receives the styled one.
    pub async fn generate(&self, params: &GenerateParams) -> Result<GenerationRecord, SparkError> {
        let seed = params.seed_mode.resolve();
        let request = Self::build_request(params, seed);

        tracing::debug!("Sending generate request to: {}", self.endpoint);
        tracing::debug!(
            "Request body: {}",
            serde_json::to_string(&request).unwrap_or_default()
        );

        let response = HTTP_CLIENT
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Key {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!("Response status: {}", status);
        tracing::debug!("Response body: {}", body);

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(|err| err.message())
                .unwrap_or_else(|| {
                    if body.trim().is_empty() {
                        status.to_string()
                    } else {
                        format!("{} ({})", body.trim(), status)
                    }
                });
            return Err(SparkError::ApiError {
                message,
                source: None,
            });
        }

        let response: FluxResponse = serde_json::from_str(&body)
            .map_err(|e| SparkError::InvalidResponse(e.to_string()))?;

        if let Some(echoed) = response.seed {
            if echoed != u64::from(seed) {
                tracing::warn!("Service reported seed {} but {} was sent", echoed, seed);
            }
        }

        let image_url = response
            .images
            .into_iter()
            .next()
            .map(|image| image.url)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| SparkError::InvalidResponse("No images in response".to_string()))?;

        Ok(GenerationRecord {
            image_url,
            raw_prompt: params.prompt.clone(),
            style: params.style,
            aspect_ratio: params.aspect_ratio,
            seed,
            created_at: Utc::now(),
        })
    }

    /// Build the API request body
    fn build_request(params: &GenerateParams, seed: u32) -> FluxRequest {
        FluxRequest {
            prompt: params.styled_prompt(),
            image_size: params.aspect_ratio,
            num_inference_steps: NUM_INFERENCE_STEPS,
            seed,
            enable_safety_checker: false,
        }
    }
}
