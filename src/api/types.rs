use serde::{Deserialize, Serialize};

use crate::core::AspectRatio;

/// Request body for a FLUX text-to-image endpoint
#[derive(Debug, Serialize)]
pub struct FluxRequest {
    pub prompt: String,
    pub image_size: AspectRatio,
    pub num_inference_steps: u32,
    pub seed: u32,
    pub enable_safety_checker: bool,
}

/// Response from a FLUX text-to-image endpoint
#[derive(Debug, Deserialize)]
pub struct FluxResponse {
    pub images: Vec<FalImage>,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Hosted image descriptor
#[derive(Debug, Deserialize)]
pub struct FalImage {
    pub url: String,
}

/// Error response from API.
///
/// `detail` is either a plain message or a list of validation errors.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub detail: serde_json::Value,
}

impl ApiErrorResponse {
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            serde_json::Value::String(msg) => Some(msg.clone()),
            serde_json::Value::Array(items) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if msgs.is_empty() {
                    None
                } else {
                    Some(msgs.join("; "))
                }
            }
            _ => None,
        }
    }
}
