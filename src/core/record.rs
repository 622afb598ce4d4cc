use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::params::AspectRatio;
use super::style::Style;

/// One completed generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// URL of the externally hosted image; only valid while the host serves it
    pub image_url: String,

    /// The user's prompt without the style suffix
    pub raw_prompt: String,

    pub style: Style,

    pub aspect_ratio: AspectRatio,

    /// Exact seed sent to the service
    pub seed: u32,

    pub created_at: DateTime<Utc>,
}

impl GenerationRecord {
    /// Caption shown under the displayed image
    pub fn caption(&self) -> String {
        format!("Seed: {} | Style: {}", self.seed, self.style)
    }

    /// Get the prompt (truncated for display)
    pub fn prompt_preview(&self, max_len: usize) -> String {
        if self.raw_prompt.chars().count() <= max_len {
            self.raw_prompt.clone()
        } else {
            let kept: String = self
                .raw_prompt
                .chars()
                .take(max_len.saturating_sub(3))
                .collect();
            format!("{}...", kept)
        }
    }
}
