use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::SparkError;
use super::style::{compose, Style};

/// Exclusive upper bound for seeds
pub const MAX_SEED: u32 = 1_000_000;

/// Inference steps sent with every request
pub const NUM_INFERENCE_STEPS: u32 = 4;

/// Output dimension presets accepted by the image service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "landscape_16_9")]
    Landscape16x9,
    #[serde(rename = "landscape_4_3")]
    Landscape4x3,
    #[serde(rename = "square_hd")]
    SquareHd,
    #[serde(rename = "portrait_4_3")]
    Portrait4x3,
    #[serde(rename = "portrait_16_9")]
    Portrait16x9,
}

impl AspectRatio {
    pub fn all() -> &'static [AspectRatio] {
        &[
            AspectRatio::Landscape16x9,
            AspectRatio::Landscape4x3,
            AspectRatio::SquareHd,
            AspectRatio::Portrait4x3,
            AspectRatio::Portrait16x9,
        ]
    }

    /// Value sent as `image_size`
    pub fn api_value(&self) -> &'static str {
        match self {
            AspectRatio::Landscape16x9 => "landscape_16_9",
            AspectRatio::Landscape4x3 => "landscape_4_3",
            AspectRatio::SquareHd => "square_hd",
            AspectRatio::Portrait4x3 => "portrait_4_3",
            AspectRatio::Portrait16x9 => "portrait_16_9",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Landscape16x9 => "16:9 Landscape",
            AspectRatio::Landscape4x3 => "4:3 Landscape",
            AspectRatio::SquareHd => "1:1 Square",
            AspectRatio::Portrait4x3 => "4:3 Portrait",
            AspectRatio::Portrait16x9 => "9:16 Portrait",
        }
    }

    /// Short ratio as typed on the command line
    pub fn ratio(&self) -> &'static str {
        match self {
            AspectRatio::Landscape16x9 => "16:9",
            AspectRatio::Landscape4x3 => "4:3",
            AspectRatio::SquareHd => "1:1",
            AspectRatio::Portrait4x3 => "3:4",
            AspectRatio::Portrait16x9 => "9:16",
        }
    }

    /// Parse from a short ratio, a display label or an API value
    pub fn parse(s: &str) -> Result<Self, SparkError> {
        let wanted = s.trim();
        AspectRatio::all()
            .iter()
            .copied()
            .find(|ar| {
                ar.ratio() == wanted
                    || ar.api_value().eq_ignore_ascii_case(wanted)
                    || ar.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| {
                let valid: Vec<&str> = AspectRatio::all().iter().map(|ar| ar.ratio()).collect();
                SparkError::InvalidParameter(format!(
                    "unknown aspect ratio '{}'. Valid values: {}",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How the seed for the next request is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedMode {
    /// New variation: a fresh seed per request
    #[default]
    Random,
    /// Keep composition: the same seed for every request
    Locked(u32),
}

impl SeedMode {
    pub fn locked(seed: u32) -> Result<Self, SparkError> {
        validate_seed(seed)?;
        Ok(SeedMode::Locked(seed))
    }

    pub fn is_random(&self) -> bool {
        matches!(self, SeedMode::Random)
    }

    /// Seed to send with the next request. Random mode draws on every call.
    pub fn resolve(&self) -> u32 {
        match self {
            SeedMode::Random => rand::rng().random_range(0..MAX_SEED),
            SeedMode::Locked(seed) => *seed,
        }
    }
}

impl std::fmt::Display for SeedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedMode::Random => write!(f, "New Variation (Random)"),
            SeedMode::Locked(seed) => write!(f, "Keep Composition (Seed {})", seed),
        }
    }
}

pub fn validate_seed(seed: u32) -> Result<u32, SparkError> {
    if seed >= MAX_SEED {
        return Err(SparkError::InvalidParameter(format!(
            "seed must be below {}, got {}",
            MAX_SEED, seed
        )));
    }
    Ok(seed)
}

/// User-facing inputs of one generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateParams {
    /// The prompt exactly as the user typed it
    pub prompt: String,
    pub style: Style,
    pub aspect_ratio: AspectRatio,
    pub seed_mode: SeedMode,
}

impl GenerateParams {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            style: Style::default(),
            aspect_ratio: AspectRatio::default(),
            seed_mode: SeedMode::default(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_seed_mode(mut self, seed_mode: SeedMode) -> Self {
        self.seed_mode = seed_mode;
        self
    }

    /// The prompt with the style suffix, as sent to the service
    pub fn styled_prompt(&self) -> String {
        compose(&self.prompt, self.style)
    }

    pub fn has_prompt(&self) -> bool {
        !self.prompt.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_labels_to_api_values() {
        assert_eq!(AspectRatio::parse("1:1 Square").unwrap().api_value(), "square_hd");
        assert_eq!(AspectRatio::parse("9:16").unwrap().api_value(), "portrait_16_9");
        assert_eq!(AspectRatio::parse("4:3 Portrait").unwrap().api_value(), "portrait_4_3");
        assert_eq!(
            AspectRatio::parse("landscape_4_3").unwrap(),
            AspectRatio::Landscape4x3
        );
        assert!(AspectRatio::parse("21:9").is_err());
    }

    #[test]
    fn serializes_as_api_value() {
        for ar in AspectRatio::all() {
            let json = serde_json::to_string(ar).unwrap();
            assert_eq!(json, format!("\"{}\"", ar.api_value()));
        }
    }

    #[test]
    fn random_seeds_stay_in_range() {
        for _ in 0..500 {
            assert!(SeedMode::Random.resolve() < MAX_SEED);
        }
    }

    #[test]
    fn locked_seed_is_reused() {
        let mode = SeedMode::locked(42).unwrap();
        for _ in 0..10 {
            assert_eq!(mode.resolve(), 42);
        }
    }

    #[test]
    fn locked_seed_rejects_out_of_range() {
        assert!(SeedMode::locked(MAX_SEED).is_err());
        assert!(SeedMode::locked(MAX_SEED - 1).is_ok());
    }

    #[test]
    fn styled_prompt_keeps_raw_prompt_untouched() {
        let params = GenerateParams::new("a red fox in snow").with_style(Style::Anime);
        assert_eq!(params.prompt, "a red fox in snow");
        assert_eq!(
            params.styled_prompt(),
            "a red fox in snow, anime style, studio ghibli inspired, vibrant colors"
        );
    }
}
