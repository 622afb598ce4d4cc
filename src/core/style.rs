use serde::{Deserialize, Serialize};

use super::error::SparkError;

/// Visual style preset appended to the user's prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Style {
    #[default]
    Cinematic,
    Anime,
    Photorealistic,
    #[serde(rename = "3D Render")]
    Render3d,
    Sketch,
    None,
}

impl Style {
    pub fn all() -> &'static [Style] {
        &[
            Style::Cinematic,
            Style::Anime,
            Style::Photorealistic,
            Style::Render3d,
            Style::Sketch,
            Style::None,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Style::Cinematic => "Cinematic",
            Style::Anime => "Anime",
            Style::Photorealistic => "Photorealistic",
            Style::Render3d => "3D Render",
            Style::Sketch => "Sketch",
            Style::None => "None",
        }
    }

    /// Fixed text fragment appended to the prompt for this style
    pub fn suffix(&self) -> &'static str {
        match self {
            Style::Cinematic => {
                ", cinematic lighting, 8k resolution, highly detailed, dramatic atmosphere"
            }
            Style::Anime => ", anime style, studio ghibli inspired, vibrant colors",
            Style::Photorealistic => ", 8k, raw photo, realistic texture, ray tracing",
            Style::Render3d => ", 3d render, unreal engine 5, octane render",
            Style::Sketch => ", charcoal sketch, pencil drawing, rough lines",
            Style::None => "",
        }
    }

    /// Parse a style by label, case-insensitively ("3d render", "anime", ...)
    pub fn parse(s: &str) -> Result<Self, SparkError> {
        let wanted = s.trim();
        Style::all()
            .iter()
            .copied()
            .find(|style| style.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                SparkError::InvalidParameter(format!(
                    "unknown style '{}'. Valid values: {}",
                    s,
                    Style::labels().join(", ")
                ))
            })
    }

    pub fn labels() -> Vec<&'static str> {
        Style::all().iter().map(Style::label).collect()
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Build the prompt sent to the model: user text followed by the style suffix.
///
/// No validation, truncation or escaping happens here.
pub fn compose(user_text: &str, style: Style) -> String {
    let mut prompt = String::with_capacity(user_text.len() + style.suffix().len());
    prompt.push_str(user_text);
    prompt.push_str(style.suffix());
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_appends_suffix_for_every_style() {
        for style in Style::all() {
            let composed = compose("a lighthouse at dusk", *style);
            assert_eq!(composed, format!("a lighthouse at dusk{}", style.suffix()));
        }
    }

    #[test]
    fn compose_with_none_is_identity() {
        assert_eq!(compose("a red fox in snow", Style::None), "a red fox in snow");
    }

    #[test]
    fn compose_anime() {
        assert_eq!(
            compose("a red fox in snow", Style::Anime),
            "a red fox in snow, anime style, studio ghibli inspired, vibrant colors"
        );
    }

    #[test]
    fn parse_accepts_labels_case_insensitively() {
        assert_eq!(Style::parse("3d render").unwrap(), Style::Render3d);
        assert_eq!(Style::parse("ANIME").unwrap(), Style::Anime);
        assert!(Style::parse("watercolor").is_err());
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&Style::Render3d).unwrap();
        assert_eq!(json, "\"3D Render\"");
    }
}
