use thiserror::Error;

/// Coarse classification used by the presentation layer to decide how a
/// failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing credential or invalid settings; the user fixes it out-of-band.
    Configuration,
    /// Network failure, non-success status or malformed payload.
    Transport,
    /// Fetching or re-encoding the result image failed.
    PostProcessing,
}

#[derive(Error, Debug)]
pub enum SparkError {
    #[error("API key missing. Set the FAL_KEY environment variable (or add it to .env) or run: sparkflow config set api.key <your-key>")]
    MissingApiKey,

    #[error("Prompt is empty. Describe your vision first")]
    EmptyPrompt,

    #[error("API error: {message}")]
    ApiError {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Image processing error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SparkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SparkError::MissingApiKey
            | SparkError::EmptyPrompt
            | SparkError::InvalidParameter(_) => ErrorKind::Configuration,
            SparkError::ApiError { .. } | SparkError::InvalidResponse(_) => ErrorKind::Transport,
            SparkError::ImageError(_) | SparkError::IoError(_) => ErrorKind::PostProcessing,
        }
    }
}

impl From<reqwest::Error> for SparkError {
    fn from(err: reqwest::Error) -> Self {
        SparkError::ApiError {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<image::ImageError> for SparkError {
    fn from(err: image::ImageError) -> Self {
        SparkError::ImageError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_failures_by_origin() {
        assert_eq!(SparkError::MissingApiKey.kind(), ErrorKind::Configuration);
        assert_eq!(
            SparkError::InvalidResponse("no images".into()).kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            SparkError::ImageError("bad png".into()).kind(),
            ErrorKind::PostProcessing
        );
    }
}
