use image::{DynamicImage, ImageOutputFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::core::SparkError;
use crate::http_client::HTTP_CLIENT;

/// JPEG quality for the web-ready download
pub const JPEG_QUALITY: u8 = 85;

/// A downloadable byte buffer with its suggested filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub file_name: &'static str,
    pub mime_type: &'static str,
}

impl Artifact {
    /// Write the artifact into `dir` under its suggested filename
    pub async fn save(&self, dir: &Path) -> Result<PathBuf, SparkError> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        tracing::info!("Saved image to: {}", path.display());
        Ok(path)
    }
}

/// A fetched result image and its two download encodings
#[derive(Debug, Clone)]
pub struct Materialized {
    pub image: DynamicImage,
    /// High-res lossless PNG
    pub png: Artifact,
    /// Web-ready JPEG without alpha
    pub jpeg: Artifact,
}

impl Materialized {
    pub fn artifacts(&self) -> [&Artifact; 2] {
        [&self.png, &self.jpeg]
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

/// Fetch the image behind `url` and prepare both downloads
pub async fn materialize(url: &str) -> Result<Materialized, SparkError> {
    let bytes = fetch(url).await?;
    encode(&bytes)
}

/// Like [`materialize`], but a failure only means "no downloads"
pub async fn materialize_or_skip(url: &str) -> Option<Materialized> {
    match materialize(url).await {
        Ok(materialized) => Some(materialized),
        Err(e) => {
            tracing::debug!("Skipping downloads for {}: {}", url, e);
            None
        }
    }
}

async fn fetch(url: &str) -> Result<Vec<u8>, SparkError> {
    let response = HTTP_CLIENT
        .get(url)
        .send()
        .await
        .map_err(|e| SparkError::ImageError(format!("image download failed: {}", e)))?;
    let status = response.status();
    if !status.is_success() {
        return Err(SparkError::ImageError(format!(
            "image download failed ({})",
            status
        )));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| SparkError::ImageError(format!("failed reading image bytes: {}", e)))?;
    Ok(bytes.to_vec())
}

/// Decode raw image bytes and re-encode them as PNG and JPEG
pub fn encode(bytes: &[u8]) -> Result<Materialized, SparkError> {
    let image = image::load_from_memory(bytes)?;

    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;

    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut jpeg = Vec::new();
    rgb.write_to(
        &mut Cursor::new(&mut jpeg),
        ImageOutputFormat::Jpeg(JPEG_QUALITY),
    )?;

    Ok(Materialized {
        image,
        png: Artifact {
            bytes: png,
            file_name: "sparkflow_hd.png",
            mime_type: "image/png",
        },
        jpeg: Artifact {
            bytes: jpeg,
            file_name: "sparkflow_web.jpg",
            mime_type: "image/jpeg",
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_png() -> (RgbaImage, Vec<u8>) {
        let img = RgbaImage::from_fn(7, 5, |x, y| {
            Rgba([(x * 30) as u8, (y * 50) as u8, 200, if x == 0 { 0 } else { 255 }])
        });
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        (img, bytes)
    }

    #[test]
    fn png_is_pixel_identical() {
        let (original, bytes) = sample_png();
        let materialized = encode(&bytes).unwrap();

        let decoded = image::load_from_memory(&materialized.png.bytes).unwrap();
        assert_eq!(decoded.to_rgba8(), original);
        assert_eq!(materialized.png.mime_type, "image/png");
        assert_eq!(materialized.png.file_name, "sparkflow_hd.png");
    }

    #[test]
    fn jpeg_keeps_dimensions_and_drops_alpha() {
        let (original, bytes) = sample_png();
        let materialized = encode(&bytes).unwrap();

        let decoded = image::load_from_memory(&materialized.jpeg.bytes).unwrap();
        assert_eq!(decoded.width(), original.width());
        assert_eq!(decoded.height(), original.height());
        assert!(!decoded.color().has_alpha());
        assert_eq!(materialized.jpeg.mime_type, "image/jpeg");
        assert_eq!(materialized.dimensions(), (7, 5));
    }

    #[test]
    fn rejects_undecodable_bytes() {
        let err = encode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, SparkError::ImageError(_)));
    }

    #[tokio::test]
    async fn fetches_and_encodes_hosted_image() {
        let server = MockServer::start().await;
        let (_, bytes) = sample_png();

        Mock::given(method("GET"))
            .and(path("/files/fox.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
            .mount(&server)
            .await;

        let url = format!("{}/files/fox.png", server.uri());
        let materialized = materialize(&url).await.unwrap();
        assert_eq!(materialized.dimensions(), (7, 5));
    }

    #[tokio::test]
    async fn missing_image_is_skipped() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/files/gone.png", server.uri());
        assert!(materialize(&url).await.is_err());
        assert!(materialize_or_skip(&url).await.is_none());
    }

    #[tokio::test]
    async fn saves_under_suggested_name() {
        let (_, bytes) = sample_png();
        let materialized = encode(&bytes).unwrap();
        let dir = tempdir().unwrap();

        let path = materialized.jpeg.save(dir.path()).await.unwrap();
        assert_eq!(path, dir.path().join("sparkflow_web.jpg"));
        assert_eq!(std::fs::read(path).unwrap(), materialized.jpeg.bytes);
    }
}
