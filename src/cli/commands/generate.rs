use anyhow::Result;
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{Config, DisplayMode};
use crate::core::{AspectRatio, GenerateParams, SeedMode, Style, MAX_SEED};
use crate::materialize::{self, Materialized};
use crate::session::Session;

#[derive(Args)]
pub struct GenerateArgs {
    /// The prompt describing the image to generate
    #[arg(required = true)]
    pub prompt: String,

    /// Style preset (Cinematic, Anime, Photorealistic, "3D Render", Sketch, None)
    #[arg(short, long)]
    pub style: Option<String>,

    /// Aspect ratio (16:9, 4:3, 1:1, 3:4, 9:16)
    #[arg(short, long, alias = "ar")]
    pub aspect_ratio: Option<String>,

    /// Lock the seed to keep the composition
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..MAX_SEED as i64))]
    pub seed: Option<u32>,

    /// Draw a fresh seed even when the config locks it
    #[arg(long, conflicts_with = "seed")]
    pub random_seed: bool,

    /// Output directory for downloads
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Don't save the downloads
    #[arg(long)]
    pub no_download: bool,

    /// Output format (text, json, quiet)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

impl GenerateArgs {
    fn params(&self, config: &Config) -> Result<GenerateParams> {
        let style = match &self.style {
            Some(s) => Style::parse(s)?,
            None => config.defaults.style,
        };
        let aspect_ratio = match &self.aspect_ratio {
            Some(ar) => AspectRatio::parse(ar)?,
            None => config.defaults.aspect_ratio,
        };
        let seed_mode = match (self.seed, self.random_seed) {
            (Some(seed), _) => SeedMode::locked(seed)?,
            (None, true) => SeedMode::Random,
            (None, false) => config.seed_mode(),
        };

        Ok(GenerateParams::new(&self.prompt)
            .with_style(style)
            .with_aspect_ratio(aspect_ratio)
            .with_seed_mode(seed_mode))
    }
}

pub async fn run(args: GenerateArgs, config: &Config) -> Result<()> {
    let params = args.params(config)?;
    let mut session = Session::new(config.clone());

    // Busy indicator while the call blocks
    let pb = if args.format == "text" {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.red} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("🎨 AI is crafting your masterpiece...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let record = match session.generate(&params).await {
        Ok(record) => record,
        Err(e) => {
            if let Some(pb) = pb {
                pb.finish_with_message(format!("{} Generation failed", "✗".red()));
            }
            if args.format == "json" {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "error": e.to_string() }))?
                );
            } else if args.format != "quiet" {
                eprintln!("{}: {}", "Error".red().bold(), e);
            }
            return Err(e.into());
        }
    };

    if let Some(pb) = &pb {
        pb.set_message("Preparing downloads...");
    }

    // Download failures only hide the downloads
    let materialized = materialize::materialize_or_skip(&record.image_url).await;

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.directory));
    let paths = match (&materialized, args.no_download) {
        (Some(m), false) => save_downloads(m, &output_dir).await,
        _ => Vec::new(),
    };

    if let Some(pb) = &pb {
        pb.finish_with_message(format!("{} Artwork ready", "✓".green()));
    }

    match args.format.as_str() {
        "json" => {
            let mut value = serde_json::to_value(&record)?;
            value["downloads"] = serde_json::to_value(
                paths
                    .iter()
                    .map(|p| p.to_string_lossy().to_string())
                    .collect::<Vec<_>>(),
            )?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        "quiet" => {
            if paths.is_empty() {
                println!("{}", record.image_url);
            }
            for path in &paths {
                println!("{}", path.display());
            }
        }
        _ => {
            println!();
            println!("{}: {}", "Prompt".cyan().bold(), record.raw_prompt);
            println!("{}: {}", "Style".cyan().bold(), record.style);
            println!("{}: {}", "Aspect Ratio".cyan().bold(), record.aspect_ratio);
            let seed_note = if params.seed_mode.is_random() {
                "random"
            } else {
                "locked"
            };
            println!("{}: {} ({})", "Seed".cyan().bold(), record.seed, seed_note);
            println!("{}: {}", "Image URL".cyan().bold(), record.image_url);

            if !paths.is_empty() {
                println!();
                println!("{}:", "Downloads".cyan().bold());
                for path in &paths {
                    println!("  {}", path.display());
                }
            }

            if config.output.display == DisplayMode::Terminal {
                if let Some(m) = &materialized {
                    println!();
                    display_image_terminal(m);
                }
            }
        }
    }

    Ok(())
}

/// Save both downloads into `dir`, skipping any that fail to write
async fn save_downloads(materialized: &Materialized, dir: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for artifact in materialized.artifacts() {
        match artifact.save(dir).await {
            Ok(path) => paths.push(path),
            Err(e) => tracing::warn!("Could not save {}: {}", artifact.file_name, e),
        }
    }
    paths
}

/// Display an image in the terminal using viuer
fn display_image_terminal(materialized: &Materialized) {
    let conf = viuer::Config {
        width: Some(80),
        height: Some(30),
        absolute_offset: false,
        ..Default::default()
    };

    if let Err(e) = viuer::print(&materialized.image, &conf) {
        tracing::debug!("Failed to display image in terminal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use image::{DynamicImage, ImageOutputFormat, RgbImage};
    use serde_json::json;
    use std::io::Cursor;
    use tempfile::{tempdir, NamedTempFile};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: GenerateArgs,
    }

    fn parse(argv: &[&str]) -> Result<GenerateArgs, clap::Error> {
        let mut full = vec!["sparkflow"];
        full.extend_from_slice(argv);
        TestCli::try_parse_from(full).map(|cli| cli.args)
    }

    #[test]
    fn flags_override_config_defaults() {
        let args = parse(&["a red fox in snow", "--style", "anime", "--ar", "1:1", "--seed", "42"])
            .unwrap();
        let params = args.params(&Config::default()).unwrap();

        assert_eq!(params.prompt, "a red fox in snow");
        assert_eq!(params.style, Style::Anime);
        assert_eq!(params.aspect_ratio, AspectRatio::SquareHd);
        assert_eq!(params.seed_mode, SeedMode::Locked(42));
    }

    #[test]
    fn falls_back_to_config_defaults() {
        let mut config = Config::default();
        config.set("defaults.seed_mode", "locked").unwrap();
        config.set("defaults.seed", "9").unwrap();
        config.set("defaults.style", "sketch").unwrap();

        let params = parse(&["a barn"]).unwrap().params(&config).unwrap();
        assert_eq!(params.style, Style::Sketch);
        assert_eq!(params.seed_mode, SeedMode::Locked(9));

        let params = parse(&["a barn", "--random-seed"])
            .unwrap()
            .params(&config)
            .unwrap();
        assert!(params.seed_mode.is_random());
    }

    #[test]
    fn rejects_out_of_range_seed() {
        assert!(parse(&["a barn", "--seed", "1000000"]).is_err());
        assert!(parse(&["a barn", "--seed", "5", "--random-seed"]).is_err());
    }

    #[test]
    fn rejects_unknown_style() {
        let args = parse(&["a barn", "--style", "watercolor"]).unwrap();
        assert!(args.params(&Config::default()).is_err());
    }

    fn png_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(4, 3))
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    async fn mock_studio() -> (MockServer, Config) {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/fal-ai/flux/schnell"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "images": [{ "url": format!("{}/files/out.png", server.uri()) }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/out.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes()))
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.api.base_url = server.uri();
        config.api.key = Some("k".into());
        config.output.display = DisplayMode::None;
        (server, config)
    }

    #[tokio::test]
    async fn saves_both_downloads() {
        let (_server, config) = mock_studio().await;
        let dir = tempdir().unwrap();
        let out = dir.path().to_string_lossy().to_string();

        let args = parse(&["a barn", "--output", out.as_str(), "--format", "quiet"]).unwrap();
        run(args, &config).await.unwrap();

        assert!(dir.path().join("sparkflow_hd.png").exists());
        assert!(dir.path().join("sparkflow_web.jpg").exists());
    }

    #[tokio::test]
    async fn unwritable_output_keeps_the_generation() {
        let (_server, config) = mock_studio().await;
        let blocker = NamedTempFile::new().unwrap();
        let out = blocker.path().to_string_lossy().to_string();

        let args = parse(&["a barn", "--output", out.as_str(), "--format", "json"]).unwrap();
        assert!(run(args, &config).await.is_ok());

        let materialized = materialize::encode(&png_bytes()).unwrap();
        assert!(save_downloads(&materialized, blocker.path()).await.is_empty());
    }
}
