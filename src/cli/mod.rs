pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sparkflow",
    version,
    about = "⚡ SparkFlow Studio - Transform your imagination into reality with AI",
    long_about = r#"⚡ SparkFlow Studio - Transform your imagination into reality with AI

Write a prompt, pick a style and an aspect ratio, and FLUX on fal.ai renders it.
Run without arguments to launch the interactive studio.

SETUP:
  Set your fal.ai key via environment variable, a .env file or config:
    export FAL_KEY=your-key-here
    echo FAL_KEY=your-key-here >> .env
    sparkflow config set api.key your-key-here

EXAMPLES:
  Generate an image:
    sparkflow generate "a futuristic cyberpunk detective standing in rain"
    sparkflow g "a red fox in snow" --style anime --ar 1:1

  Keep the composition while tweaking details:
    sparkflow g "a red fox in snow" --seed 42
    sparkflow g "a red fox in snow at night" --seed 42

  List styles and aspect ratios:
    sparkflow styles

  Launch the interactive studio:
    sparkflow"#,
    after_help = r#"CONFIGURATION:
  Config file: ~/.config/sparkflow-studio/config.toml (Linux)
  History lives only as long as the studio session.

  Styles: Cinematic (default), Anime, Photorealistic, 3D Render, Sketch, None
  Aspect ratios: 16:9 (default), 4:3, 1:1, 3:4, 9:16"#
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an image from a text prompt
    ///
    /// Sends the styled prompt to the configured FLUX endpoint and saves a
    /// lossless PNG and a web-ready JPEG of the result.
    #[command(
        alias = "g",
        after_help = r#"EXAMPLES:
  Basic generation:
    sparkflow generate "a red apple on a wooden table"

  Style and aspect ratio:
    sparkflow generate "a castle on a cliff" --style "3D Render" --ar 9:16

  Locked seed:
    sparkflow generate "portrait of an astronaut" --seed 1234

  JSON output:
    sparkflow generate "abstract art" --format json"#
    )]
    Generate(commands::generate::GenerateArgs),

    /// List style presets and aspect ratios
    #[command(alias = "s")]
    Styles(commands::styles::StylesArgs),

    /// View or modify configuration
    ///
    /// Manage the API key and studio defaults.
    /// Changes are saved to the config file immediately.
    #[command(
        alias = "c",
        after_help = r#"EXAMPLES:
  Show all settings:
    sparkflow config show

  Set values:
    sparkflow config set api.key YOUR_API_KEY
    sparkflow config set defaults.style anime
    sparkflow config set defaults.aspect_ratio 1:1
    sparkflow config set defaults.seed_mode locked
    sparkflow config set defaults.seed 42

AVAILABLE SETTINGS:
  api.key               - fal.ai API key (FAL_KEY wins when set)
  api.model             - Model endpoint path
  api.base_url          - Service base URL
  defaults.style        - Default style
  defaults.aspect_ratio - Default aspect ratio
  defaults.seed_mode    - random or locked
  defaults.seed         - Seed used in locked mode (0-999999)
  output.directory      - Where downloads are saved
  output.display        - Preview mode (terminal/none)
  tui.show_tutorial     - Show the welcome guide (true/false)"#
    )]
    Config(commands::config::ConfigArgs),
}
