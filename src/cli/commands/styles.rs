use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::core::{AspectRatio, Style};

#[derive(Args)]
pub struct StylesArgs {
    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn run(args: StylesArgs) -> Result<()> {
    if args.format == "json" {
        let styles: Vec<_> = Style::all()
            .iter()
            .map(|s| serde_json::json!({ "name": s.label(), "suffix": s.suffix() }))
            .collect();
        let ratios: Vec<_> = AspectRatio::all()
            .iter()
            .map(|ar| {
                serde_json::json!({
                    "label": ar.label(),
                    "ratio": ar.ratio(),
                    "image_size": ar.api_value(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "styles": styles,
                "aspect_ratios": ratios,
            }))?
        );
        return Ok(());
    }

    println!("{}", "🎨 Styles".cyan().bold());
    for style in Style::all() {
        let suffix = style.suffix().trim_start_matches(", ");
        let suffix = if suffix.is_empty() {
            "(prompt sent as typed)".dimmed().to_string()
        } else {
            suffix.to_string()
        };
        println!("  {:<16} {}", style.label().bold(), suffix);
    }

    println!();
    println!("{}", "📐 Aspect Ratios".cyan().bold());
    for ar in AspectRatio::all() {
        println!(
            "  {:<6} {:<16} {}",
            ar.ratio().bold(),
            ar.label(),
            ar.api_value().dimmed()
        );
    }

    Ok(())
}
