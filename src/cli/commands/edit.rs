use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::GeminiClient;
use crate::config::Config;
use crate::core::{image, EditRequest};
use crate::output;

#[derive(Args)]
pub struct EditArgs {
    /// Path to the image to edit (5 MiB max)
    #[arg(required = true)]
    pub image: PathBuf,

    /// The edit instruction (e.g., "make the sky blue", "add a hat")
    #[arg(required = true)]
    pub prompt: String,

    /// Model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Output directory for the edited image
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Don't save the image to disk
    #[arg(long)]
    pub no_save: bool,

    /// Output format (text, json, quiet)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub async fn run(args: EditArgs, config: &Config) -> Result<()> {
    let config = super::ensure_key(config)?;

    // Upload validation happens before anything touches the network
    let image_path = args.image.canonicalize().context("Image file not found")?;
    let payload = image::load_image_payload(&image_path).await?;

    let request = EditRequest::new(payload, &args.prompt);

    let mut client = GeminiClient::from_config(&config)?;
    if let Some(model) = &args.model {
        client.set_edit_model(model);
    }

    // Show progress
    let pb = if args.format == "text" {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.yellow} {msg}")
                .unwrap(),
        );
        pb.set_message("Editing image...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = match client.edit(&request).await {
        Ok(result) => result,
        Err(e) => {
            if let Some(pb) = pb {
                pb.finish_with_message(format!("{} Edit failed", "✗".red()));
            }
            super::report_failure(&e, &args.format);
            return Err(e.into());
        }
    };

    let Some(result) = result else {
        if let Some(pb) = pb {
            pb.finish_with_message(format!("{} No image produced", "∅".yellow()));
        }
        match args.format.as_str() {
            "json" => println!("{}", json!({"status": "no_image"})),
            "quiet" => {}
            _ => println!(
                "{}",
                "The model did not return an image. Try a different instruction.".yellow()
            ),
        }
        std::process::exit(super::NO_IMAGE_EXIT_CODE);
    };

    // --output forces a save even when auto_save is off
    if args.no_save || (!config.output.auto_save && args.output.is_none()) {
        if let Some(pb) = &pb {
            pb.finish_with_message(format!("{} Edit complete (not saved)", "✓".green()));
        }
        match args.format.as_str() {
            "json" => println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "status": "ok",
                    "saved": false,
                    "mime_type": result.mime_type,
                    "data_uri": result.to_data_uri(),
                }))?
            ),
            "quiet" => println!("{}", result.to_data_uri()),
            _ => println!(
                "{}: {} base64 characters ({})",
                "Result".cyan().bold(),
                result.data.len(),
                result.mime_type
            ),
        }
        return Ok(());
    }

    let output_dir = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.output.directory));
    let saved = output::save_payload(&result, &output_dir, "edited").await?;

    if let Some(pb) = &pb {
        pb.finish_with_message(format!("{} Edit complete", "✓".green()));
    }

    match args.format.as_str() {
        "json" => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "status": "ok",
                    "source": image_path,
                    "instruction": args.prompt,
                    "mime_type": result.mime_type,
                    "path": saved.path,
                    "width": saved.dimensions.map(|d| d.0),
                    "height": saved.dimensions.map(|d| d.1),
                }))?
            );
        }
        "quiet" => {
            println!("{}", saved.path.display());
        }
        _ => {
            println!();
            println!("{}: {}", "Source".cyan().bold(), image_path.display());
            println!("{}: {}", "Edit".cyan().bold(), args.prompt);
            if let Some((w, h)) = saved.dimensions {
                println!("{}: {}x{}", "Dimensions".cyan().bold(), w, h);
            }
            println!("{}: {}", "Saved".cyan().bold(), saved.path.display());

            if config.output.preview {
                println!();
                output::preview_terminal(&saved.path);
            }
        }
    }

    Ok(())
}
