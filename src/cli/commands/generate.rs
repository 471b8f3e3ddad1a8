use anyhow::Result;
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::GeminiClient;
use crate::config::Config;
use crate::core::{GenerateRequest, ImageSize};
use crate::output;

#[derive(Args)]
pub struct GenerateArgs {
    /// The prompt describing the image to generate
    #[arg(required = true)]
    pub prompt: String,

    /// Image size (1K, 2K, 4K)
    #[arg(short, long)]
    pub size: Option<String>,

    /// Model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Output directory for the generated image
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Don't save the image to disk
    #[arg(long)]
    pub no_save: bool,

    /// Output format (text, json, quiet)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub async fn run(args: GenerateArgs, config: &Config) -> Result<()> {
    let config = super::ensure_key(config)?;

    let size: ImageSize = args
        .size
        .as_deref()
        .unwrap_or(&config.defaults.size)
        .parse()?;
    let request = GenerateRequest::new(&args.prompt, size);

    let mut client = GeminiClient::from_config(&config)?;
    if let Some(model) = &args.model {
        client.set_generate_model(model);
    }

    // Show progress
    let pb = if args.format == "text" {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.yellow} {msg}")
                .unwrap(),
        );
        pb.set_message(format!("Generating image ({})...", size));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let payload = match client.generate(&request).await {
        Ok(result) => result,
        Err(e) => {
            if let Some(pb) = pb {
                pb.finish_with_message(format!("{} Generation failed", "✗".red()));
            }
            super::report_failure(&e, &args.format);
            return Err(e.into());
        }
    };

    let Some(payload) = payload else {
        if let Some(pb) = pb {
            pb.finish_with_message(format!("{} No image produced", "∅".yellow()));
        }
        match args.format.as_str() {
            "json" => println!("{}", json!({"status": "no_image"})),
            "quiet" => {}
            _ => println!(
                "{}",
                "The model did not return an image. Try a different prompt.".yellow()
            ),
        }
        std::process::exit(super::NO_IMAGE_EXIT_CODE);
    };

    // --output forces a save even when auto_save is off
    if args.no_save || (!config.output.auto_save && args.output.is_none()) {
        if let Some(pb) = &pb {
            pb.finish_with_message(format!("{} Image generated (not saved)", "✓".green()));
        }
        match args.format.as_str() {
            "json" => println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "status": "ok",
                    "saved": false,
                    "mime_type": payload.mime_type,
                    "data_uri": payload.to_data_uri(),
                }))?
            ),
            "quiet" => println!("{}", payload.to_data_uri()),
            _ => println!(
                "{}: {} base64 characters ({})",
                "Result".cyan().bold(),
                payload.data.len(),
                payload.mime_type
            ),
        }
        return Ok(());
    }

    let output_dir = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.output.directory));
    let prefix = format!("generated-{}", size.as_str().to_lowercase());
    let saved = output::save_payload(&payload, &output_dir, &prefix).await?;

    if let Some(pb) = &pb {
        pb.finish_with_message(format!("{} Image generated", "✓".green()));
    }

    match args.format.as_str() {
        "json" => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "status": "ok",
                    "prompt": args.prompt,
                    "size": size.as_str(),
                    "mime_type": payload.mime_type,
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
            println!("{}: {}", "Prompt".cyan().bold(), args.prompt);
            println!("{}: {}", "Size".cyan().bold(), size);
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
