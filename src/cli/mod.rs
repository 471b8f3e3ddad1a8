pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "foto",
    version,
    about = "📸 AI Photo Studio - Generate and edit images with Google Gemini",
    long_about = r#"📸 AI Photo Studio - Generate and edit images with Google Gemini

Generate images from text prompts or apply semantic edits to existing
photos. Run without arguments to launch the interactive studio TUI.

SETUP:
  Set your API key via environment variable, config, or the key flow:
    export GEMINI_API_KEY=your-key-here
    foto config set api.key your-key-here
    foto key connect

EXAMPLES:
  Generate an image:
    foto generate "a lighthouse at dusk, oil painting"
    foto g "minimalist logo" --size 2K --format json

  Edit an existing image:
    foto edit photo.png "add a rainbow in the sky"
    foto e portrait.jpg "make it look like a watercolor painting"

  Check or connect your API key:
    foto key status
    foto key connect

  Manage configuration:
    foto config show
    foto config set defaults.size 2K

  Launch the interactive studio:
    foto

OUTPUT FORMATS:
  --format text   Human-readable output (default)
  --format json   Machine-readable JSON
  --format quiet  Minimal output, just the file path

Uploaded images must be 5 MiB or smaller."#,
    after_help = r#"CONFIGURATION:
  Config file: ~/.config/foto/config.toml (macOS/Linux)

  Models:
    - gemini-3-pro-image-preview (generation, default)
    - gemini-2.5-flash-image (editing, default)

  Sizes: 1K (default), 2K, 4K"#
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a new image from a text prompt
    ///
    /// Creates an image from your description at the requested output size.
    /// The result is saved to the configured output directory by default.
    #[command(
        alias = "g",
        after_help = r#"EXAMPLES:
  Basic generation:
    foto generate "a red apple on a wooden table"

  High resolution:
    foto generate "detailed portrait" --size 4K

  JSON output:
    foto generate "abstract art" --format json

  Custom output directory:
    foto generate "logo design" --output ./logos

A nonzero exit with "did not return an image" means the model answered
without producing an image; it is not a transport failure."#
    )]
    Generate(commands::generate::GenerateArgs),

    /// Edit an existing image using a text instruction
    ///
    /// Describe what you want to change and the model applies the edit
    /// while preserving the rest of the image. Input images are limited
    /// to 5 MiB.
    #[command(
        alias = "e",
        after_help = r#"EXAMPLES:
  Add elements:
    foto edit photo.png "add sunglasses to the person"

  Change style:
    foto edit image.jpg "convert to pencil sketch style"

  Remove elements:
    foto edit room.jpg "remove the chair in the corner""#
    )]
    Edit(commands::edit::EditArgs),

    /// Check or connect your API credential
    ///
    /// `status` probes for an existing key; `connect` runs the one-shot
    /// selection flow and persists the entered key to the config file.
    #[command(
        alias = "k",
        after_help = r#"EXAMPLES:
  Check whether a key is configured:
    foto key status

  Enter and persist a key:
    foto key connect"#
    )]
    Key(commands::key::KeyArgs),

    /// View or modify configuration
    ///
    /// Manage API keys, models, and output settings.
    /// Changes are saved to the config file immediately.
    #[command(
        alias = "c",
        after_help = r#"EXAMPLES:
  Show all settings:
    foto config show

  Set values:
    foto config set api.key YOUR_API_KEY
    foto config set defaults.size 2K
    foto config set output.directory ~/Pictures/foto

  Reset to defaults:
    foto config reset --force

AVAILABLE SETTINGS:
  api.key            - Gemini API key
  api.generate_model - Model for text-to-image generation
  api.edit_model     - Model for image editing
  api.base_url       - API base URL
  defaults.size      - Default image size (1K, 2K, 4K)
  output.directory   - Where to save images
  output.auto_save   - Save results automatically (true/false)
  output.preview     - Render results in the terminal (true/false)"#
    )]
    Config(commands::config::ConfigArgs),
}
