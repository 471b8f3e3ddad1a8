use anyhow::Result;

use crate::config::Config;
use crate::core::ImageSize;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Text-to-image surface
    Generator,
    /// Image-edit surface
    Editor,
    /// Settings screen
    Settings,
}

/// Which editor field receives typed input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    ImagePath,
    Instruction,
}

/// What the result panel of a surface currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPanel {
    Empty,
    InFlight,
    Saved {
        path: String,
        dimensions: Option<(u32, u32)>,
    },
    /// Received but not written to disk (auto_save off)
    Received {
        mime_type: String,
    },
    /// The API answered without producing an image. Not a failure.
    NoImage,
    Failed {
        message: String,
        credential_hint: bool,
    },
}

/// Settings field being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    GenerateModel,
    EditModel,
    Size,
    OutputDirectory,
    AutoSave,
    Preview,
}

impl SettingsField {
    pub fn all() -> &'static [SettingsField] {
        &[
            SettingsField::GenerateModel,
            SettingsField::EditModel,
            SettingsField::Size,
            SettingsField::OutputDirectory,
            SettingsField::AutoSave,
            SettingsField::Preview,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SettingsField::GenerateModel => "Generate Model",
            SettingsField::EditModel => "Edit Model",
            SettingsField::Size => "Size",
            SettingsField::OutputDirectory => "Output Directory",
            SettingsField::AutoSave => "Auto Save",
            SettingsField::Preview => "Terminal Preview",
        }
    }

    pub fn config_key(&self) -> &'static str {
        match self {
            SettingsField::GenerateModel => "api.generate_model",
            SettingsField::EditModel => "api.edit_model",
            SettingsField::Size => "defaults.size",
            SettingsField::OutputDirectory => "output.directory",
            SettingsField::AutoSave => "output.auto_save",
            SettingsField::Preview => "output.preview",
        }
    }
}

/// TUI application state
pub struct App {
    /// Current mode
    pub mode: AppMode,

    /// Configuration
    pub config: Config,

    /// Whether config was changed
    pub config_changed: bool,

    /// Generator surface: prompt input
    pub gen_prompt: String,

    /// Generator surface: requested output size
    pub gen_size: ImageSize,

    /// Generator surface: result panel
    pub gen_result: ResultPanel,

    /// Editor surface: image path input
    pub edit_path: String,

    /// Editor surface: instruction input
    pub edit_instruction: String,

    /// Editor surface: focused field
    pub edit_field: EditorField,

    /// Editor surface: result panel
    pub edit_result: ResultPanel,

    /// Whether typed characters go into the focused input
    pub typing: bool,

    /// One request per surface: submissions are inert while this is set
    pub in_flight: bool,

    /// Status line message
    pub status_message: Option<String>,

    /// Whether to quit
    pub should_quit: bool,

    /// Settings: selected field index
    pub settings_selected: usize,

    /// Settings: currently editing
    pub settings_editing: bool,

    /// Settings: edit buffer
    pub settings_edit_buffer: String,
}

impl App {
    pub fn new(config: Config) -> Self {
        let gen_size = config.defaults.size.parse().unwrap_or_default();
        Self {
            mode: AppMode::Generator,
            config,
            config_changed: false,
            gen_prompt: String::new(),
            gen_size,
            gen_result: ResultPanel::Empty,
            edit_path: String::new(),
            edit_instruction: String::new(),
            edit_field: EditorField::ImagePath,
            edit_result: ResultPanel::Empty,
            typing: false,
            in_flight: false,
            status_message: None,
            should_quit: false,
            settings_selected: 0,
            settings_editing: false,
            settings_edit_buffer: String::new(),
        }
    }

    /// Set status message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Cycle the generator size through 1K -> 2K -> 4K
    pub fn cycle_size(&mut self) {
        self.gen_size = match self.gen_size {
            ImageSize::OneK => ImageSize::TwoK,
            ImageSize::TwoK => ImageSize::FourK,
            ImageSize::FourK => ImageSize::OneK,
        };
    }

    /// Switch between the two studio surfaces
    pub fn toggle_surface(&mut self) {
        self.mode = match self.mode {
            AppMode::Generator => AppMode::Editor,
            _ => AppMode::Generator,
        };
        self.typing = false;
    }

    /// Buffer receiving typed input for the active surface
    pub fn active_input_mut(&mut self) -> &mut String {
        match self.mode {
            AppMode::Editor => match self.edit_field {
                EditorField::ImagePath => &mut self.edit_path,
                EditorField::Instruction => &mut self.edit_instruction,
            },
            _ => &mut self.gen_prompt,
        }
    }

    /// Get current settings value
    pub fn get_settings_value(&self, field: &SettingsField) -> String {
        self.config.get(field.config_key()).unwrap_or_default()
    }

    /// Set settings value
    pub fn set_settings_value(&mut self, field: &SettingsField, value: &str) -> Result<()> {
        self.config.set(field.config_key(), value)?;
        if *field == SettingsField::Size {
            self.gen_size = value.parse().unwrap_or_default();
        }
        self.config_changed = true;
        Ok(())
    }

    /// Get options for a settings field (if applicable)
    pub fn get_settings_options(&self, field: &SettingsField) -> Option<Vec<&'static str>> {
        match field {
            SettingsField::GenerateModel | SettingsField::EditModel => {
                Some(Config::models().to_vec())
            }
            SettingsField::Size => Some(Config::sizes().to_vec()),
            SettingsField::AutoSave | SettingsField::Preview => Some(vec!["true", "false"]),
            SettingsField::OutputDirectory => None,
        }
    }

    /// Cycle to next option for a settings field
    pub fn cycle_settings_option(&mut self, field: &SettingsField) -> Result<()> {
        if let Some(options) = self.get_settings_options(field) {
            let current = self.get_settings_value(field);
            let current_idx = options.iter().position(|&o| o == current).unwrap_or(0);
            let next_idx = (current_idx + 1) % options.len();
            self.set_settings_value(field, options[next_idx])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_cycles_through_all_variants() {
        let mut app = App::new(Config::default());
        assert_eq!(app.gen_size, ImageSize::OneK);
        app.cycle_size();
        assert_eq!(app.gen_size, ImageSize::TwoK);
        app.cycle_size();
        assert_eq!(app.gen_size, ImageSize::FourK);
        app.cycle_size();
        assert_eq!(app.gen_size, ImageSize::OneK);
    }

    #[test]
    fn surface_toggle_leaves_typing_mode() {
        let mut app = App::new(Config::default());
        app.typing = true;
        app.toggle_surface();
        assert_eq!(app.mode, AppMode::Editor);
        assert!(!app.typing);
    }

    #[test]
    fn settings_cycle_marks_config_changed() {
        let mut app = App::new(Config::default());
        app.cycle_settings_option(&SettingsField::Size).unwrap();
        assert!(app.config_changed);
        assert_eq!(app.config.defaults.size, "2K");
        assert_eq!(app.gen_size, ImageSize::TwoK);
    }
}
