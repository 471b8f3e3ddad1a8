use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::path::{Path, PathBuf};

use super::app::{App, AppMode, EditorField, ResultPanel, SettingsField};
use crate::api::GeminiClient;
use crate::core::{image, EditRequest, GenerateRequest, ImagePayload, StudioError};
use crate::output;

/// Handle input on the generator surface
pub async fn handle_generator_input(app: &mut App, key: KeyEvent) -> Result<()> {
    if app.typing {
        handle_typing(app, key).await?;
        return Ok(());
    }

    match key.code {
        KeyCode::Char('i') | KeyCode::Char('/') => {
            app.typing = true;
            app.clear_status();
        }
        KeyCode::Char('s') => app.cycle_size(),
        KeyCode::Tab => app.toggle_surface(),
        KeyCode::Char('c') => open_settings(app),
        KeyCode::Enter => submit_generate(app).await,
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
    Ok(())
}

/// Handle input on the editor surface
pub async fn handle_editor_input(app: &mut App, key: KeyEvent) -> Result<()> {
    if app.typing {
        handle_typing(app, key).await?;
        return Ok(());
    }

    match key.code {
        KeyCode::Char('p') => {
            app.edit_field = EditorField::ImagePath;
            app.typing = true;
            app.clear_status();
        }
        KeyCode::Char('i') | KeyCode::Char('/') => {
            app.edit_field = EditorField::Instruction;
            app.typing = true;
            app.clear_status();
        }
        KeyCode::Tab => app.toggle_surface(),
        KeyCode::Char('c') => open_settings(app),
        KeyCode::Enter => submit_edit(app).await,
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
    Ok(())
}

/// Typed input goes to the focused buffer. Enter submits on the generator
/// and confirms the field on the editor; Esc leaves typing mode.
async fn handle_typing(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc => app.typing = false,

        KeyCode::Enter => {
            app.typing = false;
            match app.mode {
                AppMode::Generator => submit_generate(app).await,
                AppMode::Editor if app.edit_field == EditorField::ImagePath => {
                    // Move on to the instruction
                    app.edit_field = EditorField::Instruction;
                    app.typing = true;
                }
                _ => {}
            }
        }

        KeyCode::Char(c) => {
            app.active_input_mut().push(c);
        }

        KeyCode::Backspace => {
            app.active_input_mut().pop();
        }

        _ => {}
    }
    Ok(())
}

fn open_settings(app: &mut App) {
    app.mode = AppMode::Settings;
    app.settings_selected = 0;
    app.settings_editing = false;
}

/// Handle input in settings mode
pub fn handle_settings_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let fields = SettingsField::all();

    if app.settings_editing {
        match key.code {
            KeyCode::Esc => {
                app.settings_editing = false;
                app.settings_edit_buffer.clear();
            }

            KeyCode::Enter => {
                let field = fields[app.settings_selected];
                let value = app.settings_edit_buffer.clone();
                if let Err(e) = app.set_settings_value(&field, &value) {
                    app.set_status(e.to_string());
                } else {
                    app.set_status(format!("Updated {}", field.label()));
                }
                app.settings_editing = false;
                app.settings_edit_buffer.clear();
            }

            KeyCode::Char(c) => {
                app.settings_edit_buffer.push(c);
            }

            KeyCode::Backspace => {
                app.settings_edit_buffer.pop();
            }

            _ => {}
        }
    } else {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if app.settings_selected > 0 {
                    app.settings_selected -= 1;
                }
            }

            KeyCode::Down | KeyCode::Char('j') => {
                if app.settings_selected < fields.len() - 1 {
                    app.settings_selected += 1;
                }
            }

            KeyCode::Enter | KeyCode::Char(' ') => {
                let field = &fields[app.settings_selected];

                if app.get_settings_options(field).is_some() {
                    app.cycle_settings_option(field)?;
                    app.set_status(format!("Updated {}", field.label()));
                } else {
                    app.settings_editing = true;
                    app.settings_edit_buffer = app.get_settings_value(field);
                }
            }

            KeyCode::Esc | KeyCode::Char('q') => {
                app.mode = AppMode::Generator;
                app.clear_status();
            }

            _ => {}
        }
    }
    Ok(())
}

/// Submit the generator surface. Inert while a request is in flight; the
/// call is awaited inline on the UI task.
async fn submit_generate(app: &mut App) {
    if app.in_flight {
        return;
    }
    if app.gen_prompt.trim().is_empty() {
        app.set_status("Enter a prompt first (i)");
        return;
    }

    app.in_flight = true;
    app.gen_result = ResultPanel::InFlight;
    app.clear_status();

    let request = GenerateRequest::new(app.gen_prompt.clone(), app.gen_size);

    let outcome = match GeminiClient::from_config(&app.config) {
        Ok(client) => client.generate(&request).await,
        Err(e) => Err(e),
    };

    let prefix = format!("generated-{}", app.gen_size.as_str().to_lowercase());
    app.gen_result = resolve_outcome(app, outcome, &prefix).await;
    app.in_flight = false;
}

/// Submit the editor surface: validate and load the file, then call the API.
async fn submit_edit(app: &mut App) {
    if app.in_flight {
        return;
    }
    if app.edit_path.trim().is_empty() {
        app.set_status("Set an image path first (p)");
        return;
    }
    if app.edit_instruction.trim().is_empty() {
        app.set_status("Enter an edit instruction first (i)");
        return;
    }

    app.in_flight = true;
    app.edit_result = ResultPanel::InFlight;
    app.clear_status();

    let path = PathBuf::from(app.edit_path.trim());
    let payload = match image::load_image_payload(&path).await {
        Ok(payload) => payload,
        Err(e) => {
            app.edit_result = ResultPanel::Failed {
                message: e.to_string(),
                credential_hint: false,
            };
            app.in_flight = false;
            return;
        }
    };

    let request = EditRequest::new(payload, app.edit_instruction.clone());

    let outcome = match GeminiClient::from_config(&app.config) {
        Ok(client) => client.edit(&request).await,
        Err(e) => Err(e),
    };

    app.edit_result = resolve_outcome(app, outcome, "edited").await;
    app.in_flight = false;
}

/// Map an adapter outcome onto the result panel, saving to disk when
/// auto_save is on. "No image" gets its own non-alarming panel state.
async fn resolve_outcome(
    app: &App,
    outcome: Result<Option<ImagePayload>, StudioError>,
    prefix: &str,
) -> ResultPanel {
    match outcome {
        Ok(Some(payload)) => {
            if !app.config.output.auto_save {
                return ResultPanel::Received {
                    mime_type: payload.mime_type,
                };
            }
            let output_dir = Path::new(&app.config.output.directory);
            match output::save_payload(&payload, output_dir, prefix).await {
                Ok(saved) => ResultPanel::Saved {
                    path: saved.path.display().to_string(),
                    dimensions: saved.dimensions,
                },
                Err(e) => ResultPanel::Failed {
                    message: format!("Save failed: {e}"),
                    credential_hint: false,
                },
            }
        }
        Ok(None) => ResultPanel::NoImage,
        Err(e) => ResultPanel::Failed {
            credential_hint: e.is_credential_error(),
            message: e.to_string(),
        },
    }
}
