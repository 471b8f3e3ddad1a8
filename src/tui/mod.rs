mod app;
mod event_handler;
mod ui;

use anyhow::Result;
use colored::Colorize;
use crossterm::{
    event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use crate::config::Config;
use crate::core::StudioError;
use crate::credentials::{HostCredentials, KeyAvailability, KeyGate};

pub use app::{App, AppMode};

/// Run the TUI application. Key availability is checked before the
/// alternate screen is entered; without a key the studio never starts.
pub async fn run(config: &mut Config) -> Result<()> {
    let mut gate = KeyGate::new(HostCredentials::detect(config));
    if gate.check_availability() == KeyAvailability::Unavailable {
        eprintln!("{} No API key configured.", "!".yellow().bold());
        if gate.request_selection() == KeyAvailability::Unavailable {
            return Err(StudioError::MissingApiKey.into());
        }
        // Selection persisted the key; pick it up
        *config = Config::load_or_create()?;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.clone());

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Save config if changed
    if app.config_changed {
        *config = app.config.clone();
        config.save()?;
    }

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| ui::draw(f, app))?;

        // Handle events
        if poll(Duration::from_millis(100))? {
            if let Event::Key(key) = read()? {
                // Global quit shortcut
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                match app.mode {
                    AppMode::Generator => event_handler::handle_generator_input(app, key).await?,
                    AppMode::Editor => event_handler::handle_editor_input(app, key).await?,
                    AppMode::Settings => event_handler::handle_settings_input(app, key)?,
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
