use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::app::{App, AppMode, EditorField, ResultPanel, SettingsField};
use crate::core::ImageSize;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    match app.mode {
        AppMode::Generator => draw_generator(frame, app),
        AppMode::Editor => draw_editor(frame, app),
        AppMode::Settings => draw_settings(frame, app),
    }
}

fn draw_generator(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Length(4), // Prompt
            Constraint::Length(3), // Size selector
            Constraint::Min(8),    // Result panel
            Constraint::Length(3), // Status
            Constraint::Length(2), // Help
        ])
        .split(frame.area());

    draw_tabs(frame, app, chunks[0]);

    let prompt_title = if app.typing {
        "Prompt (Enter to generate, Esc to stop typing)"
    } else {
        "Prompt (i to type)"
    };
    let prompt = Paragraph::new(app.gen_prompt.as_str())
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if app.typing {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::DarkGray)
                })
                .title(prompt_title),
        );
    frame.render_widget(prompt, chunks[1]);

    draw_size_selector(frame, app, chunks[2]);
    draw_result_panel(frame, &app.gen_result, chunks[3]);
    draw_status(frame, app, chunks[4]);

    let help = if app.typing {
        "Enter: Generate | Esc: Stop typing"
    } else {
        "i: Prompt | s: Size | Enter: Generate | Tab: Editor | c: Settings | q: Quit"
    };
    draw_help(frame, help, chunks[5]);
}

fn draw_editor(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Length(3), // Image path
            Constraint::Length(4), // Instruction
            Constraint::Min(8),    // Result panel
            Constraint::Length(3), // Status
            Constraint::Length(2), // Help
        ])
        .split(frame.area());

    draw_tabs(frame, app, chunks[0]);

    let path_focused = app.typing && app.edit_field == EditorField::ImagePath;
    let path = Paragraph::new(app.edit_path.as_str())
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if path_focused {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::DarkGray)
                })
                .title("Image path, 5 MiB max (p to type)"),
        );
    frame.render_widget(path, chunks[1]);

    let instruction_focused = app.typing && app.edit_field == EditorField::Instruction;
    let instruction = Paragraph::new(app.edit_instruction.as_str())
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if instruction_focused {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::DarkGray)
                })
                .title("Edit instruction (i to type)"),
        );
    frame.render_widget(instruction, chunks[2]);

    draw_result_panel(frame, &app.edit_result, chunks[3]);
    draw_status(frame, app, chunks[4]);

    let help = if app.typing {
        "Enter: Next/Confirm | Esc: Stop typing"
    } else {
        "p: Path | i: Instruction | Enter: Edit | Tab: Generator | c: Settings | q: Quit"
    };
    draw_help(frame, help, chunks[5]);
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let active = Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD);
    let inactive = Style::default().fg(Color::Gray);

    let (gen_style, edit_style) = match app.mode {
        AppMode::Editor => (inactive, active),
        _ => (active, inactive),
    };

    let tabs = Paragraph::new(vec![Line::from(vec![
        Span::styled("📸 AI Photo Studio", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled("Pro Generator", gen_style),
        Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
        Span::styled("Magic Editor", edit_style),
    ])])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );
    frame.render_widget(tabs, area);
}

fn draw_size_selector(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled("Quality: ", Style::default().fg(Color::Gray))];
    for size in [ImageSize::OneK, ImageSize::TwoK, ImageSize::FourK] {
        let style = if size == app.gen_size {
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", size.as_str()), style));
    }
    spans.push(Span::styled(
        "  (s to cycle; higher sizes take longer)",
        Style::default().fg(Color::DarkGray),
    ));

    let selector = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Size"));
    frame.render_widget(selector, area);
}

fn draw_result_panel(frame: &mut Frame, result: &ResultPanel, area: Rect) {
    let lines = match result {
        ResultPanel::Empty => vec![Line::from(Span::styled(
            "The result will appear here.",
            Style::default().fg(Color::DarkGray),
        ))],
        ResultPanel::InFlight => vec![Line::from(Span::styled(
            "Working... this can take a while for larger sizes.",
            Style::default().fg(Color::Yellow),
        ))],
        ResultPanel::Saved { path, dimensions } => {
            let mut lines = vec![Line::from(vec![
                Span::styled("✓ Saved: ", Style::default().fg(Color::Green)),
                Span::styled(path.clone(), Style::default().fg(Color::White)),
            ])];
            if let Some((w, h)) = dimensions {
                lines.push(Line::from(Span::styled(
                    format!("  {}x{}", w, h),
                    Style::default().fg(Color::Gray),
                )));
            }
            lines
        }
        ResultPanel::Received { mime_type } => vec![Line::from(Span::styled(
            format!("✓ Image received ({mime_type}); auto save is off."),
            Style::default().fg(Color::Green),
        ))],
        ResultPanel::NoImage => vec![Line::from(Span::styled(
            "The model did not return an image. Try a different instruction.",
            Style::default().fg(Color::Yellow),
        ))],
        ResultPanel::Failed {
            message,
            credential_hint,
        } => {
            let mut lines = vec![Line::from(Span::styled(
                format!("✗ {message}"),
                Style::default().fg(Color::Red),
            ))];
            if *credential_hint {
                lines.push(Line::from(Span::styled(
                    "Your API key may be missing or invalid. Run: foto key connect",
                    Style::default().fg(Color::Yellow),
                )));
            }
            lines
        }
    };

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Result"));
    frame.render_widget(panel, area);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let (message, style) = if let Some(status) = &app.status_message {
        (status.as_str(), Style::default().fg(Color::Yellow))
    } else if app.in_flight {
        ("Request in flight...", Style::default().fg(Color::Yellow))
    } else {
        ("Ready", Style::default().fg(Color::Gray))
    };

    let status = Paragraph::new(message)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, area);
}

fn draw_help(frame: &mut Frame, text: &str, area: Rect) {
    let help = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}

/// Draw settings screen
fn draw_settings(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Settings list
            Constraint::Length(3), // Status
            Constraint::Length(2), // Help
        ])
        .split(frame.area());

    let header = Paragraph::new("Settings")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let fields = SettingsField::all();
    let items: Vec<ListItem> = fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let is_selected = i == app.settings_selected;
            let value = if app.settings_editing && is_selected {
                format!("{}▏", app.settings_edit_buffer)
            } else {
                app.get_settings_value(field)
            };

            let has_options = app.get_settings_options(field).is_some();
            let hint = if has_options { " [Enter cycles]" } else { "" };

            let content = Line::from(vec![
                Span::styled(
                    format!("{:<20}", field.label()),
                    if is_selected {
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    },
                ),
                Span::styled(
                    format!("{}{}", value, hint),
                    if is_selected && app.settings_editing {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default().fg(Color::Gray)
                    },
                ),
            ]);

            ListItem::new(content)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray));
    frame.render_widget(list, chunks[1]);

    draw_status(frame, app, chunks[2]);

    let help_text = if app.settings_editing {
        "Enter: Save | Esc: Cancel"
    } else {
        "↑↓: Navigate | Enter/Space: Edit/Cycle | Esc/q: Back"
    };
    draw_help(frame, help_text, chunks[3]);
}
