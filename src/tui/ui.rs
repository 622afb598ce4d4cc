use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::app::{App, AppMode, SidebarField};

const ACCENT: Color = Color::Rgb(255, 75, 75);

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(12),   // Body
            Constraint::Length(3), // Status bar
            Constraint::Length(1), // Help line
        ])
        .split(frame.area());

    draw_title(frame, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(38), Constraint::Min(40)])
        .split(chunks[1]);

    draw_sidebar(frame, app, body[0]);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Prompt
            Constraint::Min(6),    // Latest result
            Constraint::Length(8), // Gallery
        ])
        .split(body[1]);

    draw_prompt(frame, app, main[0]);
    draw_result(frame, app, main[1]);
    draw_gallery(frame, app, main[2]);

    draw_status(frame, app, chunks[2]);
    draw_help(frame, app, chunks[3]);

    if app.mode == AppMode::Tutorial {
        draw_tutorial(frame);
    }
}

fn draw_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(vec![Line::from(vec![
        Span::styled("⚡ ", Style::default()),
        Span::styled(
            "SparkFlow Studio",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " - Transform your imagination into reality with AI.",
            Style::default().fg(Color::Gray),
        ),
    ])])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT)),
    );
    frame.render_widget(title, area);
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.mode == AppMode::Sidebar;
    let mut lines = Vec::new();

    for (i, field) in SidebarField::all().iter().enumerate() {
        let is_selected = focused && i == app.sidebar_selected;
        let disabled = *field == SidebarField::Seed && !app.lock_seed;

        let value = if app.seed_editing && *field == SidebarField::Seed {
            format!("{}▏", app.seed_edit_buffer)
        } else {
            app.sidebar_value(*field)
        };

        let label_style = if is_selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let value_style = if disabled {
            Style::default().fg(Color::DarkGray)
        } else if is_selected && app.seed_editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };

        lines.push(Line::from(Span::styled(field.label(), label_style)));
        let hint = if is_selected && *field != SidebarField::Seed {
            " [←→]"
        } else {
            ""
        };
        lines.push(Line::from(Span::styled(format!("  {}{}", value, hint), value_style)));
        lines.push(Line::from(""));
    }

    if focused {
        lines.push(Line::from(Span::styled(
            app.selected_sidebar_field().help(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let sidebar = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if focused {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                })
                .title("⚙️ Studio Settings"),
        );
    frame.render_widget(sidebar, area);
}

fn draw_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.mode == AppMode::Input;
    let text = if app.input.is_empty() && !editing {
        Span::styled(
            "E.g., A futuristic cyberpunk detective standing in rain...",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::styled(app.input.as_str(), Style::default().fg(Color::White))
    };

    let title = if editing {
        "✍️ Describe your vision (Enter to generate, Esc to stop editing)"
    } else {
        "✍️ Describe your vision"
    };

    let input = Paragraph::new(Line::from(text))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if editing {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                })
                .title(title),
        );
    frame.render_widget(input, area);

    if editing {
        let (col, row) = cursor_offset(app.cursor_pos, area.width.saturating_sub(2));
        let row = row.min(area.height.saturating_sub(3));
        frame.set_cursor_position((
            area.x.saturating_add(1 + col),
            area.y.saturating_add(1 + row),
        ));
    }
}

/// Column and row of a character offset in a wrapped box of `inner_width`
fn cursor_offset(cursor_pos: usize, inner_width: u16) -> (u16, u16) {
    let width = usize::from(inner_width.max(1));
    let col = u16::try_from(cursor_pos % width).unwrap_or(0);
    let row = u16::try_from(cursor_pos / width).unwrap_or(u16::MAX);
    (col, row)
}

fn draw_result(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("🖼️ Result");

    if app.generating {
        let busy = Paragraph::new("🎨 AI is crafting your masterpiece...")
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .block(block);
        frame.render_widget(busy, area);
        return;
    }

    let Some(latest) = app.session.history().latest() else {
        let waiting = Paragraph::new("👈 Waiting for your creativity...")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        frame.render_widget(waiting, area);
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Prompt: ", Style::default().fg(Color::Gray)),
            Span::styled(&latest.raw_prompt, Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled("Image: ", Style::default().fg(Color::Gray)),
            Span::styled(&latest.image_url, Style::default().fg(Color::Cyan)),
        ]),
        Line::from(Span::styled(
            latest.caption(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
    ];

    if let Some(downloads) = &app.downloads {
        let (w, h) = downloads.dimensions();
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("⬇️ ", Style::default()),
            Span::styled(
                format!("h: High-Res (PNG, {}x{})", w, h),
                Style::default().fg(Color::Green),
            ),
            Span::raw("   "),
            Span::styled("w: Web Ready (JPG)", Style::default().fg(Color::Green)),
        ]));
    }

    let result = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(result, area);
}

fn draw_gallery(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .session
        .history()
        .all()
        .skip(1)
        .map(|record| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("🌱 Seed: {:<8}", record.seed), Style::default().fg(Color::White)),
                Span::raw(" "),
                Span::styled(format!("{:<15}", record.style.label()), Style::default().fg(Color::Gray)),
                Span::raw(" "),
                Span::styled(record.prompt_preview(40), Style::default().fg(Color::White)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("🕰️ Session History ({})", app.gallery_len())),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    // Offset is recomputed each frame so the selection stays in view
    let mut state = ListState::default();
    if app.gallery_len() > 0 {
        state.select(Some(app.selected_history));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let (message, style) = if app.generating {
        ("Generating...", Style::default().fg(Color::Yellow))
    } else if let Some(err) = &app.error_message {
        (err.as_str(), Style::default().fg(Color::Red))
    } else if let Some(status) = &app.status_message {
        (status.as_str(), Style::default().fg(Color::Green))
    } else {
        ("Ready", Style::default().fg(Color::Gray))
    };

    let status = Paragraph::new(message)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, area);
}

fn draw_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match app.mode {
        AppMode::Input => "Enter: Generate | Esc: Done".to_string(),
        AppMode::Sidebar if app.seed_editing => "Enter: Save | Esc: Cancel".to_string(),
        AppMode::Sidebar => "↑↓: Navigate | ←→/Space: Change | Enter: Edit seed | Esc: Back".to_string(),
        AppMode::Tutorial => "Enter: Got it, Let's Create!".to_string(),
        AppMode::Main => {
            let mut text = String::from("i: Prompt | g: Generate | s: Settings");
            if app.downloads.is_some() {
                text.push_str(" | h: Save PNG | w: Save JPG");
            }
            text.push_str(" | R: Reset | ?: Guide | q: Quit");
            text
        }
    };

    let help = Paragraph::new(help_text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}

/// Draw the welcome guide on top of everything
fn draw_tutorial(frame: &mut Frame) {
    let area = centered_rect(64, 20, frame.area());

    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let body = Style::default().fg(Color::White);
    let lines = vec![
        Line::from(Span::styled(
            "Ready to unleash your creativity? Here is a quick start guide:",
            body,
        )),
        Line::from(""),
        Line::from(Span::styled("1️⃣ Write a Prompt", heading)),
        Line::from(Span::styled(
            "Describe your dream scene in detail (English works best). Mention lighting, colors, and mood.",
            body,
        )),
        Line::from(""),
        Line::from(Span::styled("2️⃣ Choose a Style", heading)),
        Line::from(Span::styled(
            "Pick a vibe like 'Cinematic' or 'Anime' from the settings to instantly enhance your image.",
            body,
        )),
        Line::from(""),
        Line::from(Span::styled("3️⃣ What is 'Seed'? 🎲", heading)),
        Line::from(Span::styled(
            "• New Variation: AI creates a totally new image every time.",
            body,
        )),
        Line::from(Span::styled(
            "• Lock Seed: like a composition (pose, angle) but want to change small details? Choose 'Keep Composition'.",
            body,
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[ Enter ] Got it, Let's Create! ⚡",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
    ];

    let dialog = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT))
                .title("🚀 Welcome to SparkFlow!"),
        );

    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);
}

/// Rect of at most `width` x `height` centered in `area`
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::{GenerateParams, SeedMode};
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn cursor_wraps_inside_the_prompt_box() {
        assert_eq!(cursor_offset(0, 10), (0, 0));
        assert_eq!(cursor_offset(23, 10), (3, 2));
        assert_eq!(cursor_offset(5, 0), (0, 5));
    }

    #[test]
    fn long_prompt_cursor_does_not_wrap_around() {
        let (_, row) = cursor_offset(70_000, 1);
        assert_eq!(row, u16::MAX);

        let (col, row) = cursor_offset(65_536 * 40 + 7, 40);
        assert_eq!((col, row), (7, u16::MAX));
    }

    #[tokio::test]
    async fn selected_gallery_entry_stays_visible() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "images": [{ "url": "https://cdn.example/out.jpg" }]
            })))
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.api.base_url = server.uri();
        config.api.key = Some("k".into());
        config.tui.show_tutorial = false;
        let mut app = App::new(config);

        for seed in 100..110 {
            let params = GenerateParams::new("a lighthouse").with_seed_mode(SeedMode::Locked(seed));
            app.session.generate(&params).await.unwrap();
        }
        assert_eq!(app.gallery_len(), 9);

        for _ in 0..20 {
            app.select_next();
        }
        assert_eq!(app.selected_history, 8);
        assert!(screen(&app).contains("Seed: 100"));
    }
}
