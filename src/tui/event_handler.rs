use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;

use super::app::{App, AppMode, SidebarField};
use crate::core::ErrorKind;
use crate::materialize::{self, Artifact};

/// Handle input in main mode
pub async fn handle_main_input(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        // Gallery navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),

        // Enter input mode
        KeyCode::Char('i') | KeyCode::Char('/') => {
            app.mode = AppMode::Input;
            app.cursor_pos = app.input_len();
            app.clear_messages();
        }

        // Focus studio settings
        KeyCode::Char('s') | KeyCode::Tab => {
            app.mode = AppMode::Sidebar;
            app.seed_editing = false;
        }

        KeyCode::Char('g') | KeyCode::Enter => app.request_generation(),

        // Downloads, only when the latest image materialized
        KeyCode::Char('h') => {
            if let Some(png) = app.downloads.as_ref().map(|d| d.png.clone()) {
                save_artifact(app, &png).await;
            }
        }
        KeyCode::Char('w') => {
            if let Some(jpeg) = app.downloads.as_ref().map(|d| d.jpeg.clone()) {
                save_artifact(app, &jpeg).await;
            }
        }

        KeyCode::Char('R') => app.reset_session(),

        KeyCode::Char('?') => app.mode = AppMode::Tutorial,

        KeyCode::Char('q') | KeyCode::Esc => {
            app.should_quit = true;
        }

        _ => {}
    }
    Ok(())
}

/// Handle input in prompt input mode
pub async fn handle_input_mode(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc => {
            app.mode = AppMode::Main;
        }

        KeyCode::Enter => {
            app.mode = AppMode::Main;
            app.request_generation();
        }

        KeyCode::Char(c) => app.insert_char(c),

        KeyCode::Backspace => app.delete_before_cursor(),

        KeyCode::Delete => app.delete_at_cursor(),

        KeyCode::Left => {
            if app.cursor_pos > 0 {
                app.cursor_pos -= 1;
            }
        }

        KeyCode::Right => {
            if app.cursor_pos < app.input_len() {
                app.cursor_pos += 1;
            }
        }

        KeyCode::Home => {
            app.cursor_pos = 0;
        }

        KeyCode::End => {
            app.cursor_pos = app.input_len();
        }

        _ => {}
    }
    Ok(())
}

/// Handle input while the sidebar has focus
pub fn handle_sidebar_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let fields = SidebarField::all();

    if app.seed_editing {
        match key.code {
            KeyCode::Esc => {
                app.seed_editing = false;
                app.seed_edit_buffer.clear();
            }

            KeyCode::Enter => match app.commit_seed_edit() {
                Ok(seed) => app.set_status(format!("Seed locked to {}", seed)),
                Err(e) => app.set_error(e),
            },

            KeyCode::Char(c) if c.is_ascii_digit() => {
                app.seed_edit_buffer.push(c);
            }

            KeyCode::Backspace => {
                app.seed_edit_buffer.pop();
            }

            _ => {}
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            if app.sidebar_selected > 0 {
                app.sidebar_selected -= 1;
            }
        }

        KeyCode::Down | KeyCode::Char('j') => {
            if app.sidebar_selected < fields.len() - 1 {
                app.sidebar_selected += 1;
            }
        }

        KeyCode::Left | KeyCode::Char('h') => {
            let field = app.selected_sidebar_field();
            app.cycle_sidebar_option(field, false);
        }

        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            let field = app.selected_sidebar_field();
            app.cycle_sidebar_option(field, true);
        }

        KeyCode::Enter => {
            let field = app.selected_sidebar_field();
            if field == SidebarField::Seed {
                if !app.begin_seed_edit() {
                    app.set_error("Switch to 🔒 Keep Composition to set a seed");
                }
            } else {
                app.cycle_sidebar_option(field, true);
            }
        }

        KeyCode::Esc | KeyCode::Tab | KeyCode::Char('q') => {
            app.mode = AppMode::Main;
        }

        _ => {}
    }
    Ok(())
}

/// Handle input while the welcome guide is open
pub fn handle_tutorial_input(app: &mut App, key: KeyEvent) -> Result<()> {
    if matches!(
        key.code,
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') | KeyCode::Char('q')
    ) {
        app.mode = AppMode::Main;
    }
    Ok(())
}

/// Run the queued generation to completion, then prepare its downloads
pub async fn run_generation(app: &mut App) {
    let params = app.current_params();

    match app.session.generate(&params).await {
        Ok(record) => {
            app.selected_history = 0;
            app.downloads = materialize::materialize_or_skip(&record.image_url).await;
            app.set_status(format!("✨ Artwork ready | {}", record.caption()));
        }
        Err(e) => {
            let msg = match e.kind() {
                ErrorKind::Configuration => format!("❌ {}", e),
                _ => format!("Error: {}", e),
            };
            app.set_error(msg);
        }
    }

    app.generating = false;
}

async fn save_artifact(app: &mut App, artifact: &Artifact) {
    let dir = PathBuf::from(&app.session.config().output.directory);
    match artifact.save(&dir).await {
        Ok(path) => app.set_status(format!(
            "⬇️ Saved {} ({})",
            path.display(),
            artifact.mime_type
        )),
        Err(e) => app.set_error(format!("Download failed: {}", e)),
    }
}
