use crate::config::Config;
use crate::core::{AspectRatio, GenerateParams, SeedMode, Style, MAX_SEED};
use crate::materialize::Materialized;
use crate::session::Session;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Result and history view
    Main,
    /// Prompt input mode
    Input,
    /// Studio settings sidebar has focus
    Sidebar,
    /// Welcome guide dialog
    Tutorial,
}

/// Sidebar control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarField {
    Style,
    AspectRatio,
    Mode,
    Seed,
}

impl SidebarField {
    pub fn all() -> &'static [SidebarField] {
        &[
            SidebarField::Style,
            SidebarField::AspectRatio,
            SidebarField::Mode,
            SidebarField::Seed,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SidebarField::Style => "🎨 Image Style",
            SidebarField::AspectRatio => "📐 Aspect Ratio",
            SidebarField::Mode => "🧩 Generation Mode",
            SidebarField::Seed => "🌱 Seed ID",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            SidebarField::Style => "Defines the artistic vibe. 'Cinematic' for movies, 'Anime' for cartoons.",
            SidebarField::AspectRatio => "16:9 is best for screens, 9:16 for phones.",
            SidebarField::Mode => "A surprise every time, or refine the same scene?",
            SidebarField::Seed => "The DNA of the image. Keeping it the same preserves the structure.",
        }
    }
}

/// TUI application state
pub struct App {
    /// Current mode
    pub mode: AppMode,

    /// Config plus session history
    pub session: Session,

    /// Current prompt input
    pub input: String,

    /// Cursor position in input, in characters
    pub cursor_pos: usize,

    pub style: Style,

    pub aspect_ratio: AspectRatio,

    /// Keep composition: reuse `seed` for every request
    pub lock_seed: bool,

    pub seed: u32,

    /// Sidebar: selected field index
    pub sidebar_selected: usize,

    /// Sidebar: editing the seed value
    pub seed_editing: bool,

    /// Sidebar: seed edit buffer
    pub seed_edit_buffer: String,

    /// Downloads for the latest record, when it could be fetched and decoded
    pub downloads: Option<Materialized>,

    /// Selected entry in the history gallery
    pub selected_history: usize,

    /// Status message
    pub status_message: Option<String>,

    /// Error message
    pub error_message: Option<String>,

    /// Whether to quit
    pub should_quit: bool,

    /// A generation was requested and runs after the next draw
    pub generating: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let show_tutorial = config.tui.show_tutorial;
        let (lock_seed, seed) = match config.seed_mode() {
            SeedMode::Random => (false, config.defaults.seed),
            SeedMode::Locked(seed) => (true, seed),
        };

        Self {
            mode: if show_tutorial {
                AppMode::Tutorial
            } else {
                AppMode::Main
            },
            style: config.defaults.style,
            aspect_ratio: config.defaults.aspect_ratio,
            lock_seed,
            seed,
            session: Session::new(config),
            input: String::new(),
            cursor_pos: 0,
            sidebar_selected: 0,
            seed_editing: false,
            seed_edit_buffer: String::new(),
            downloads: None,
            selected_history: 0,
            status_message: None,
            error_message: None,
            should_quit: false,
            generating: false,
        }
    }

    /// Set status message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.error_message = None;
    }

    /// Set error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error_message = Some(msg.into());
        self.status_message = None;
    }

    /// Clear messages
    pub fn clear_messages(&mut self) {
        self.status_message = None;
        self.error_message = None;
    }

    pub fn seed_mode(&self) -> SeedMode {
        if self.lock_seed {
            SeedMode::Locked(self.seed)
        } else {
            SeedMode::Random
        }
    }

    /// Parameters for the next generation, built from the current controls
    pub fn current_params(&self) -> GenerateParams {
        GenerateParams::new(self.input.clone())
            .with_style(self.style)
            .with_aspect_ratio(self.aspect_ratio)
            .with_seed_mode(self.seed_mode())
    }

    /// Queue a generation for the next loop iteration. Empty prompts never
    /// reach the service.
    pub fn request_generation(&mut self) {
        if self.input.is_empty() {
            self.set_error("✍️ Describe your vision first");
            return;
        }
        self.clear_messages();
        self.generating = true;
    }

    /// Forget the session's history and downloads
    pub fn reset_session(&mut self) {
        if self.session.history().is_empty() {
            self.set_status("Nothing to clear yet");
            return;
        }
        self.session.reset();
        self.downloads = None;
        self.selected_history = 0;
        self.set_status("Session history cleared");
    }

    /// Number of gallery entries (every record but the latest)
    pub fn gallery_len(&self) -> usize {
        self.session.history().len().saturating_sub(1)
    }

    pub fn select_previous(&mut self) {
        self.selected_history = self.selected_history.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected_history + 1 < self.gallery_len() {
            self.selected_history += 1;
        }
    }

    pub fn selected_sidebar_field(&self) -> SidebarField {
        SidebarField::all()[self.sidebar_selected.min(SidebarField::all().len() - 1)]
    }

    /// Current value of a sidebar field, as displayed
    pub fn sidebar_value(&self, field: SidebarField) -> String {
        match field {
            SidebarField::Style => self.style.label().to_string(),
            SidebarField::AspectRatio => self.aspect_ratio.label().to_string(),
            SidebarField::Mode => {
                if self.lock_seed {
                    "🔒 Keep Composition (Lock Seed)".to_string()
                } else {
                    "🎲 New Variation (Random)".to_string()
                }
            }
            SidebarField::Seed => {
                if self.lock_seed {
                    self.seed.to_string()
                } else {
                    "(random per image)".to_string()
                }
            }
        }
    }

    /// Step a sidebar option forward or backward
    pub fn cycle_sidebar_option(&mut self, field: SidebarField, forward: bool) {
        match field {
            SidebarField::Style => self.style = cycle(Style::all(), self.style, forward),
            SidebarField::AspectRatio => {
                self.aspect_ratio = cycle(AspectRatio::all(), self.aspect_ratio, forward)
            }
            SidebarField::Mode => self.lock_seed = !self.lock_seed,
            SidebarField::Seed => {}
        }
    }

    /// Start editing the seed; only available while the seed is locked
    pub fn begin_seed_edit(&mut self) -> bool {
        if !self.lock_seed {
            return false;
        }
        self.seed_editing = true;
        self.seed_edit_buffer = self.seed.to_string();
        true
    }

    /// Apply the seed edit buffer
    pub fn commit_seed_edit(&mut self) -> Result<u32, String> {
        self.seed_editing = false;
        let buffer = std::mem::take(&mut self.seed_edit_buffer);
        match buffer.trim().parse::<u32>() {
            Ok(seed) if seed < MAX_SEED => {
                self.seed = seed;
                Ok(seed)
            }
            _ => Err(format!("Seed must be a number from 0 to {}", MAX_SEED - 1)),
        }
    }

    /// Byte offset of the cursor in `input`
    fn cursor_byte(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn input_len(&self) -> usize {
        self.input.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.cursor_byte();
        self.input.insert(at, c);
        self.cursor_pos += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
            let at = self.cursor_byte();
            self.input.remove(at);
        }
    }

    pub fn delete_at_cursor(&mut self) {
        if self.cursor_pos < self.input_len() {
            let at = self.cursor_byte();
            self.input.remove(at);
        }
    }
}

fn cycle<T: Copy + PartialEq>(options: &[T], current: T, forward: bool) -> T {
    let idx = options.iter().position(|o| *o == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % options.len()
    } else {
        (idx + options.len() - 1) % options.len()
    };
    options[next]
}
