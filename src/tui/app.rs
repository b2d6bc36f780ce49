//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Quote requests via background worker

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::application::{build_service, ModelService};
use crate::config::AppConfig;

use super::ui::{
    form::{render_profile_form, ProfileFormState},
    render_disclaimer,
    result::{render_quote, QuoteState},
};
use super::worker::{QuoteProgress, QuoteWorker, QuoteWorkerHandle};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Quote,
}

/// Main application state
pub struct App {
    screen: Screen,
    should_quit: bool,
    service: Arc<ModelService>,
    form_state: ProfileFormState,
    quote_state: QuoteState,

    /// Pending quote worker (if running)
    pending_worker: Option<QuoteWorkerHandle>,

    /// When the pending request started (for the progress bar)
    started_at: Option<Instant>,
}

impl App {
    /// Build the app from configuration.
    ///
    /// # Errors
    /// Returns error if the model or city tiers cannot be loaded.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let service = build_service(config)?;
        Ok(Self::with_service(Arc::new(service)))
    }

    /// Create the app around an existing service.
    #[must_use]
    pub fn with_service(service: Arc<ModelService>) -> Self {
        let form_state = ProfileFormState::new(service.city_tiers());
        Self {
            screen: Screen::Form,
            should_quit: false,
            service,
            form_state,
            quote_state: QuoteState::default(),
            pending_worker: None,
            started_at: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);
        self.form_state.clear_sensitive();

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.poll_worker();
            self.tick_progress();

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                match self.screen {
                    Screen::Form => render_profile_form(f, chunks[0], &self.form_state),
                    Screen::Quote => render_quote(f, chunks[0], &self.quote_state),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            // Short poll to stay responsive
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Drain progress updates from the background worker.
    fn poll_worker(&mut self) {
        loop {
            let Some(progress) = self
                .pending_worker
                .as_ref()
                .and_then(QuoteWorkerHandle::try_recv)
            else {
                break;
            };

            match progress {
                QuoteProgress::Predicting => {}
                QuoteProgress::Complete(quote) => {
                    self.quote_state = QuoteState::Complete { quote };
                    self.finish_request();
                }
                QuoteProgress::Error(message) => {
                    self.quote_state = QuoteState::Error { message };
                    self.finish_request();
                }
            }
        }
    }

    fn finish_request(&mut self) {
        self.pending_worker = None;
        self.started_at = None;
    }

    /// Monotonic progress that approaches, but never reaches, completion.
    fn tick_progress(&mut self) {
        let Some(started_at) = self.started_at else {
            return;
        };
        let QuoteState::Predicting { progress } = self.quote_state else {
            return;
        };

        let elapsed = started_at.elapsed().as_secs_f64();
        let desired = 0.95 * (1.0 - (-elapsed / 0.8).exp());
        self.quote_state = QuoteState::Predicting {
            progress: desired.max(progress),
        };
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Form => self.handle_form_key(key, modifiers),
            Screen::Quote => self.handle_quote_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.form_state.reset();
            }
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::BackTab => self.form_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form_state.next_field(),
            KeyCode::Left => self.form_state.cycle(false),
            KeyCode::Right => self.form_state.cycle(true),
            KeyCode::Char(c) => self.form_state.input_char(c),
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Delete => self.form_state.clear_field(),
            KeyCode::Enter => self.submit_form(),
            _ => {}
        }
    }

    fn handle_quote_key(&mut self, key: KeyCode) {
        if self.pending_worker.is_some() {
            return;
        }
        if matches!(
            key,
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N')
        ) {
            self.form_state.reset();
            self.screen = Screen::Form;
        }
    }

    /// Validate the form and, if it passes, start a quote.
    ///
    /// Validation failures stay on the form; the predictor is not called.
    fn submit_form(&mut self) {
        if self.pending_worker.is_some() {
            return;
        }

        let profile = self
            .form_state
            .to_profile_input()
            .and_then(|input| self.service.profile(&input));

        match profile {
            Ok(profile) => {
                self.screen = Screen::Quote;
                self.quote_state = QuoteState::Predicting { progress: 0.0 };
                self.started_at = Some(Instant::now());
                self.pending_worker = Some(QuoteWorker::spawn(self.service.clone(), profile));

                // Clear plaintext buffers from the UI immediately.
                self.form_state.clear_sensitive();
            }
            Err(errors) => {
                self.form_state.error_message = Some(errors.to_string());
            }
        }
    }
}
