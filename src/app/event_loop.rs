use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};
use crate::store::NoteStore;

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop hits
    /// an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; easynotes requires an interactive terminal")?;
        let size = terminal.size()?;

        let mut model = self.initial_model((size.width, size.height));
        tracing::info!(
            width = size.width,
            height = size.height,
            sidebar = model.sidebar_visible,
            "starting"
        );

        let result = execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)
            .context("Failed to enable mouse capture")
            .and_then(|()| Self::event_loop(&mut terminal, &mut model));

        // Restore terminal
        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();

        result
    }

    /// The starting model for a terminal of the given size.
    pub(super) fn initial_model(&self, terminal_size: (u16, u16)) -> Model {
        let mut model = Model::new(
            NoteStore::with_default_color(self.default_color),
            terminal_size,
        );
        model.sidebar_visible = self.sidebar_visible;
        model.confirm_delete = self.confirm_delete;
        model.theme = self.theme.clone();
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        model.sync_layout();
        model
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            let poll_ms = if needs_render {
                0
            } else if resize_debouncer.is_pending() {
                10
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Coalesce key repeat bursts into a single render.
                loop {
                    let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let msg =
                        Self::handle_event(&event::read()?, model, event_ms, &mut resize_debouncer);
                    if let Some(msg) = msg {
                        tracing::trace!(?msg, "message");
                        *model = update(std::mem::take(model), msg);
                        needs_render = true;
                    }
                    if model.should_quit || !event::poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }

            if needs_render {
                terminal.draw(|frame| Self::view(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }
}
