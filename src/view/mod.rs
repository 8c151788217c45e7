//! Terminal preview of the row renderer (impure shell).

pub mod preview;
pub mod terminal_canvas;

pub use preview::Preview;
pub use terminal_canvas::{TerminalCanvas, CELL_HEIGHT_PX, CELL_WIDTH_PX};

use crate::config::ResolvedConfig;
use crate::controller::SystemClock;
use crate::gesture::LoggingHaptics;
use crate::model::AppError;
use crate::source::{FixtureImages, FixtureProvider};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

/// Poll interval while something is moving.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Poll interval when the screen is still.
const IDLE_INTERVAL: Duration = Duration::from_millis(250);

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    preview: Preview,
    clock: Rc<SystemClock>,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen and mouse capture.
    pub fn new(config: &ResolvedConfig, provider: Rc<FixtureProvider>) -> Result<Self, AppError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self::with_terminal(terminal, config, provider))
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Wraps an already prepared terminal.
    pub fn with_terminal(
        terminal: Terminal<B>,
        config: &ResolvedConfig,
        provider: Rc<FixtureProvider>,
    ) -> Self {
        let clock = Rc::new(SystemClock::new());
        let preview = Preview::new(
            config,
            provider,
            Rc::new(FixtureImages::new()),
            clock.clone(),
            Rc::new(LoggingHaptics),
        );
        Self {
            terminal,
            preview,
            clock,
        }
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits (q, Esc or Ctrl+C). Redraws on input and
    /// at frame rate while any row animates; idles otherwise.
    pub fn run(&mut self) -> Result<(), AppError> {
        self.draw()?;

        loop {
            let animating = self.preview.tick() | self.clock.take_redraw();
            let timeout = if animating { FRAME_INTERVAL } else { IDLE_INTERVAL };

            let mut dirty = animating;
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.preview.handle_key(key) {
                            return Ok(());
                        }
                        dirty = true;
                    }
                    Event::Mouse(mouse) => {
                        self.preview.handle_mouse(mouse);
                        dirty = true;
                    }
                    Event::Resize(width, height) => {
                        debug!(width, height, "terminal resized");
                        dirty = true;
                    }
                    _ => {}
                }
            }

            if dirty {
                self.draw()?;
            }
        }
    }

    /// Render the current frame
    pub fn draw(&mut self) -> Result<(), AppError> {
        let preview = &mut self.preview;
        self.terminal.draw(|frame| preview.render(frame))?;
        Ok(())
    }

    /// Rows, controllers and status.
    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    /// Underlying terminal.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

/// Initialize and run the preview, restoring the terminal afterwards.
///
/// Logging must be initialized by the caller.
pub fn run(config: &ResolvedConfig, provider: Rc<FixtureProvider>) -> Result<(), AppError> {
    let mut app = TuiApp::new(config, provider)?;
    let result = app.run();
    restore_terminal()?;
    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), AppError> {
    disable_raw_mode()?;
    io::stdout().execute(DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    #[test]
    fn draw_renders_without_error() {
        let terminal = Terminal::new(TestBackend::new(60, 20)).expect("terminal");
        let mut app = TuiApp::with_terminal(
            terminal,
            &ResolvedConfig::default(),
            Rc::new(FixtureProvider::sample()),
        );
        assert!(app.draw().is_ok());
        assert_eq!(app.preview().row_ids().len(), 6);
        assert_eq!(app.terminal().backend().buffer().area.width, 60);
    }
}
