//! TUI application state and event loop.
//!
//! Polling happens on the tokio runtime through the scheduler; this loop only
//! draws the shared [`DashboardState`] and forwards key presses.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc::UnboundedSender;

use hwdash_core::{CycleStats, HostEvent, MetricsEndpoint};

use crate::dashboard::DashboardState;

/// How long the loop waits for a key before redrawing.
const FRAME: Duration = Duration::from_millis(100);

pub struct App {
    state: Arc<Mutex<DashboardState>>,
    stats: Arc<CycleStats>,
    events: UnboundedSender<HostEvent>,
    endpoint: MetricsEndpoint,
    interval: Duration,
    running: bool,
}

impl App {
    pub fn new(
        state: Arc<Mutex<DashboardState>>,
        stats: Arc<CycleStats>,
        events: UnboundedSender<HostEvent>,
        endpoint: MetricsEndpoint,
        interval: Duration,
    ) -> Self {
        Self {
            state,
            stats,
            events,
            endpoint,
            interval,
            running: true,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Restore the terminal before the panic message prints.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        let _ = std::panic::take_hook();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        while self.running {
            let view = self.view();
            terminal.draw(|f| super::ui::draw(f, self, &view))?;

            if event::poll(FRAME)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key.code);
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('r') | KeyCode::Char('R') => {
                // The scheduler only goes away after this loop ends.
                let _ = self.events.send(HostEvent::RefreshRequested);
            }
            _ => {}
        }
    }

    /// Copy of the shared state, so drawing never holds the lock.
    pub fn view(&self) -> DashboardState {
        match self.state.lock() {
            Ok(state) => state.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    pub fn endpoint(&self) -> &MetricsEndpoint {
        &self.endpoint
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hwdash_core::{FetchError, render_error};
    use tokio::sync::mpsc::unbounded_channel;

    fn app() -> (App, tokio::sync::mpsc::UnboundedReceiver<HostEvent>) {
        let (tx, rx) = unbounded_channel();
        let app = App::new(
            Arc::new(Mutex::new(DashboardState::default())),
            Arc::new(CycleStats::default()),
            tx,
            MetricsEndpoint::for_host("rig"),
            Duration::from_millis(1000),
        );
        (app, rx)
    }

    #[test]
    fn quit_keys_stop_the_loop() {
        for key in [KeyCode::Char('q'), KeyCode::Esc] {
            let (mut app, _rx) = app();
            app.handle_key(key);
            assert!(!app.running);
        }
    }

    #[test]
    fn r_requests_a_refresh() {
        let (mut app, mut rx) = app();
        app.handle_key(KeyCode::Char('r'));
        app.handle_key(KeyCode::Char('x'));
        assert_eq!(rx.try_recv(), Ok(HostEvent::RefreshRequested));
        assert!(rx.try_recv().is_err());
        assert!(app.running);
    }

    #[test]
    fn refresh_after_scheduler_gone_is_harmless() {
        let (mut app, rx) = app();
        drop(rx);
        app.handle_key(KeyCode::Char('r'));
        assert!(app.running);
    }

    #[test]
    fn view_reflects_shared_state() {
        let (app, _rx) = app();
        render_error(&mut *app.state.lock().unwrap(), &FetchError::HttpStatus(500));
        assert_eq!(app.view().banner().unwrap().text, "Error: HTTP 500");
    }
}
