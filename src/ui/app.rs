use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;

use teleclaude_core::monitor::{PollState, PollStateReceiver, StatusPoller};
use teleclaude_core::status::{DashboardView, HttpStatusSource};

use crate::config::Settings;

use super::components::{MemoryPanel, Notice, QuickStatsPanel, StatusBar, SystemPanel, TokenPanel};
use super::Layout;

/// How long to wait for input between redraws
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Terminal dashboard
pub struct App {
    settings: Settings,
    layout: Layout,
    running: bool,
}

impl App {
    /// Create a new application
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            layout: Layout::new(),
            running: true,
        }
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        let source = HttpStatusSource::new(
            self.settings.status.url.clone(),
            self.settings.status.request_timeout(),
        )
        .context("Failed to build status client")?;

        // Setup terminal
        crossterm::terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Mount the poller for the lifetime of the screen
        tracing::info!("Watching {}", self.settings.status.url);
        let (handle, mut poll_rx) =
            StatusPoller::new(Arc::new(source), self.settings.status.poll_interval()).start();

        let result = self.main_loop(&mut terminal, &mut poll_rx).await;

        handle.stop();

        // Restore terminal
        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(
            terminal.backend_mut(),
            crossterm::terminal::LeaveAlternateScreen
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        poll_rx: &mut PollStateReceiver,
    ) -> Result<()> {
        let refresh = self.settings.status.poll_interval();

        while self.running {
            let state = poll_rx.borrow_and_update().clone();
            terminal.draw(|frame| self.draw(frame, &state, refresh))?;

            // Handle events with timeout
            if event::poll(INPUT_POLL)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }

        Ok(())
    }

    fn draw(&self, frame: &mut Frame, state: &PollState, refresh: Duration) {
        let area = frame.area();
        match state {
            PollState::Loading => {
                Notice::loading(frame, self.layout.notice_area(area, 60, 1));
            }
            PollState::Failed(message) => {
                Notice::error(frame, self.layout.notice_area(area, 80, 3), message);
            }
            PollState::Ready(snapshot) => {
                let view = DashboardView::new(snapshot);
                let areas = self.layout.calculate(area);

                TokenPanel::render(frame, areas.token, &view);
                MemoryPanel::render(frame, areas.memory, &view);
                SystemPanel::render(frame, areas.system, &view);
                QuickStatsPanel::render(frame, areas.quick_stats, &view);
                StatusBar::render(frame, areas.footer, state, refresh);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => self.running = false,
            (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => self.running = false,
            _ => {}
        }
    }
}
