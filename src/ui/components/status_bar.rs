use std::time::Duration;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use teleclaude_core::monitor::PollState;
use teleclaude_core::status::{seconds_label, DashboardView};

/// Footer line: last update, refresh period, key hints
pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, state: &PollState, refresh: Duration) {
        frame.render_widget(Paragraph::new(Self::line(state, refresh)), area);
    }

    fn line(state: &PollState, refresh: Duration) -> Line<'static> {
        let dim = Style::default().fg(Color::DarkGray);
        let mut spans = Vec::new();

        if let Some(snapshot) = state.snapshot() {
            let view = DashboardView::new(snapshot);
            spans.push(Span::styled(
                format!(" Last updated: {}", view.last_updated_label()),
                Style::default().fg(Color::Gray),
            ));
            spans.push(Span::styled(" │ ", dim));
        }

        spans.push(Span::styled(
            format!("Auto-refreshes every {} seconds", seconds_label(refresh)),
            dim,
        ));
        spans.push(Span::styled(" │ ", dim));
        spans.push(Span::styled("q", Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(":Quit", dim));

        Line::from(spans)
    }
}
