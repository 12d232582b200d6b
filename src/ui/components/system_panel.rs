//! System status card: bot activity and background tasks.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use teleclaude_core::status::DashboardView;

use super::panel;

/// System status panel
pub struct SystemPanel;

impl SystemPanel {
    pub fn render(frame: &mut Frame, area: Rect, view: &DashboardView<'_>) {
        let paragraph = Paragraph::new(Self::lines(view))
            .block(panel("System Status"))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn lines(view: &DashboardView<'_>) -> Vec<Line<'static>> {
        let dim = Style::default().fg(Color::DarkGray);
        let system = &view.snapshot().system;

        let mut lines = vec![Line::from(vec![
            Span::styled(" ● ", Style::default().fg(Color::Green)),
            Span::styled("Online", Style::default().fg(Color::White)),
        ])];
        if let Some(last_active) = view.last_active_label() {
            lines.push(Line::from(Span::styled(
                format!(" Last Active: {}", last_active),
                dim,
            )));
        }
        lines.push(Line::default());

        if system.active_tasks.is_empty() {
            lines.push(Line::from(Span::styled(" No active background tasks", dim)));
        } else {
            lines.push(Line::from(Span::styled(
                " Active Tasks:",
                Style::default().fg(Color::Yellow),
            )));
            for task in &system.active_tasks {
                lines.push(Line::from(Span::styled(
                    format!("  • {}", task),
                    Style::default().fg(Color::Gray),
                )));
            }
        }

        if !system.recent_completed_tasks.is_empty() {
            lines.push(Line::from(Span::styled(" Recently Completed:", dim)));
            for task in &system.recent_completed_tasks {
                lines.push(Line::from(Span::styled(format!("  ✓ {}", task), dim)));
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::test_support::{render_to_string, snapshot};

    #[test]
    fn test_render_active_tasks() {
        let snapshot = snapshot();
        let view = DashboardView::new(&snapshot);
        let screen = render_to_string(60, 10, |frame, area| SystemPanel::render(frame, area, &view));

        assert!(screen.contains("Online"));
        assert!(screen.contains("Active Tasks:"));
        assert!(screen.contains("Scrape listings"));
        assert!(!screen.contains("Last Active:"));
        assert!(!screen.contains("Recently Completed:"));
    }

    #[test]
    fn test_render_idle() {
        let mut snapshot = snapshot();
        snapshot.system.active_tasks.clear();
        snapshot.system.last_active = Some("not a timestamp".to_string());
        let view = DashboardView::new(&snapshot);
        let screen = render_to_string(60, 10, |frame, area| SystemPanel::render(frame, area, &view));

        assert!(screen.contains("No active background tasks"));
        assert!(screen.contains("Last Active: not a timestamp"));
    }
}
