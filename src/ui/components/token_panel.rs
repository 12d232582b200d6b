//! Token usage card: spend against the daily budget.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
    Frame,
};

use teleclaude_core::status::DashboardView;

use super::{panel, tone_color};

/// Token usage panel
pub struct TokenPanel;

impl TokenPanel {
    pub fn render(frame: &mut Frame, area: Rect, view: &DashboardView<'_>) {
        let block = panel("Token Usage (Today)");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height < 3 || inner.width < 10 {
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let headline = vec![
            Line::from(Span::styled(
                format!(" {}", view.spent_label()),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(" of {} daily budget", view.budget_label()),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        frame.render_widget(Paragraph::new(headline), rows[0]);

        let status_color = tone_color(view.status_tier().tone());
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(status_color).bg(Color::DarkGray))
            .ratio(Self::gauge_ratio(view.bar_fill_percent()))
            .label(format!("{} used", view.percent_label()));
        frame.render_widget(gauge, rows[1]);

        frame.render_widget(Paragraph::new(Self::detail_lines(view)), rows[2]);
    }

    /// Gauge ratio for a bar percentage; the widget rejects values outside 0..=1
    fn gauge_ratio(bar_percent: f64) -> f64 {
        if bar_percent.is_nan() {
            return 0.0;
        }
        (bar_percent / 100.0).clamp(0.0, 1.0)
    }

    fn detail_lines(view: &DashboardView<'_>) -> Vec<Line<'static>> {
        let dim = Style::default().fg(Color::DarkGray);
        let mut lines = vec![Line::from(vec![
            Span::raw(" "),
            Span::styled(
                format!(" {} ", view.status_label()),
                Style::default()
                    .fg(Color::Black)
                    .bg(tone_color(view.status_tier().tone())),
            ),
            Span::styled(format!("  {} requests today", view.requests()), dim),
        ])];

        let models = view.model_lines();
        if !models.is_empty() {
            lines.push(Line::from(Span::styled(" By Model:", dim)));
            for line in models {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {}", line.model), Style::default().fg(Color::Gray)),
                    Span::styled(format!("  {} ({})", line.cost, line.requests), dim),
                ]));
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
    fn test_gauge_ratio_clamped() {
        assert_eq!(TokenPanel::gauge_ratio(50.0), 0.5);
        assert_eq!(TokenPanel::gauge_ratio(100.0), 1.0);
        assert_eq!(TokenPanel::gauge_ratio(-5.0), 0.0);
        assert_eq!(TokenPanel::gauge_ratio(f64::NAN), 0.0);
    }

    #[test]
    fn test_render_over_budget() {
        let snapshot = snapshot();
        let view = DashboardView::new(&snapshot);
        let screen = render_to_string(60, 12, |frame, area| TokenPanel::render(frame, area, &view));

        assert!(screen.contains("Token Usage (Today)"));
        assert!(screen.contains("$13.7000"));
        assert!(screen.contains("of $10.00 daily budget"));
        assert!(screen.contains("137.0% used"));
        assert!(screen.contains("CRITICAL"));
        assert!(screen.contains("42 requests today"));
        assert!(screen.contains("claude-opus"));
    }

    #[test]
    fn test_render_tiny_area_does_not_panic() {
        let snapshot = snapshot();
        let view = DashboardView::new(&snapshot);
        render_to_string(8, 3, |frame, area| TokenPanel::render(frame, area, &view));
    }
}
