use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use teleclaude_core::status::DashboardView;

use super::{panel, tone_color};

/// Quick stats panel: four headline numbers
pub struct QuickStatsPanel;

impl QuickStatsPanel {
    pub fn render(frame: &mut Frame, area: Rect, view: &DashboardView<'_>) {
        let block = panel("Quick Stats");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height < 2 || inner.width < 8 {
            return;
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(inner);

        for (stat, column) in view.quick_stats().iter().zip(columns.iter()) {
            let lines = vec![
                Line::from(Span::styled(
                    stat.value.clone(),
                    Style::default()
                        .fg(tone_color(stat.tone))
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(stat.label, Style::default().fg(Color::DarkGray))),
            ];
            frame.render_widget(
                Paragraph::new(lines).alignment(Alignment::Center),
                *column,
            );
        }
    }
}
