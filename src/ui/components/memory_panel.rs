//! Memory system card: total, per-priority counts, recent items.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use teleclaude_core::status::DashboardView;

use super::{panel, tone_color};

/// Memory system panel
pub struct MemoryPanel;

impl MemoryPanel {
    pub fn render(frame: &mut Frame, area: Rect, view: &DashboardView<'_>) {
        let block = panel("Memory System");
        let paragraph = Paragraph::new(Self::lines(view))
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn lines(view: &DashboardView<'_>) -> Vec<Line<'static>> {
        let dim = Style::default().fg(Color::DarkGray);
        let memory = &view.snapshot().memory;

        let mut lines = vec![
            Line::from(vec![
                Span::styled(
                    format!(" {}", memory.total),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" active memories", dim),
            ]),
            Line::default(),
        ];

        let mut chips = vec![Span::raw(" ")];
        for chip in view.priority_chips() {
            chips.push(Span::styled(
                format!(" {}: {} ", chip.label, chip.count),
                Style::default().fg(Color::Black).bg(tone_color(chip.tone)),
            ));
            chips.push(Span::raw(" "));
        }
        lines.push(Line::from(chips));

        if !memory.recent.is_empty() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(" Recent:", dim)));
            for (item, tone) in view.recent_memories() {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  [{}] ", item.priority),
                        Style::default().fg(tone_color(tone)),
                    ),
                    Span::styled(item.content.clone(), Style::default().fg(Color::Gray)),
                ]));
            }
        }
        lines
    }
}
