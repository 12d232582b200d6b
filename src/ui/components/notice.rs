use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Full-screen loading and error states
pub struct Notice;

impl Notice {
    pub fn loading(frame: &mut Frame, area: Rect) {
        Self::render(
            frame,
            area,
            "Loading dashboard...".to_string(),
            Style::default().fg(Color::White),
        );
    }

    pub fn error(frame: &mut Frame, area: Rect, message: &str) {
        Self::render(
            frame,
            area,
            format!("Error: {}", message),
            Style::default().fg(Color::Red),
        );
    }

    fn render(frame: &mut Frame, area: Rect, text: String, style: Style) {
        let paragraph = Paragraph::new(Line::from(Span::styled(text, style)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::test_support::render_to_string;

    #[test]
    fn test_loading() {
        let screen = render_to_string(40, 1, |frame, area| Notice::loading(frame, area));
        assert!(screen.contains("Loading dashboard..."));
    }

    #[test]
    fn test_error_message() {
        let screen = render_to_string(60, 2, |frame, area| {
            Notice::error(frame, area, "Failed to fetch dashboard data (HTTP 502)")
        });
        assert!(screen.contains("Error: Failed to fetch dashboard data (HTTP 502)"));
    }
}
