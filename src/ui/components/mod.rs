mod memory_panel;
mod notice;
mod quick_stats;
mod status_bar;
mod system_panel;
mod token_panel;

pub use memory_panel::MemoryPanel;
pub use notice::Notice;
pub use quick_stats::QuickStatsPanel;
pub use status_bar::StatusBar;
pub use system_panel::SystemPanel;
pub use token_panel::TokenPanel;

use ratatui::{
    style::{Color, Style},
    widgets::{Block, BorderType, Borders},
};
use teleclaude_core::status::Tone;

/// Terminal color for a tone
pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Green => Color::Green,
        Tone::Yellow => Color::Yellow,
        Tone::Red => Color::Red,
        Tone::Blue => Color::Blue,
        Tone::Purple => Color::Magenta,
        Tone::Gray => Color::Gray,
        Tone::Neutral => Color::White,
    }
}

/// Rounded panel frame shared by every card
fn panel(title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Gray))
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::{backend::TestBackend, layout::Rect, Frame, Terminal};
    use teleclaude_core::status::StatusSnapshot;

    pub const SNAPSHOT_JSON: &str = r#"{
        "timestamp": "2026-01-15T09:30:00Z",
        "memory": {
            "total": 12,
            "byPriority": {"URGENT": 3, "DAILY": 0, "ARCHIVE": 9},
            "recent": [{"id": "m1", "content": "Renew passport", "priority": "URGENT", "created": "2026-01-15T08:00:00Z"}]
        },
        "tokens": {
            "spent": 13.7, "budget": 10.0, "percent": 137.0, "status": "CRITICAL",
            "requests": 42, "byModel": {"claude-opus": {"cost": 13.7, "requests": 42}}
        },
        "system": {"lastActive": null, "activeTasks": ["Scrape listings"], "recentCompletedTasks": []}
    }"#;

    pub fn snapshot() -> StatusSnapshot {
        serde_json::from_str(SNAPSHOT_JSON).unwrap()
    }

    /// Render into an in-memory terminal and return the screen as text
    pub fn render_to_string(width: u16, height: u16, draw: impl FnOnce(&mut Frame, Rect)) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                draw(frame, area);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }
}
