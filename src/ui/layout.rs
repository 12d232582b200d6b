use ratatui::layout::{Constraint, Direction, Rect};

/// Minimum width for the two-column grid
const GRID_MIN_WIDTH: u16 = 80;

/// Height of the footer line
const FOOTER_HEIGHT: u16 = 1;

/// Panel arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Arrangement {
    /// Two columns, two rows
    #[default]
    Grid,
    /// One column, four rows (narrow terminals)
    Stacked,
}

/// Layout for the dashboard screen
#[derive(Debug, Clone, Copy, Default)]
pub struct Layout;

impl Layout {
    pub fn new() -> Self {
        Self
    }

    /// Arrangement used for an area of the given width
    pub fn arrangement(&self, area: Rect) -> Arrangement {
        if area.width >= GRID_MIN_WIDTH {
            Arrangement::Grid
        } else {
            Arrangement::Stacked
        }
    }

    /// Calculate the panel areas
    ///
    /// Grid:    [Token Usage ] [Memory System]
    ///          [System Status] [Quick Stats ]
    ///          [          Footer            ]
    pub fn calculate(&self, area: Rect) -> LayoutAreas {
        let main_and_footer = ratatui::layout::Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(FOOTER_HEIGHT)])
            .split(area);
        let main_area = main_and_footer[0];
        let footer = main_and_footer[1];

        match self.arrangement(area) {
            Arrangement::Grid => {
                let rows = ratatui::layout::Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .split(main_area);
                let columns = [
                    Constraint::Percentage(50),
                    Constraint::Percentage(50),
                ];
                let top = ratatui::layout::Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints(columns)
                    .split(rows[0]);
                let bottom = ratatui::layout::Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints(columns)
                    .split(rows[1]);

                LayoutAreas {
                    token: top[0],
                    memory: top[1],
                    system: bottom[0],
                    quick_stats: bottom[1],
                    footer,
                }
            }
            Arrangement::Stacked => {
                let rows = ratatui::layout::Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Percentage(30),
                        Constraint::Percentage(30),
                        Constraint::Percentage(25),
                        Constraint::Percentage(15),
                    ])
                    .split(main_area);

                LayoutAreas {
                    token: rows[0],
                    memory: rows[1],
                    system: rows[2],
                    quick_stats: rows[3],
                    footer,
                }
            }
        }
    }

    /// Centered area for the loading and error screens
    pub fn notice_area(&self, area: Rect, width_pct: u16, height: u16) -> Rect {
        let vertical = ratatui::layout::Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(height),
                Constraint::Fill(1),
            ])
            .split(area);

        ratatui::layout::Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - width_pct) / 2),
                Constraint::Percentage(width_pct),
                Constraint::Percentage((100 - width_pct) / 2),
            ])
            .split(vertical[1])[1]
    }
}

/// Calculated layout areas
#[derive(Debug, Clone, Copy)]
pub struct LayoutAreas {
    pub token: Rect,
    pub memory: Rect,
    pub system: Rect,
    pub quick_stats: Rect,
    /// Last-updated line
    pub footer: Rect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_layout() {
        let layout = Layout::new();
        let area = Rect::new(0, 0, 120, 40);
        let areas = layout.calculate(area);

        assert_eq!(layout.arrangement(area), Arrangement::Grid);
        assert_eq!(areas.footer.height, 1);
        assert_eq!(areas.footer.y, 39);
        assert_eq!(areas.token.y, areas.memory.y);
        assert!(areas.token.x < areas.memory.x);
        assert!(areas.token.y < areas.system.y);
        assert_eq!(areas.system.y, areas.quick_stats.y);
    }

    #[test]
    fn test_stacked_layout_on_narrow_terminal() {
        let layout = Layout::new();
        let area = Rect::new(0, 0, 60, 60);
        let areas = layout.calculate(area);

        assert_eq!(layout.arrangement(area), Arrangement::Stacked);
        assert_eq!(areas.token.width, 60);
        assert!(areas.token.y < areas.memory.y);
        assert!(areas.memory.y < areas.system.y);
        assert!(areas.system.y < areas.quick_stats.y);
    }

    #[test]
    fn test_notice_area_centered() {
        let layout = Layout::new();
        let area = Rect::new(0, 0, 100, 50);
        let notice = layout.notice_area(area, 60, 3);

        assert_eq!(notice.height, 3);
        assert!(notice.x > 0);
        assert!(notice.y > 0);
        assert!(notice.x + notice.width < area.width);
    }
}
