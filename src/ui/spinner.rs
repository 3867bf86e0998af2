//! Motion indicator: a small spinner rendered in the top-right corner of
//! the grid while the engine keeps requesting frames.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use crate::ui::theme::Theme;

/// Braille-dot spinner frames.  Cycles through these on each drawn frame.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct MotionIndicator {
    pub visible: bool,
    /// Drawn frame counter (drives the spinner frame).
    pub tick: u64,
}

impl Widget for MotionIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.visible || area.width < 12 || area.height == 0 {
            return;
        }

        let frame = SPINNER_FRAMES[(self.tick as usize) % SPINNER_FRAMES.len()];
        let label = format!(" {frame} moving ");
        let label_width = label.chars().count() as u16;
        let x = area.x + area.width.saturating_sub(label_width + 1);

        let line = Line::from(Span::styled(label, Theme::motion_style()));
        buf.set_line(x, area.y, &line, label_width);
    }
}
