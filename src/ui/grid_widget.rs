//! Terminal rendering of the app grid.
//!
//! [`TerminalSurface`] is the engine's drawing target: it exposes the grid
//! area as a virtual viewport and records the sprites of one frame.
//! [`GridWidget`] then paints that frame into the ratatui buffer.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::Widget,
};

use crate::core::surface::{Rgba, Sprite, SpriteKind, Surface, TextureSize, Viewport};
use crate::ui::theme::Theme;

/// Virtual viewport units per terminal column.
pub const UNITS_PER_COLUMN: f32 = 9.0;
/// Virtual viewport units per terminal row.
pub const UNITS_PER_ROW: f32 = 20.0;

const ICON_COLS: u16 = 8;
const ICON_ROWS: u16 = 3;
const LABEL_MAX_COLS: usize = 12;
const HOME_LABEL: &str = " ⌂ Home ";

/// Sprites faded beyond this are not painted.
const FADE_CUTOFF: f32 = 0.85;

// ───────────────────────────────────────── frame ─────────────

/// Everything the engine drew in one frame.
#[derive(Debug, Clone, Default)]
pub struct GridFrame {
    pub area: Rect,
    pub viewport: Viewport,
    pub clear: Option<Rgba>,
    pub sprites: Vec<Sprite>,
}

impl GridFrame {
    /// Terminal cell holding the viewport point `(x, y)`.
    fn cell_of(&self, x: f32, y: f32) -> (i32, i32) {
        let col = self.area.x as i32 + (x / UNITS_PER_COLUMN).floor() as i32;
        let row = self.area.y as i32 + ((self.viewport.height - y) / UNITS_PER_ROW).floor() as i32;
        (col, row)
    }

    /// Index of the icon whose box covers the given cell, if any.
    pub fn icon_at(&self, column: u16, row: u16) -> Option<usize> {
        let (column, row) = (column as i32, row as i32);
        let half_width = ICON_COLS as i32 / 2;
        let half_height = ICON_ROWS as i32 / 2;

        self.sprites.iter().find_map(|sprite| match sprite.kind {
            SpriteKind::Icon(index) if sprite.depth < FADE_CUTOFF => {
                let (cx, cy) = self.cell_of(sprite.x, sprite.y);
                let inside = (column - cx) >= -half_width
                    && (column - cx) < half_width
                    && (row - cy).abs() <= half_height;
                inside.then_some(index)
            }
            _ => None,
        })
    }
}

// ───────────────────────────────────────── surface ───────────

/// Engine surface backed by a terminal rectangle.
pub struct TerminalSurface<'a> {
    labels: &'a [String],
    frame: GridFrame,
}

impl<'a> TerminalSurface<'a> {
    pub fn new(area: Rect, labels: &'a [String]) -> Self {
        let viewport = Viewport::new(
            area.width as f32 * UNITS_PER_COLUMN,
            area.height as f32 * UNITS_PER_ROW,
        );
        Self {
            labels,
            frame: GridFrame {
                area,
                viewport,
                clear: None,
                sprites: Vec::new(),
            },
        }
    }

    pub fn into_frame(self) -> GridFrame {
        self.frame
    }
}

fn cells(columns: usize, rows: u16) -> TextureSize {
    TextureSize {
        width: columns as f32 * UNITS_PER_COLUMN,
        height: rows as f32 * UNITS_PER_ROW,
    }
}

impl Surface for TerminalSurface<'_> {
    fn viewport(&self) -> Viewport {
        self.frame.viewport
    }

    fn texture_size(&self, kind: SpriteKind) -> Option<TextureSize> {
        match kind {
            SpriteKind::Icon(_) => Some(cells(ICON_COLS as usize, ICON_ROWS)),
            SpriteKind::SelectedIcon(_) => Some(cells(ICON_COLS as usize + 2, ICON_ROWS + 2)),
            SpriteKind::Label(index) => {
                let label = self.labels.get(index)?;
                Some(cells(label.chars().count().min(LABEL_MAX_COLS), 1))
            }
            SpriteKind::HomeButton => Some(cells(HOME_LABEL.chars().count(), 1)),
        }
    }

    fn clear(&mut self, color: Rgba) {
        self.frame.clear = Some(color);
        self.frame.sprites.clear();
    }

    fn draw(&mut self, sprite: Sprite) {
        self.frame.sprites.push(sprite);
    }
}

// ───────────────────────────────────────── widget ────────────

/// Paints a recorded [`GridFrame`].
pub struct GridWidget<'a> {
    frame: &'a GridFrame,
    labels: &'a [String],
}

impl<'a> GridWidget<'a> {
    pub fn new(frame: &'a GridFrame, labels: &'a [String]) -> Self {
        Self { frame, labels }
    }

    fn put(&self, buf: &mut Buffer, area: Rect, col: i32, row: i32, text: &str, style: Style) {
        if row < area.y as i32 || row >= area.bottom() as i32 {
            return;
        }
        for (offset, ch) in text.chars().enumerate() {
            let x = col + offset as i32;
            if x < area.x as i32 || x >= area.right() as i32 {
                continue;
            }
            if let Some(cell) = buf.cell_mut((x as u16, row as u16)) {
                cell.set_char(ch).set_style(style);
            }
        }
    }

    fn paint_icon(&self, buf: &mut Buffer, area: Rect, sprite: &Sprite, index: usize) {
        let (cx, cy) = self.frame.cell_of(sprite.x, sprite.y);
        let left = cx - ICON_COLS as i32 / 2;
        let inner = ICON_COLS as usize - 2;
        let initials = self
            .labels
            .get(index)
            .map(|label| initials(label))
            .unwrap_or_default();

        let style = Theme::icon_style(sprite.depth);
        self.put(buf, area, left, cy - 1, &format!("╭{}╮", "─".repeat(inner)), style);
        self.put(buf, area, left, cy, &format!("│{initials:^inner$}│"), style);
        self.put(buf, area, left, cy + 1, &format!("╰{}╯", "─".repeat(inner)), style);
    }

    fn paint_highlight(&self, buf: &mut Buffer, area: Rect, sprite: &Sprite) {
        let (cx, cy) = self.frame.cell_of(sprite.x, sprite.y);
        let width = ICON_COLS as usize + 2;
        let blank = " ".repeat(width);
        for row in cy - 2..=cy + 2 {
            self.put(buf, area, cx - width as i32 / 2, row, &blank, Theme::selected_style());
        }
    }

    fn paint_label(&self, buf: &mut Buffer, area: Rect, sprite: &Sprite, index: usize) {
        let Some(label) = self.labels.get(index) else {
            return;
        };
        let text: String = label.chars().take(LABEL_MAX_COLS).collect();
        let (cx, cy) = self.frame.cell_of(sprite.x, sprite.y);
        let left = cx - text.chars().count() as i32 / 2;
        self.put(buf, area, left, cy, &text, Theme::label_style(sprite.depth));
    }

    fn paint_home(&self, buf: &mut Buffer, area: Rect, sprite: &Sprite) {
        let (cx, cy) = self.frame.cell_of(sprite.x, sprite.y);
        let left = cx - HOME_LABEL.chars().count() as i32 / 2;
        self.put(buf, area, left, cy, HOME_LABEL, Theme::home_style());
    }
}

impl Widget for GridWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let backdrop = Theme::backdrop(self.frame.clear.unwrap_or(Rgba::TRANSPARENT));
        buf.set_style(area, backdrop);

        for sprite in &self.frame.sprites {
            // Warm-up frames are drawn nearly transparent.
            if sprite.tint.a < 0.01 {
                continue;
            }
            match sprite.kind {
                SpriteKind::HomeButton => self.paint_home(buf, area, sprite),
                _ if sprite.depth >= FADE_CUTOFF => {}
                SpriteKind::SelectedIcon(_) => self.paint_highlight(buf, area, sprite),
                SpriteKind::Icon(index) => self.paint_icon(buf, area, sprite, index),
                SpriteKind::Label(index) => self.paint_label(buf, area, sprite, index),
            }
        }
    }
}

/// Up to two initials, e.g. `App 07` → `A7`.
fn initials(label: &str) -> String {
    let mut words = label.split_whitespace();
    let first = words.next().and_then(|w| w.chars().next());
    let last = words.last().and_then(|w| w.chars().last());
    first.into_iter().chain(last).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("App {i:02}")).collect()
    }

    fn icon(index: usize, x: f32, y: f32) -> Sprite {
        Sprite {
            kind: SpriteKind::Icon(index),
            x,
            y,
            depth: 0.0,
            tint: Rgba::WHITE,
        }
    }

    #[test]
    fn viewport_scales_with_the_area() {
        let labels = labels(3);
        let surface = TerminalSurface::new(Rect::new(0, 0, 80, 22), &labels);
        let viewport = surface.viewport();
        assert_eq!(viewport.width, 720.0);
        assert_eq!(viewport.height, 440.0);
        assert!(viewport.is_landscape());
    }

    #[test]
    fn label_size_follows_its_text() {
        let labels = vec!["Mail".to_string()];
        let surface = TerminalSurface::new(Rect::new(0, 0, 80, 22), &labels);
        let size = surface.texture_size(SpriteKind::Label(0)).unwrap();
        assert_eq!(size.width, 4.0 * UNITS_PER_COLUMN);
        assert!(surface.texture_size(SpriteKind::Label(5)).is_none());
    }

    #[test]
    fn clear_starts_a_new_frame() {
        let labels = labels(1);
        let mut surface = TerminalSurface::new(Rect::new(0, 0, 40, 10), &labels);
        surface.draw(icon(0, 10.0, 10.0));
        surface.clear(Rgba::black(0.5));
        let frame = surface.into_frame();
        assert!(frame.sprites.is_empty());
        assert_eq!(frame.clear, Some(Rgba::black(0.5)));
    }

    #[test]
    fn icon_hit_test_covers_the_box() {
        let labels = labels(1);
        let mut surface = TerminalSurface::new(Rect::new(0, 1, 40, 10), &labels);
        // Column 10, row 5 of the area (viewport height 200).
        surface.draw(icon(0, 10.5 * UNITS_PER_COLUMN, 200.0 - 5.5 * UNITS_PER_ROW));
        let frame = surface.into_frame();

        assert_eq!(frame.icon_at(10, 6), Some(0));
        assert_eq!(frame.icon_at(6, 5), Some(0));
        assert_eq!(frame.icon_at(13, 7), Some(0));
        assert_eq!(frame.icon_at(14, 6), None);
        assert_eq!(frame.icon_at(10, 8), None);
    }

    #[test]
    fn widget_paints_icons_and_labels() {
        let labels = labels(1);
        let area = Rect::new(0, 0, 40, 10);
        let mut surface = TerminalSurface::new(area, &labels);
        surface.clear(Rgba::black(1.0));
        surface.draw(icon(0, 20.5 * UNITS_PER_COLUMN, 200.0 - 4.5 * UNITS_PER_ROW));
        surface.draw(Sprite {
            kind: SpriteKind::Label(0),
            ..icon(0, 20.5 * UNITS_PER_COLUMN, 200.0 - 7.5 * UNITS_PER_ROW)
        });
        let frame = surface.into_frame();

        let mut buf = Buffer::empty(area);
        GridWidget::new(&frame, &labels).render(area, &mut buf);

        let row = |y: u16| -> String { (0..area.width).map(|x| buf[(x, y)].symbol()).collect() };
        assert!(row(3).contains("╭──────╮"));
        assert!(row(4).contains("A1"));
        assert!(row(7).contains("App 01"));
    }

    #[test]
    fn faded_and_warm_up_sprites_are_skipped() {
        let labels = labels(1);
        let area = Rect::new(0, 0, 40, 10);
        let mut surface = TerminalSurface::new(area, &labels);
        surface.draw(Sprite {
            depth: 0.9,
            ..icon(0, 100.0, 100.0)
        });
        surface.draw(Sprite {
            tint: Rgba::black(0.001),
            ..icon(0, 200.0, 100.0)
        });
        let frame = surface.into_frame();

        let mut buf = Buffer::empty(area);
        GridWidget::new(&frame, &labels).render(area, &mut buf);
        let painted = buf.content().iter().any(|cell| cell.symbol() != " ");
        assert!(!painted);
        assert_eq!(frame.icon_at(11, 5), None);
    }

    #[test]
    fn initials_take_first_and_last_word() {
        assert_eq!(initials("App 07"), "A7");
        assert_eq!(initials("Mail"), "M");
        assert_eq!(initials(""), "");
    }
}
